//! Error types for the GGUF writer.

use crate::config::ConfigError;
use crate::writer::WriterPhase;
use gguf_format::EncodingError;
use std::io;
use thiserror::Error;

/// A writer operation invoked out of the header → metadata → descriptors →
/// payloads → close order, or a payload that does not match its descriptor.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("`{operation}` is not allowed in phase {phase}")]
    OutOfOrder { operation: &'static str, phase: WriterPhase },
    #[error("alignment is locked once tensor descriptors exist ({tensors} added)")]
    AlignmentLocked { tensors: u32 },
    #[error("unexpected tensor payload: all {declared} declared tensors are already written")]
    UnexpectedPayload { declared: u32 },
    #[error("payload {index} (`{name}`) is {actual} bytes, descriptor declares {expected}")]
    PayloadLengthMismatch { index: usize, name: String, expected: u64, actual: u64 },
    #[error("closing with {written} of {declared} tensor payloads written")]
    MissingPayloads { written: usize, declared: u32 },
    #[error("writer is poisoned by an earlier I/O failure; discard the output")]
    Poisoned,
    #[error("writer is closed")]
    Closed,
}

/// Top-level error returned by [`GgufWriter`](crate::GgufWriter).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GgufWriteError {
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid alignment: {0} (must be > 0)")]
    InvalidAlignment(u32),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, GgufWriteError>;
