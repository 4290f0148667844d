//! GGUF container encoder.
//!
//! Serializes typed metadata key/value pairs and tensor descriptors into the
//! GGUF container layout, then streams the raw tensor payloads behind them at
//! aligned offsets:
//!
//! ```text
//! magic | version | tensor_count | metadata_count      (u32 each, little-endian)
//! metadata entries:   key (len + bytes) | type tag | value
//! tensor descriptors: name | n_dims | dims (innermost first) | dtype | offset (u64)
//! [zero padding to alignment]
//! payload 0 [+ padding] | payload 1 [+ padding] | ...
//! ```
//!
//! Descriptor offsets are relative to the aligned start of the data section.
//! [`GgufWriter`] enforces the write order; see the [`writer`] module.

mod conventions;
pub mod config;
pub mod encode;
pub mod error;
pub mod metadata;
pub mod tensor_info;
pub mod writer;

pub use config::{ConfigError, WriterConfig};
pub use error::{GgufWriteError, ProtocolError, Result};
pub use metadata::MetadataBuffer;
pub use tensor_info::{TensorInfoBuffer, TensorSlot};
pub use writer::{GgufWriter, WriterPhase};

pub use gguf_format::{
    EncodingError, GGUF_DEFAULT_ALIGNMENT, GGUF_HEADER_LEN, GGUF_MAGIC, GGUF_VERSION, GgufValue,
    GgufValueType, TensorDType, keys, pad,
};
