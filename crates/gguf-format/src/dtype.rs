//! Tensor element types accepted by the encoder.

use crate::EncodingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Storage dtype of a tensor payload.
///
/// Only the two baseline float encodings are supported; quantized GGML types
/// are rejected when converting from a raw code or name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum TensorDType {
    F32 = 0,
    F16 = 1,
}

impl TensorDType {
    /// GGML type code written into the tensor descriptor.
    #[inline]
    pub const fn ggml_type(self) -> u32 {
        self as u32
    }

    /// Size in bytes of a single element.
    #[inline]
    pub const fn element_size(self) -> usize {
        match self {
            Self::F32 => 4,
            Self::F16 => 2,
        }
    }

    /// Resolve a raw GGML type code.
    pub fn from_ggml_type(code: u32) -> Result<Self, EncodingError> {
        match code {
            0 => Ok(Self::F32),
            1 => Ok(Self::F16),
            other => Err(EncodingError::UnsupportedDtype(format!("ggml type {other}"))),
        }
    }

    /// Payload size of a tensor of this dtype with the given shape.
    pub fn byte_length(self, shape: &[u64]) -> Result<u64, EncodingError> {
        shape
            .iter()
            .try_fold(self.element_size() as u64, |acc, &d| acc.checked_mul(d))
            .ok_or(EncodingError::ByteLengthOverflow)
    }
}

impl fmt::Display for TensorDType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::F32 => f.write_str("F32"),
            Self::F16 => f.write_str("F16"),
        }
    }
}

impl FromStr for TensorDType {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "f32" | "float32" => Ok(Self::F32),
            "f16" | "float16" | "half" => Ok(Self::F16),
            _ => Err(EncodingError::UnsupportedDtype(s.to_string())),
        }
    }
}
