use crate::GgufValueType;
use thiserror::Error;

/// A value, key, or tensor descriptor that cannot be represented on disk.
///
/// Raised before any byte is appended, so the failed call leaves the
/// encoder's buffers untouched.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("unknown GGUF value type code: {0}")]
    UnknownValueType(u32),
    #[error("heterogeneous array: element {index} is {found:?}, expected {expected:?}")]
    HeterogeneousArray { index: usize, expected: GgufValueType, found: GgufValueType },
    #[error("empty array has no element type")]
    EmptyArray,
    #[error("unsupported tensor dtype: {0} (only F32 and F16 are supported)")]
    UnsupportedDtype(String),
    #[error("integer {value} does not fit in INT32")]
    IntegerOutOfRange { value: i128 },
    #[error("string value is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error("string too large: {0} bytes")]
    StringTooLong(usize),
    #[error("array too large: {0} elements")]
    ArrayTooLong(usize),
    #[error("tensor has too many dimensions: {0}")]
    TooManyDimensions(usize),
    #[error("dimension {index} of size {size} does not fit in u32")]
    DimensionOverflow { index: usize, size: u64 },
    #[error("tensor byte length overflows u64")]
    ByteLengthOverflow,
    #[error("entry count exceeds u32::MAX")]
    CountOverflow,
}
