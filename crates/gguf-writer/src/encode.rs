//! Byte-level encoding of keys and tagged values.
//!
//! Every function validates its whole input before appending, so on error
//! `out` is left exactly as it was.

use gguf_format::{EncodingError, GgufValue};

/// Append a length-prefixed UTF-8 string: u32 byte length, then the bytes.
pub fn encode_string(out: &mut Vec<u8>, s: &str) -> Result<(), EncodingError> {
    let len = u32::try_from(s.len()).map_err(|_| EncodingError::StringTooLong(s.len()))?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(s.as_bytes());
    Ok(())
}

/// Append a metadata key. Keys are implicitly STRING and carry no type tag.
#[inline]
pub fn encode_key(out: &mut Vec<u8>, key: &str) -> Result<(), EncodingError> {
    encode_string(out, key)
}

/// Append a value, prefixed by its 4-byte type tag when `tagged` is set.
pub fn encode_value(out: &mut Vec<u8>, value: &GgufValue, tagged: bool) -> Result<(), EncodingError> {
    value.validate()?;
    write_value(out, value, tagged);
    Ok(())
}

/// Assumes `value` has passed [`GgufValue::validate`].
fn write_value(out: &mut Vec<u8>, value: &GgufValue, tagged: bool) {
    if tagged {
        out.extend_from_slice(&value.value_type().as_u32().to_le_bytes());
    }
    match value {
        GgufValue::Uint8(v) => out.push(*v),
        GgufValue::Int8(v) => out.extend_from_slice(&v.to_le_bytes()),
        GgufValue::Uint16(v) => out.extend_from_slice(&v.to_le_bytes()),
        GgufValue::Int16(v) => out.extend_from_slice(&v.to_le_bytes()),
        GgufValue::Uint32(v) => out.extend_from_slice(&v.to_le_bytes()),
        GgufValue::Int32(v) => out.extend_from_slice(&v.to_le_bytes()),
        GgufValue::Float32(v) => out.extend_from_slice(&v.to_le_bytes()),
        GgufValue::Bool(v) => out.push(u8::from(*v)),
        GgufValue::String(s) => {
            // length checked by validate
            out.extend_from_slice(&(s.len() as u32).to_le_bytes());
            out.extend_from_slice(s.as_bytes());
        }
        GgufValue::Array(items) => {
            let elem = value.element_type().map_or(0, |t| t.as_u32());
            out.extend_from_slice(&elem.to_le_bytes());
            out.extend_from_slice(&(items.len() as u32).to_le_bytes());
            for item in items {
                write_value(out, item, false);
            }
        }
    }
}
