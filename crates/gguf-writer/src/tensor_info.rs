//! Tensor descriptor encoding and data-section offset assignment.

use crate::encode::encode_string;
use gguf_format::{EncodingError, TensorDType};
use tracing::trace;

/// A tensor as declared to the writer, with its assigned data-section offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorSlot {
    pub name: String,
    /// Logical (outer-to-inner) shape as supplied by the caller.
    pub shape: Vec<u64>,
    pub dtype: TensorDType,
    pub byte_length: u64,
    /// Offset relative to the aligned start of the data section.
    pub offset: u64,
}

/// Encoded tensor descriptors and the running offset cursor.
#[derive(Debug, Default)]
pub struct TensorInfoBuffer {
    bytes: Vec<u8>,
    slots: Vec<TensorSlot>,
    next_offset: u64,
}

impl TensorInfoBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode one descriptor and advance the cursor by `pad(byte_length, alignment)`.
    ///
    /// Dimensions are written innermost first. `byte_length` is trusted; it is
    /// not checked against `shape` and `dtype`. Returns the assigned offset.
    pub fn push(
        &mut self,
        name: &str,
        shape: &[u64],
        dtype: TensorDType,
        byte_length: u64,
        alignment: u32,
    ) -> Result<u64, EncodingError> {
        u32::try_from(self.slots.len() + 1).map_err(|_| EncodingError::CountOverflow)?;
        let n_dims =
            u32::try_from(shape.len()).map_err(|_| EncodingError::TooManyDimensions(shape.len()))?;
        let offset = self.next_offset;
        let next_offset = byte_length
            .checked_next_multiple_of(u64::from(alignment))
            .and_then(|padded| offset.checked_add(padded))
            .ok_or(EncodingError::ByteLengthOverflow)?;

        let mut record = Vec::with_capacity(4 + name.len() + 4 + 4 * shape.len() + 12);
        encode_string(&mut record, name)?;
        record.extend_from_slice(&n_dims.to_le_bytes());
        for (index, &size) in shape.iter().enumerate().rev() {
            let size = u32::try_from(size)
                .map_err(|_| EncodingError::DimensionOverflow { index, size })?;
            record.extend_from_slice(&size.to_le_bytes());
        }
        record.extend_from_slice(&dtype.ggml_type().to_le_bytes());
        record.extend_from_slice(&offset.to_le_bytes());

        trace!(name, ?shape, %dtype, byte_length, offset, "tensor descriptor");

        self.bytes.extend_from_slice(&record);
        self.slots.push(TensorSlot {
            name: name.to_string(),
            shape: shape.to_vec(),
            dtype,
            byte_length,
            offset,
        });
        self.next_offset = next_offset;
        Ok(offset)
    }

    /// Number of descriptors appended.
    #[inline]
    pub fn count(&self) -> u32 {
        // bounded by the check in `push`
        self.slots.len() as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn slots(&self) -> &[TensorSlot] {
        &self.slots
    }

    /// Offset the next descriptor will be assigned; also the padded size of
    /// the data section so far.
    #[inline]
    pub fn next_offset(&self) -> u64 {
        self.next_offset
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
