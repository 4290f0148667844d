//! The phase-checked GGUF writer.
//!
//! A file is produced by one [`GgufWriter`] in a fixed order:
//!
//! ```text
//! Configuring ──write_header──▶ HeaderWritten ──write_metadata──▶ MetadataWritten
//!     ──write_tensor_descriptors──▶ DescriptorsWritten
//!     ──write_tensor_payload × n──▶ WritingPayloads(n) ──close──▶ Closed
//! ```
//!
//! Metadata and descriptors may only be added while configuring. Any call
//! made in the wrong phase fails with [`ProtocolError::OutOfOrder`] instead of
//! producing a corrupt file. An I/O failure poisons the writer.

use crate::config::WriterConfig;
use crate::error::{GgufWriteError, ProtocolError, Result};
use crate::metadata::MetadataBuffer;
use crate::tensor_info::{TensorInfoBuffer, TensorSlot};
use gguf_format::{
    GGUF_DEFAULT_ALIGNMENT, GGUF_HEADER_LEN, GGUF_MAGIC, GGUF_VERSION, GgufValue, TensorDType,
    keys, padding_len,
};
use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{debug, trace};

/// Where a [`GgufWriter`] is in its write protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterPhase {
    /// Accepting alignment, metadata and tensor descriptors.
    Configuring,
    HeaderWritten,
    MetadataWritten,
    DescriptorsWritten,
    /// This many tensor payloads have been written.
    WritingPayloads(usize),
    Closed,
    /// A stream write failed; the output is truncated.
    Failed,
}

impl fmt::Display for WriterPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuring => f.write_str("configuring"),
            Self::HeaderWritten => f.write_str("header-written"),
            Self::MetadataWritten => f.write_str("metadata-written"),
            Self::DescriptorsWritten => f.write_str("descriptors-written"),
            Self::WritingPayloads(k) => write!(f, "writing-payloads({k})"),
            Self::Closed => f.write_str("closed"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// Byte sink that tracks its own stream position.
struct CountingWriter<W> {
    inner: W,
    position: u64,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.position += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

const ZEROS: [u8; 4096] = [0u8; 4096];

fn write_zeros<W: Write>(w: &mut W, mut n: u64) -> io::Result<()> {
    while n > 0 {
        let chunk = n.min(ZEROS.len() as u64) as usize;
        w.write_all(&ZEROS[..chunk])?;
        n -= chunk as u64;
    }
    Ok(())
}

/// Zero-pad to the next aligned position, write `bytes`, then zero-pad
/// `bytes` up to a whole number of alignment units.
fn write_aligned<W: Write>(w: &mut CountingWriter<W>, bytes: &[u8], align: u64) -> io::Result<()> {
    let lead = padding_len(w.position, align);
    write_zeros(w, lead)?;
    w.write_all(bytes)?;
    write_zeros(w, padding_len(bytes.len() as u64, align))
}

/// Streaming GGUF encoder over any byte sink.
///
/// # Example
///
/// ```
/// use gguf_writer::{GgufWriter, TensorDType};
/// use std::io::Cursor;
///
/// let mut w = GgufWriter::new(Cursor::new(Vec::new()));
/// w.add_architecture("llama")?;
/// w.add_tensor_info("a", &[4, 8], TensorDType::F32, 128)?;
/// w.write_header()?;
/// w.write_metadata()?;
/// w.write_tensor_descriptors()?;
/// w.write_tensor_f32(&[0.0; 32])?;
/// let bytes = w.close()?.into_inner();
/// assert_eq!(&bytes[..4], b"GGUF");
/// # Ok::<(), gguf_writer::GgufWriteError>(())
/// ```
pub struct GgufWriter<W: Write> {
    sink: Option<CountingWriter<W>>,
    config: WriterConfig,
    alignment: u32,
    metadata: MetadataBuffer,
    tensors: TensorInfoBuffer,
    phase: WriterPhase,
}

impl GgufWriter<BufWriter<File>> {
    /// Create (or truncate) `path` and write to it through a buffered sink.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, WriterConfig::default())
    }

    pub fn open_with_config(path: impl AsRef<Path>, config: WriterConfig) -> Result<Self> {
        config.validate()?;
        let path = path.as_ref();
        let file = File::create(path)?;
        debug!(path = %path.display(), "opened GGUF output");
        Self::with_config(BufWriter::with_capacity(config.buffer_capacity, file), config)
    }
}

impl<W: Write> GgufWriter<W> {
    /// Writer with the default configuration (alignment 32).
    pub fn new(sink: W) -> Self {
        Self {
            sink: Some(CountingWriter { inner: sink, position: 0 }),
            config: WriterConfig::default(),
            alignment: GGUF_DEFAULT_ALIGNMENT,
            metadata: MetadataBuffer::new(),
            tensors: TensorInfoBuffer::new(),
            phase: WriterPhase::Configuring,
        }
    }

    /// Writer with explicit configuration.
    ///
    /// A non-default alignment is applied through [`set_alignment`](Self::set_alignment),
    /// so the `general.alignment` entry is recorded for readers.
    pub fn with_config(sink: W, config: WriterConfig) -> Result<Self> {
        config.validate()?;
        let alignment = config.alignment;
        let mut writer = Self { config, ..Self::new(sink) };
        if alignment != GGUF_DEFAULT_ALIGNMENT {
            writer.set_alignment(alignment)?;
        }
        Ok(writer)
    }

    pub fn phase(&self) -> WriterPhase {
        self.phase
    }

    pub fn alignment(&self) -> u32 {
        self.alignment
    }

    pub fn metadata_count(&self) -> u32 {
        self.metadata.count()
    }

    pub fn tensor_count(&self) -> u32 {
        self.tensors.count()
    }

    /// Declared tensors with their assigned offsets, in descriptor order.
    pub fn tensors(&self) -> &[TensorSlot] {
        self.tensors.slots()
    }

    /// Bytes written to the sink so far.
    pub fn position(&self) -> u64 {
        self.sink.as_ref().map_or(0, |s| s.position)
    }

    // -----------------------------------------------------------------------
    // Configuring
    // -----------------------------------------------------------------------

    /// Set the payload alignment and record it as `general.alignment`.
    ///
    /// Must precede the first tensor descriptor.
    pub fn set_alignment(&mut self, alignment: u32) -> Result<()> {
        self.expect_phase("set_alignment", WriterPhase::Configuring)?;
        if alignment == 0 {
            return Err(GgufWriteError::InvalidAlignment(alignment));
        }
        if !self.tensors.is_empty() {
            return Err(ProtocolError::AlignmentLocked { tensors: self.tensors.count() }.into());
        }
        self.metadata.push(keys::general::ALIGNMENT, &GgufValue::Uint32(alignment))?;
        self.alignment = alignment;
        debug!(alignment, "payload alignment set");
        Ok(())
    }

    /// Append a metadata entry. Empty string values are skipped.
    ///
    /// Plain Rust values go through inference (`&str` → STRING, `f32` →
    /// FLOAT32, `i32` → INT32, ...); build a [`GgufValue`] variant or use the
    /// typed setters for other widths.
    pub fn add_metadata(&mut self, key: &str, value: impl Into<GgufValue>) -> Result<()> {
        self.expect_phase("add_metadata", WriterPhase::Configuring)?;
        self.metadata.push(key, &value.into())?;
        Ok(())
    }

    pub fn add_uint8(&mut self, key: &str, value: u8) -> Result<()> {
        self.add_metadata(key, GgufValue::Uint8(value))
    }

    pub fn add_int8(&mut self, key: &str, value: i8) -> Result<()> {
        self.add_metadata(key, GgufValue::Int8(value))
    }

    pub fn add_uint16(&mut self, key: &str, value: u16) -> Result<()> {
        self.add_metadata(key, GgufValue::Uint16(value))
    }

    pub fn add_int16(&mut self, key: &str, value: i16) -> Result<()> {
        self.add_metadata(key, GgufValue::Int16(value))
    }

    pub fn add_uint32(&mut self, key: &str, value: u32) -> Result<()> {
        self.add_metadata(key, GgufValue::Uint32(value))
    }

    pub fn add_int32(&mut self, key: &str, value: i32) -> Result<()> {
        self.add_metadata(key, GgufValue::Int32(value))
    }

    pub fn add_float32(&mut self, key: &str, value: f32) -> Result<()> {
        self.add_metadata(key, GgufValue::Float32(value))
    }

    pub fn add_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.add_metadata(key, GgufValue::Bool(value))
    }

    pub fn add_string(&mut self, key: &str, value: &str) -> Result<()> {
        self.add_metadata(key, GgufValue::String(value.to_string()))
    }

    /// Append a homogeneous array entry; element tags are inferred.
    pub fn add_array<I, T>(&mut self, key: &str, values: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<GgufValue>,
    {
        self.add_metadata(key, GgufValue::array(values))
    }

    /// Declare a tensor and return its data-section offset.
    ///
    /// `shape` is in logical (outer-to-inner) order. `byte_length` is the
    /// exact size of the payload that will be written for it.
    pub fn add_tensor_info(
        &mut self,
        name: &str,
        shape: &[u64],
        dtype: TensorDType,
        byte_length: u64,
    ) -> Result<u64> {
        self.expect_phase("add_tensor_info", WriterPhase::Configuring)?;
        Ok(self.tensors.push(name, shape, dtype, byte_length, self.alignment)?)
    }

    /// Declare a tensor whose byte length follows from `shape` and `dtype`.
    pub fn add_tensor_info_for(
        &mut self,
        name: &str,
        shape: &[u64],
        dtype: TensorDType,
    ) -> Result<u64> {
        let byte_length = dtype.byte_length(shape)?;
        self.add_tensor_info(name, shape, dtype, byte_length)
    }

    // -----------------------------------------------------------------------
    // Writing
    // -----------------------------------------------------------------------

    /// Emit the fixed header with the buffered tensor and metadata counts.
    pub fn write_header(&mut self) -> Result<()> {
        self.expect_phase("write_header", WriterPhase::Configuring)?;
        let mut header = [0u8; GGUF_HEADER_LEN];
        header[0..4].copy_from_slice(&GGUF_MAGIC);
        header[4..8].copy_from_slice(&GGUF_VERSION.to_le_bytes());
        header[8..12].copy_from_slice(&self.tensors.count().to_le_bytes());
        header[12..16].copy_from_slice(&self.metadata.count().to_le_bytes());

        let res = self.sink_mut()?.write_all(&header);
        self.check_io(res)?;
        self.end_phase()?;
        debug!(
            tensors = self.tensors.count(),
            metadata = self.metadata.count(),
            "wrote GGUF header"
        );
        self.phase = WriterPhase::HeaderWritten;
        Ok(())
    }

    /// Emit the accumulated metadata entries verbatim.
    pub fn write_metadata(&mut self) -> Result<()> {
        self.expect_phase("write_metadata", WriterPhase::HeaderWritten)?;
        let sink = self.sink.as_mut().ok_or(ProtocolError::Closed)?;
        let res = sink.write_all(self.metadata.as_bytes());
        self.check_io(res)?;
        self.end_phase()?;
        debug!(bytes = self.metadata.as_bytes().len(), "wrote metadata");
        self.phase = WriterPhase::MetadataWritten;
        Ok(())
    }

    /// Emit the accumulated tensor descriptors verbatim.
    pub fn write_tensor_descriptors(&mut self) -> Result<()> {
        self.expect_phase("write_tensor_descriptors", WriterPhase::MetadataWritten)?;
        let sink = self.sink.as_mut().ok_or(ProtocolError::Closed)?;
        let res = sink.write_all(self.tensors.as_bytes());
        self.check_io(res)?;
        self.end_phase()?;
        debug!(bytes = self.tensors.as_bytes().len(), "wrote tensor descriptors");
        self.phase = WriterPhase::DescriptorsWritten;
        Ok(())
    }

    /// Emit the next tensor's raw bytes, padded so it starts and ends aligned.
    ///
    /// Payloads must follow descriptor order, and each must be exactly the
    /// declared byte length. The writer can only check the length: two
    /// payloads of equal length written in swapped order are accepted, and
    /// each lands under the other's descriptor.
    pub fn write_tensor_payload(&mut self, bytes: &[u8]) -> Result<()> {
        let index = match self.phase {
            WriterPhase::DescriptorsWritten => 0,
            WriterPhase::WritingPayloads(k) => k,
            phase => return Err(Self::phase_error("write_tensor_payload", phase)),
        };
        let Some(slot) = self.tensors.slots().get(index) else {
            return Err(ProtocolError::UnexpectedPayload { declared: self.tensors.count() }.into());
        };
        let actual = bytes.len() as u64;
        if actual != slot.byte_length {
            return Err(ProtocolError::PayloadLengthMismatch {
                index,
                name: slot.name.clone(),
                expected: slot.byte_length,
                actual,
            }
            .into());
        }

        let align = u64::from(self.alignment);
        let sink = self.sink.as_mut().ok_or(ProtocolError::Closed)?;
        let res = write_aligned(sink, bytes, align);
        self.check_io(res)?;

        trace!(index, name = %self.tensors.slots()[index].name, bytes = actual, "wrote tensor payload");
        self.phase = WriterPhase::WritingPayloads(index + 1);
        Ok(())
    }

    /// Write an F32 payload from its elements (stored little-endian).
    pub fn write_tensor_f32(&mut self, data: &[f32]) -> Result<()> {
        let bytes: Cow<'_, [u8]> = if cfg!(target_endian = "little") {
            Cow::Borrowed(bytemuck::cast_slice(data))
        } else {
            Cow::Owned(data.iter().flat_map(|v| v.to_le_bytes()).collect())
        };
        self.write_tensor_payload(&bytes)
    }

    /// Write an F16 payload from its elements (stored little-endian).
    pub fn write_tensor_f16(&mut self, data: &[half::f16]) -> Result<()> {
        let bytes: Cow<'_, [u8]> = if cfg!(target_endian = "little") {
            Cow::Borrowed(bytemuck::cast_slice(data))
        } else {
            Cow::Owned(data.iter().flat_map(|v| v.to_le_bytes()).collect())
        };
        self.write_tensor_payload(&bytes)
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        let res = self.sink_mut()?.flush();
        self.check_io(res)
    }

    /// Finish the file and hand back the sink.
    ///
    /// Fails if called before the descriptors are written or while tensor
    /// payloads are still owed. On failure the writer keeps the sink; drop
    /// it to release the stream.
    pub fn close(&mut self) -> Result<W> {
        let declared = self.tensors.count();
        let written = match self.phase {
            WriterPhase::DescriptorsWritten => 0,
            WriterPhase::WritingPayloads(k) => k,
            phase => return Err(Self::phase_error("close", phase)),
        };
        if written < declared as usize {
            return Err(ProtocolError::MissingPayloads { written, declared }.into());
        }
        self.flush()?;
        let sink = self.sink.take().ok_or(ProtocolError::Closed)?;
        self.phase = WriterPhase::Closed;
        debug!(bytes = sink.position, tensors = declared, "closed GGUF output");
        Ok(sink.inner)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn expect_phase(&self, operation: &'static str, expected: WriterPhase) -> Result<()> {
        if self.phase == expected {
            return Ok(());
        }
        Err(Self::phase_error(operation, self.phase))
    }

    fn phase_error(operation: &'static str, phase: WriterPhase) -> GgufWriteError {
        match phase {
            WriterPhase::Closed => ProtocolError::Closed.into(),
            WriterPhase::Failed => ProtocolError::Poisoned.into(),
            phase => ProtocolError::OutOfOrder { operation, phase }.into(),
        }
    }

    fn sink_mut(&mut self) -> Result<&mut CountingWriter<W>> {
        Ok(self.sink.as_mut().ok_or(ProtocolError::Closed)?)
    }

    fn check_io(&mut self, res: io::Result<()>) -> Result<()> {
        res.map_err(|e| {
            self.phase = WriterPhase::Failed;
            GgufWriteError::Io(e)
        })
    }

    fn end_phase(&mut self) -> Result<()> {
        if self.config.flush_each_phase {
            self.flush()?;
        }
        Ok(())
    }
}

impl<W: Write> fmt::Debug for GgufWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GgufWriter")
            .field("phase", &self.phase)
            .field("alignment", &self.alignment)
            .field("metadata_count", &self.metadata.count())
            .field("tensor_count", &self.tensors.count())
            .field("position", &self.position())
            .finish()
    }
}
