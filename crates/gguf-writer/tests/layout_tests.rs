//! End-to-end layout tests: write a complete container into memory and walk
//! it back byte by byte.

use gguf_writer::{GgufValue, GgufWriter, TensorDType, WriterConfig, pad};
use std::io::Cursor;

/// Minimal little-endian cursor over a written container.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> &'a [u8] {
        let out = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        out
    }

    fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take(4).try_into().unwrap())
    }

    fn u64(&mut self) -> u64 {
        u64::from_le_bytes(self.take(8).try_into().unwrap())
    }

    fn string(&mut self) -> String {
        let len = self.u32() as usize;
        String::from_utf8(self.take(len).to_vec()).unwrap()
    }
}

#[derive(Debug, PartialEq)]
struct Descriptor {
    name: String,
    dims: Vec<u32>,
    dtype: u32,
    offset: u64,
}

fn read_descriptor(r: &mut Reader<'_>) -> Descriptor {
    let name = r.string();
    let n_dims = r.u32();
    let dims = (0..n_dims).map(|_| r.u32()).collect();
    let dtype = r.u32();
    let offset = r.u64();
    Descriptor { name, dims, dtype, offset }
}

fn write_two_tensor_file(a: &[u8], b: &[u8], config: WriterConfig) -> Vec<u8> {
    let mut w = GgufWriter::with_config(Cursor::new(Vec::new()), config).unwrap();
    w.add_architecture("llama").unwrap();
    w.add_name("test").unwrap();
    w.add_tensor_info("a", &[4, 8], TensorDType::F32, a.len() as u64).unwrap();
    w.add_tensor_info("b", &[4, 8], TensorDType::F32, b.len() as u64).unwrap();
    w.write_header().unwrap();
    w.write_metadata().unwrap();
    w.write_tensor_descriptors().unwrap();
    w.write_tensor_payload(a).unwrap();
    w.write_tensor_payload(b).unwrap();
    w.close().unwrap().into_inner()
}

#[test]
fn two_tensor_file_layout() {
    let a = vec![0xaa; 128];
    let b = vec![0xbb; 128];
    let bytes = write_two_tensor_file(&a, &b, WriterConfig::default());
    let mut r = Reader::new(&bytes);

    // header
    assert_eq!(r.take(4), b"GGUF");
    assert_eq!(r.u32(), 1);
    assert_eq!(r.u32(), 2, "tensor count");
    assert_eq!(r.u32(), 2, "metadata count");

    // metadata, in insertion order
    assert_eq!(r.string(), "general.architecture");
    assert_eq!(r.u32(), 8, "STRING tag");
    assert_eq!(r.string(), "llama");
    assert_eq!(r.string(), "general.name");
    assert_eq!(r.u32(), 8, "STRING tag");
    assert_eq!(r.string(), "test");

    // descriptors, dims innermost first
    assert_eq!(
        read_descriptor(&mut r),
        Descriptor { name: "a".into(), dims: vec![8, 4], dtype: 0, offset: 0 }
    );
    assert_eq!(
        read_descriptor(&mut r),
        Descriptor { name: "b".into(), dims: vec![8, 4], dtype: 0, offset: 128 }
    );

    // data section starts at the next aligned position
    let prefix = r.pos as u64;
    let data_start = pad(prefix, 32) as usize;
    assert!(bytes[r.pos..data_start].iter().all(|&x| x == 0));

    assert_eq!(&bytes[data_start..data_start + 128], &a[..]);
    assert_eq!(&bytes[data_start + 128..data_start + 256], &b[..]);
    assert_eq!(bytes.len(), data_start + 256);
}

#[test]
fn unaligned_payloads_are_zero_padded() {
    let a = vec![0x11; 100];
    let b = vec![0x22; 50];
    let bytes = {
        let mut w = GgufWriter::new(Cursor::new(Vec::new()));
        w.add_tensor_info("a", &[25], TensorDType::F32, 100).unwrap();
        w.add_tensor_info("b", &[25], TensorDType::F16, 50).unwrap();
        w.write_header().unwrap();
        w.write_metadata().unwrap();
        w.write_tensor_descriptors().unwrap();
        w.write_tensor_payload(&a).unwrap();
        w.write_tensor_payload(&b).unwrap();
        w.close().unwrap().into_inner()
    };

    let mut r = Reader::new(&bytes);
    r.take(16);
    let da = read_descriptor(&mut r);
    let db = read_descriptor(&mut r);
    assert_eq!((da.offset, db.offset), (0, 128));
    assert_eq!(db.dtype, 1);

    let data_start = pad(r.pos as u64, 32) as usize;
    let a_at = data_start + da.offset as usize;
    let b_at = data_start + db.offset as usize;
    assert_eq!(&bytes[a_at..a_at + 100], &a[..]);
    assert!(bytes[a_at + 100..b_at].iter().all(|&x| x == 0));
    assert_eq!(&bytes[b_at..b_at + 50], &b[..]);
    // trailing padding after the last payload
    assert_eq!(bytes.len(), b_at + 64);
    assert!(bytes[b_at + 50..].iter().all(|&x| x == 0));
}

#[test]
fn custom_alignment_is_recorded_and_applied() {
    let config = WriterConfig { alignment: 64, ..WriterConfig::default() };
    let a = vec![1u8; 128];
    let b = vec![2u8; 128];
    let bytes = write_two_tensor_file(&a, &b, config);

    let mut r = Reader::new(&bytes);
    r.take(8);
    assert_eq!(r.u32(), 2);
    assert_eq!(r.u32(), 3, "general.alignment counts as metadata");

    assert_eq!(r.string(), "general.alignment");
    assert_eq!(r.u32(), 4, "UINT32 tag");
    assert_eq!(r.u32(), 64);
    r.string();
    r.u32();
    r.string();
    r.string();
    r.u32();
    r.string();

    let da = read_descriptor(&mut r);
    let db = read_descriptor(&mut r);
    assert_eq!((da.offset, db.offset), (0, 128));

    let data_start = pad(r.pos as u64, 64) as usize;
    assert_eq!(data_start % 64, 0);
    assert_eq!(&bytes[data_start..data_start + 128], &a[..]);
    assert_eq!(&bytes[data_start + 128..data_start + 256], &b[..]);
}

#[test]
fn array_metadata_layout() {
    let mut w = GgufWriter::new(Cursor::new(Vec::new()));
    w.add_array("tokenizer.ggml.tokens", ["<s>", "hi"]).unwrap();
    w.add_metadata("nested", GgufValue::from(vec![GgufValue::from(vec![1, 2])])).unwrap();
    w.write_header().unwrap();
    w.write_metadata().unwrap();
    w.write_tensor_descriptors().unwrap();
    let bytes = w.close().unwrap().into_inner();

    let mut r = Reader::new(&bytes);
    r.take(16);
    assert_eq!(r.string(), "tokenizer.ggml.tokens");
    assert_eq!(r.u32(), 9, "ARRAY tag");
    assert_eq!(r.u32(), 8, "element tag STRING");
    assert_eq!(r.u32(), 2);
    assert_eq!(r.string(), "<s>");
    assert_eq!(r.string(), "hi");

    assert_eq!(r.string(), "nested");
    assert_eq!(r.u32(), 9);
    assert_eq!(r.u32(), 9, "element tag ARRAY");
    assert_eq!(r.u32(), 1);
    // inner array: element tag, count, untagged elements
    assert_eq!(r.u32(), 5, "element tag INT32");
    assert_eq!(r.u32(), 2);
    assert_eq!(r.u32(), 1);
    assert_eq!(r.u32(), 2);
    assert_eq!(r.pos, bytes.len());
}

#[test]
fn typed_payload_helpers_write_little_endian() {
    let values = [1.0f32, -2.5, 0.0, f32::MIN_POSITIVE];
    let halves = [half::f16::from_f32(1.0), half::f16::from_f32(-0.5)];
    let mut w = GgufWriter::new(Cursor::new(Vec::new()));
    w.add_tensor_info_for("f", &[4], TensorDType::F32).unwrap();
    w.add_tensor_info_for("h", &[2], TensorDType::F16).unwrap();
    w.write_header().unwrap();
    w.write_metadata().unwrap();
    w.write_tensor_descriptors().unwrap();
    let data_start = pad(w.position(), 32) as usize;
    w.write_tensor_f32(&values).unwrap();
    w.write_tensor_f16(&halves).unwrap();
    let bytes = w.close().unwrap().into_inner();

    for (i, v) in values.iter().enumerate() {
        let at = data_start + i * 4;
        assert_eq!(&bytes[at..at + 4], &v.to_le_bytes());
    }
    let h_at = data_start + 32;
    assert_eq!(&bytes[h_at..h_at + 2], &halves[0].to_le_bytes());
    assert_eq!(&bytes[h_at + 2..h_at + 4], &halves[1].to_le_bytes());
}
