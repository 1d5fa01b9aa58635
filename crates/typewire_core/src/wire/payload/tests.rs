use typewire_testkit::scratch_path;

use crate::wire::test_support::{every_kind, raw_order};
use crate::wire::{BinaryCodec, BinaryOptions, Compression, DecompressOptions, EventRecorder, Payload, Value, WireError, encode};

fn concatenated(codec: &BinaryCodec, values: &[Value]) -> Vec<u8> {
	values.iter().flat_map(|value| encode(value, codec).expect("encode succeeds")).collect()
}

#[test]
fn decodes_every_concatenated_value() {
	let values = [raw_order(), Value::Int32(7), every_kind()];
	let payload = Payload::from_bytes(concatenated(&BinaryCodec::little_endian(), &values)).expect("payload wraps");
	assert_eq!(payload.compression, Compression::None);
	assert_eq!(payload.decode_all(&BinaryOptions::default()).expect("decode all"), values);
	assert_eq!(payload.decode_first(&BinaryOptions::default()).expect("decode first"), raw_order());
}

#[test]
fn empty_payload_has_no_values() {
	let payload = Payload::from_bytes(Vec::new()).expect("payload wraps");
	assert!(payload.decode_all(&BinaryOptions::default()).expect("decode all").is_empty());
	assert!(payload.decode_first(&BinaryOptions::default()).is_err());
}

#[test]
fn opens_compressed_big_endian_file() {
	let codec = BinaryCodec::big_endian();
	let raw = concatenated(&codec, &[Value::string("first"), Value::Uint64(9)]);
	let compressed = zstd::encode_all(raw.as_slice(), 3).expect("compress");
	let path = scratch_path("payload-open.twb.zst");
	std::fs::write(&path, compressed).expect("write payload");

	let payload = Payload::open(&path).expect("payload opens");
	assert_eq!(payload.compression, Compression::Zstd);
	assert_eq!(payload.bytes(), raw.as_slice());
	let values = payload.decode_all(&BinaryOptions::big_endian()).expect("decode all");
	assert_eq!(values, [Value::string("first"), Value::Uint64(9)]);

	let mut recorder = EventRecorder::new();
	payload.stream_first(&BinaryOptions::big_endian(), &mut recorder).expect("stream first");
	assert_eq!(recorder.lines(), [r#"$ value string "first""#]);
	let _ = std::fs::remove_file(path);
}

#[test]
fn decompression_limit_is_configurable() {
	let raw = concatenated(&BinaryCodec::little_endian(), &[Value::Buffer(vec![0; 2048])]);
	let compressed = zstd::encode_all(raw.as_slice(), 3).expect("compress");
	let path = scratch_path("payload-limit.twb.zst");
	std::fs::write(&path, &compressed).expect("write payload");

	let tight = DecompressOptions { max_output_bytes: 512 };
	let err = Payload::open_with(&path, &tight).err().expect("limit applies");
	assert!(matches!(err, WireError::DecompressedTooLarge { limit: 512 }));
	assert!(Payload::from_bytes_with(compressed, &DecompressOptions::default()).is_ok());
	let _ = std::fs::remove_file(path);
}
