use typewire_testkit::WireScript;

use crate::wire::test_support::{every_kind, raw_order, type_ref};
use crate::wire::{
	BinaryCodec, BinaryDecoder, BinaryEncoder, BinaryOptions, Codec, Endianness, Event, EventKind, EventProcessor, EventRecorder, ListBuilder,
	ObjectPath, TypeCode, Value, ValueBuilder, WireError, decode, encode,
};

fn decode_with(bytes: &[u8], options: BinaryOptions) -> Result<Value, WireError> {
	let mut builder = ValueBuilder::new();
	BinaryDecoder::new(bytes, options).decode_next(&mut builder)?;
	builder.finish()
}

#[test]
fn round_trips_every_kind_in_both_byte_orders() {
	let ranged = ListBuilder::new(type_ref("restricted<float64, [0.0..1e300]>")).with(Value::Float64(0.5)).build();
	let values = [
		every_kind(),
		raw_order(),
		Value::Null,
		Value::string(""),
		Value::Float64(f64::MIN_POSITIVE),
		Value::Float64(f64::NAN),
		Value::Float32(f32::NAN),
		Value::Float64(-0.0),
		Value::List(ranged),
	];
	for codec in [BinaryCodec::little_endian(), BinaryCodec::big_endian()] {
		for value in values.clone() {
			let bytes = encode(&value, &codec).expect("encode succeeds");
			assert_eq!(decode(&bytes, &codec).expect("decode succeeds"), value, "{}", codec.name());
		}
	}
}

#[test]
fn byte_orders_differ_on_the_wire() {
	let little = encode(&Value::Int32(1), &BinaryCodec::little_endian()).expect("encode little");
	let big = encode(&Value::Int32(1), &BinaryCodec::big_endian()).expect("encode big");
	assert_eq!(little, [TypeCode::Int32 as u8, 1, 0, 0, 0]);
	assert_eq!(big, [TypeCode::Int32 as u8, 0, 0, 0, 1]);
}

#[test]
fn list_layout_is_header_items_end() {
	let list = ListBuilder::new(type_ref("int32")).with(Value::Int32(7)).build();
	let bytes = encode(&Value::List(list), &BinaryCodec::little_endian()).expect("encode list");
	let expected = WireScript::new()
		.code(TypeCode::List as u8)
		.text("int32")
		.code(TypeCode::Int32 as u8)
		.i32(7)
		.code(TypeCode::End as u8)
		.into_bytes();
	assert_eq!(bytes, expected);
}

#[test]
fn negative_length_is_reported() {
	let bytes = WireScript::new().code(TypeCode::String as u8).i32(-12).into_bytes();
	let err = decode_with(&bytes, BinaryOptions::default()).expect_err("negative length should fail");
	assert!(matches!(err, WireError::NegativeLength { len: -12, at: 1 }));
	assert!(err.to_string().contains("negative buffer size: -12"), "{err}");
}

#[test]
fn distinguishes_decode_failures() {
	let unknown = WireScript::new().code(42).into_bytes();
	assert!(matches!(
		decode_with(&unknown, BinaryOptions::default()),
		Err(WireError::UnknownTypeCode { code: 42, at: 0 })
	));

	let truncated = WireScript::new().code(TypeCode::Int64 as u8).raw(&[1, 2, 3]).into_bytes();
	assert!(matches!(
		decode_with(&truncated, BinaryOptions::default()),
		Err(WireError::UnexpectedEof { at: 4, need: 5 })
	));

	let bad_utf8 = WireScript::new().code(TypeCode::String as u8).i32(2).raw(&[0xC3, 0x28]).into_bytes();
	assert!(matches!(decode_with(&bad_utf8, BinaryOptions::default()), Err(WireError::InvalidUtf8 { at: 1 })));

	let bad_bool = WireScript::new().code(TypeCode::Boolean as u8).raw(&[2]).into_bytes();
	assert!(matches!(
		decode_with(&bad_bool, BinaryOptions::default()),
		Err(WireError::InvalidBoolean { byte: 2, at: 1 })
	));

	let stray_end = WireScript::new().code(TypeCode::End as u8).into_bytes();
	assert!(matches!(
		decode_with(&stray_end, BinaryOptions::default()),
		Err(WireError::UnexpectedTypeCode { expected: "value", .. })
	));

	let value_in_field_position = WireScript::new().code(TypeCode::SymbolMap as u8).code(TypeCode::Int32 as u8).i32(1).into_bytes();
	assert!(matches!(
		decode_with(&value_in_field_position, BinaryOptions::default()),
		Err(WireError::UnexpectedTypeCode { expected: "field or end", at: 1, .. })
	));

	let bad_name = WireScript::new().code(TypeCode::Struct as u8).text("not a type").into_bytes();
	let err = decode_with(&bad_name, BinaryOptions::default()).expect_err("malformed name should fail");
	let WireError::MalformedName { at: 1, source } = err else {
		panic!("unexpected error {err}");
	};
	assert!(matches!(*source, WireError::InvalidTypeName { .. }));
}

#[test]
fn enforces_depth_and_length_limits() {
	let nested = WireScript::new()
		.code(TypeCode::List as u8)
		.text("list<int32>")
		.code(TypeCode::List as u8)
		.text("int32")
		.code(TypeCode::End as u8)
		.code(TypeCode::End as u8)
		.into_bytes();
	let shallow = BinaryOptions {
		max_depth: 1,
		..BinaryOptions::default()
	};
	assert!(matches!(decode_with(&nested, shallow), Err(WireError::DecodeDepthExceeded { max_depth: 1 })));
	decode_with(&nested, BinaryOptions::default()).expect("default depth accepts two levels");

	let long = WireScript::new().code(TypeCode::Buffer as u8).i32(4096).into_bytes();
	let tight = BinaryOptions {
		max_buffer_len: 1024,
		..BinaryOptions::for_untrusted_input()
	};
	assert!(matches!(
		decode_with(&long, tight),
		Err(WireError::BufferTooLarge { len: 4096, max: 1024, at: 1 })
	));
}

#[test]
fn trailing_bytes_stay_on_the_stream() {
	let codec = BinaryCodec::little_endian();
	let first = encode(&raw_order(), &codec).expect("encode first");
	let second = encode(&Value::Int32(99), &codec).expect("encode second");
	let mut stream = first.clone();
	stream.extend_from_slice(&second);

	let mut decoder = BinaryDecoder::new(stream.as_slice(), BinaryOptions::default());
	let mut builder = ValueBuilder::new();
	decoder.decode_next(&mut builder).expect("first value decodes");
	assert_eq!(builder.finish().expect("first value"), raw_order());
	assert_eq!(decoder.position(), first.len() as u64);
	assert_eq!(decoder.into_inner(), second.as_slice());

	let mut decoder = BinaryDecoder::new(stream.as_slice(), BinaryOptions::default());
	decoder.decode_next(&mut ValueBuilder::new()).expect("first value decodes");
	let mut builder = ValueBuilder::new();
	decoder.decode_next(&mut builder).expect("second value decodes");
	assert_eq!(builder.finish().expect("second value"), Value::Int32(99));
}

#[test]
fn decoder_streams_events_with_paths() {
	let bytes = encode(&raw_order(), &BinaryCodec::little_endian()).expect("encode");
	let mut recorder = EventRecorder::new();
	BinaryDecoder::new(bytes.as_slice(), BinaryOptions::default()).decode_next(&mut recorder).expect("decode");
	let lines = recorder.lines();
	assert_eq!(lines.first().map(String::as_str), Some("$ map-start"));
	assert!(lines.contains(&"$.lines[1].quantity value int32 7".to_owned()), "{lines:#?}");
	assert_eq!(lines.last().map(String::as_str), Some("$ end"));
}

#[test]
fn encoder_rejects_composite_value_events_and_stray_end() {
	let mut out = Vec::new();
	let mut encoder = BinaryEncoder::new(&mut out, Endianness::Little);
	let composite = Event::new(EventKind::Value(raw_order()), ObjectPath::root());
	assert!(matches!(encoder.process_event(composite), Err(WireError::Protocol { .. })));
	let end = Event::new(EventKind::End, ObjectPath::root());
	assert!(matches!(encoder.process_event(end), Err(WireError::Protocol { .. })));
}

#[test]
fn codec_names_follow_byte_order() {
	assert_eq!(BinaryCodec::little_endian().name(), BinaryCodec::NAME);
	assert_eq!(BinaryCodec::big_endian().name(), BinaryCodec::BIG_ENDIAN_NAME);
	assert_eq!(BinaryCodec::big_endian().options().endianness, Endianness::Big);
	assert_eq!(TypeCode::from_u8(16), Some(TypeCode::End));
	assert_eq!(TypeCode::from_u8(17), None);
}
