use crate::wire::{ByteReader, ByteWriter, Endianness, WireError};

#[test]
fn writer_and_reader_agree_on_byte_order() {
	for endianness in [Endianness::Little, Endianness::Big] {
		let mut writer = ByteWriter::new(Vec::new(), endianness);
		writer.write_i32(-12).expect("write i32");
		writer.write_u64(0x1122_3344_5566_7788).expect("write u64");
		writer.write_f64(2.5).expect("write f64");
		assert_eq!(writer.pos(), 20);
		let bytes = writer.into_inner();

		let mut reader = ByteReader::new(bytes.as_slice(), endianness);
		assert_eq!(reader.read_i32().expect("read i32"), -12);
		assert_eq!(reader.read_u64().expect("read u64"), 0x1122_3344_5566_7788);
		assert_eq!(reader.read_f64().expect("read f64"), 2.5);
		assert_eq!(reader.pos(), 20);
	}
}

#[test]
fn big_endian_layout_is_most_significant_first() {
	let mut writer = ByteWriter::new(Vec::new(), Endianness::Big);
	writer.write_u32(0x0102_0304).expect("write u32");
	assert_eq!(writer.into_inner(), [1, 2, 3, 4]);
}

#[test]
fn truncated_read_reports_offset_and_need() {
	let bytes = [1_u8, 2, 3];
	let mut reader = ByteReader::new(&bytes[..], Endianness::Little);
	reader.read_u8().expect("first byte");
	let err = reader.read_u32().expect_err("short read should fail");
	assert!(matches!(err, WireError::UnexpectedEof { at: 3, need: 2 }));
}

#[test]
fn reader_leaves_unread_bytes_on_stream() {
	let bytes = [7_u8, 8, 9];
	let mut source = &bytes[..];
	let mut reader = ByteReader::new(&mut source, Endianness::Little);
	assert_eq!(reader.read_bytes(2).expect("two bytes"), [7, 8]);
	drop(reader);
	assert_eq!(source, [9]);
}
