use std::io::{Read, Write};

use crate::wire::{Codec, Endianness, EventProcessor, Result};

mod decoder;
mod encoder;

pub use decoder::BinaryDecoder;
pub use encoder::BinaryEncoder;

/// One-byte tag opening every unit on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TypeCode {
	/// Null marker, no payload.
	Null = 0,
	/// One byte, `0` or `1`.
	Boolean = 1,
	/// Length-prefixed UTF-8.
	String = 2,
	/// Length-prefixed bytes.
	Buffer = 3,
	/// `i64` seconds then `u32` nanoseconds.
	Timestamp = 4,
	/// Fixed-width `i32`.
	Int32 = 5,
	/// Fixed-width `i64`.
	Int64 = 6,
	/// Fixed-width `u32`.
	Uint32 = 7,
	/// Fixed-width `u64`.
	Uint64 = 8,
	/// Fixed-width `f32`.
	Float32 = 9,
	/// Fixed-width `f64`.
	Float64 = 10,
	/// Type name then constant.
	Enum = 11,
	/// Field entries then end.
	SymbolMap = 12,
	/// Type name, field entries, then end.
	Struct = 13,
	/// Element type reference, items, then end.
	List = 14,
	/// Field identifier, followed by the field's value.
	Field = 15,
	/// Closes the innermost composite.
	End = 16,
}

impl TypeCode {
	/// Map a raw byte to its code.
	pub fn from_u8(byte: u8) -> Option<Self> {
		Some(match byte {
			0 => Self::Null,
			1 => Self::Boolean,
			2 => Self::String,
			3 => Self::Buffer,
			4 => Self::Timestamp,
			5 => Self::Int32,
			6 => Self::Int64,
			7 => Self::Uint32,
			8 => Self::Uint64,
			9 => Self::Float32,
			10 => Self::Float64,
			11 => Self::Enum,
			12 => Self::SymbolMap,
			13 => Self::Struct,
			14 => Self::List,
			15 => Self::Field,
			16 => Self::End,
			_ => return None,
		})
	}
}

/// Limits and byte order for binary encoding and decoding.
#[derive(Debug, Clone)]
pub struct BinaryOptions {
	/// Byte order of fixed-width numerics and length prefixes.
	pub endianness: Endianness,
	/// Maximum composite nesting depth accepted by the decoder.
	pub max_depth: u32,
	/// Maximum accepted length prefix for strings, buffers, and names.
	pub max_buffer_len: usize,
}

impl Default for BinaryOptions {
	fn default() -> Self {
		Self {
			endianness: Endianness::Little,
			max_depth: 64,
			max_buffer_len: 64 * 1024 * 1024,
		}
	}
}

impl BinaryOptions {
	/// Default limits with big-endian byte order.
	pub fn big_endian() -> Self {
		Self {
			endianness: Endianness::Big,
			..Self::default()
		}
	}

	/// Tight limits for inspecting untrusted payloads.
	pub fn for_untrusted_input() -> Self {
		Self {
			endianness: Endianness::Little,
			max_depth: 16,
			max_buffer_len: 1024 * 1024,
		}
	}
}

/// [`Codec`] over the binary wire format.
#[derive(Debug, Clone, Default)]
pub struct BinaryCodec {
	options: BinaryOptions,
}

impl BinaryCodec {
	/// Registry name of the little-endian codec.
	pub const NAME: &'static str = "binary";
	/// Registry name of the big-endian codec.
	pub const BIG_ENDIAN_NAME: &'static str = "binaryBigEndian";

	/// Codec with explicit options.
	pub fn new(options: BinaryOptions) -> Self {
		Self { options }
	}

	/// Little-endian codec with default limits.
	pub fn little_endian() -> Self {
		Self::default()
	}

	/// Big-endian codec with default limits.
	pub fn big_endian() -> Self {
		Self::new(BinaryOptions::big_endian())
	}

	/// Active options.
	pub fn options(&self) -> &BinaryOptions {
		&self.options
	}
}

impl Codec for BinaryCodec {
	fn name(&self) -> &'static str {
		match self.options.endianness {
			Endianness::Little => Self::NAME,
			Endianness::Big => Self::BIG_ENDIAN_NAME,
		}
	}

	fn encoder_to<'w>(&self, writer: &'w mut dyn Write) -> Box<dyn EventProcessor + 'w> {
		Box::new(BinaryEncoder::new(writer, self.options.endianness))
	}

	fn decode_from(&self, reader: &mut dyn Read, processor: &mut dyn EventProcessor) -> Result<()> {
		BinaryDecoder::new(reader, self.options.clone()).decode_next(processor)
	}
}

#[cfg(test)]
mod tests;
