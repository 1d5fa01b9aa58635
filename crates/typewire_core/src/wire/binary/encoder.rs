use std::io::Write;

use crate::wire::{ByteWriter, Endianness, Event, EventKind, EventProcessor, ObjectPath, Result, TypeCode, Value, WireError};

/// Event sink that serializes each event to the binary wire format as it arrives.
///
/// Bytes are written immediately; a failure partway through leaves partial output on the
/// stream. The writer is flushed each time a top-level value closes.
pub struct BinaryEncoder<W> {
	writer: ByteWriter<W>,
	depth: usize,
}

impl<W: Write> BinaryEncoder<W> {
	/// Encode onto `inner` with the given byte order.
	pub fn new(inner: W, endianness: Endianness) -> Self {
		Self {
			writer: ByteWriter::new(inner, endianness),
			depth: 0,
		}
	}

	/// Bytes written so far.
	pub fn bytes_written(&self) -> u64 {
		self.writer.pos()
	}

	/// Return the wrapped stream.
	pub fn into_inner(self) -> W {
		self.writer.into_inner()
	}

	fn code(&mut self, code: TypeCode) -> Result<()> {
		self.writer.write_u8(code as u8)
	}

	fn length(&mut self, len: usize) -> Result<()> {
		let prefix = i32::try_from(len).map_err(|_| WireError::BufferTooLarge {
			len,
			max: i32::MAX as usize,
			at: self.writer.pos(),
		})?;
		self.writer.write_i32(prefix)
	}

	fn text(&mut self, text: &str) -> Result<()> {
		self.length(text.len())?;
		self.writer.write_bytes(text.as_bytes())
	}

	fn scalar(&mut self, value: &Value, path: &ObjectPath) -> Result<()> {
		match value {
			Value::Null => self.code(TypeCode::Null),
			Value::Boolean(v) => {
				self.code(TypeCode::Boolean)?;
				self.writer.write_u8(u8::from(*v))
			}
			Value::String(v) => {
				self.code(TypeCode::String)?;
				self.text(v)
			}
			Value::Buffer(v) => {
				self.code(TypeCode::Buffer)?;
				self.length(v.len())?;
				self.writer.write_bytes(v)
			}
			Value::Timestamp(v) => {
				self.code(TypeCode::Timestamp)?;
				self.writer.write_i64(v.timestamp())?;
				self.writer.write_u32(v.timestamp_subsec_nanos())
			}
			Value::Int32(v) => {
				self.code(TypeCode::Int32)?;
				self.writer.write_i32(*v)
			}
			Value::Int64(v) => {
				self.code(TypeCode::Int64)?;
				self.writer.write_i64(*v)
			}
			Value::Uint32(v) => {
				self.code(TypeCode::Uint32)?;
				self.writer.write_u32(*v)
			}
			Value::Uint64(v) => {
				self.code(TypeCode::Uint64)?;
				self.writer.write_u64(*v)
			}
			Value::Float32(v) => {
				self.code(TypeCode::Float32)?;
				self.writer.write_f32(*v)
			}
			Value::Float64(v) => {
				self.code(TypeCode::Float64)?;
				self.writer.write_f64(*v)
			}
			Value::Enum(v) => {
				self.code(TypeCode::Enum)?;
				self.text(&v.type_name.to_string())?;
				self.text(&v.constant.to_string())
			}
			Value::List(_) | Value::SymbolMap(_) | Value::Struct(_) => Err(WireError::protocol(path, "composite value carried in a value event")),
		}
	}

	fn close(&mut self, path: &ObjectPath) -> Result<()> {
		self.depth = self.depth.checked_sub(1).ok_or_else(|| WireError::protocol(path, "end without an open composite"))?;
		self.code(TypeCode::End)
	}
}

impl<W: Write> EventProcessor for BinaryEncoder<W> {
	fn process_event(&mut self, event: Event) -> Result<()> {
		match &event.kind {
			EventKind::Value(value) => self.scalar(value, &event.path)?,
			EventKind::MapStart => {
				self.code(TypeCode::SymbolMap)?;
				self.depth += 1;
			}
			EventKind::StructStart(type_name) => {
				self.code(TypeCode::Struct)?;
				self.text(&type_name.to_string())?;
				self.depth += 1;
			}
			EventKind::ListStart(element_type) => {
				self.code(TypeCode::List)?;
				self.text(&element_type.to_string())?;
				self.depth += 1;
			}
			EventKind::FieldStart(name) => {
				self.code(TypeCode::Field)?;
				self.text(&name.to_string())?;
			}
			EventKind::End => self.close(&event.path)?,
		}

		if self.depth == 0 {
			self.writer.flush()?;
		}
		Ok(())
	}
}
