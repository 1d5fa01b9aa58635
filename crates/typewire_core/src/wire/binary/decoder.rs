use std::io::Read;

use chrono::DateTime;
use tracing::debug;

use crate::wire::{
	BinaryOptions, ByteReader, EnumValue, EventKind, EventProcessor, Identifier, PathTracker, QualifiedTypeName, Result, TypeCode, TypeReference, Value,
	WireError,
};

/// Streaming reader that turns binary-encoded values into events.
///
/// Each [`BinaryDecoder::decode_next`] call consumes exactly one encoded value, so several
/// values may be read back to back from the same stream.
pub struct BinaryDecoder<R> {
	reader: ByteReader<R>,
	options: BinaryOptions,
	tracker: PathTracker,
}

impl<R: Read> BinaryDecoder<R> {
	/// Decode from `inner` with the given options.
	pub fn new(inner: R, options: BinaryOptions) -> Self {
		Self {
			reader: ByteReader::new(inner, options.endianness),
			options,
			tracker: PathTracker::new(),
		}
	}

	/// Bytes consumed from the stream so far.
	pub fn position(&self) -> u64 {
		self.reader.pos()
	}

	/// Return the wrapped stream, positioned just after the last decoded value.
	pub fn into_inner(self) -> R {
		self.reader.into_inner()
	}

	/// Read one complete value and push its events into `processor`.
	pub fn decode_next<P: EventProcessor + ?Sized>(&mut self, processor: &mut P) -> Result<()> {
		self.tracker = PathTracker::new();
		let start = self.reader.pos();
		let (code, at) = self.read_code()?;
		self.decode_value(code, at, processor, 0)?;
		debug!(start, end = self.reader.pos(), "decoded value");
		Ok(())
	}

	fn emit<P: EventProcessor + ?Sized>(&mut self, processor: &mut P, kind: EventKind) -> Result<()> {
		let event = self.tracker.stamp(kind)?;
		processor.process_event(event)
	}

	fn decode_value<P: EventProcessor + ?Sized>(&mut self, code: TypeCode, at: u64, processor: &mut P, depth: u32) -> Result<()> {
		let value = match code {
			TypeCode::Null => Value::Null,
			TypeCode::Boolean => {
				let at = self.reader.pos();
				match self.reader.read_u8()? {
					0 => Value::Boolean(false),
					1 => Value::Boolean(true),
					byte => return Err(WireError::InvalidBoolean { byte, at }),
				}
			}
			TypeCode::String => Value::String(self.read_text()?.into()),
			TypeCode::Buffer => {
				let len = self.read_length()?;
				Value::Buffer(self.reader.read_bytes(len)?)
			}
			TypeCode::Timestamp => {
				let at = self.reader.pos();
				let seconds = self.reader.read_i64()?;
				let nanos = self.reader.read_u32()?;
				Value::Timestamp(DateTime::from_timestamp(seconds, nanos).ok_or(WireError::InvalidTimestamp { at })?)
			}
			TypeCode::Int32 => Value::Int32(self.reader.read_i32()?),
			TypeCode::Int64 => Value::Int64(self.reader.read_i64()?),
			TypeCode::Uint32 => Value::Uint32(self.reader.read_u32()?),
			TypeCode::Uint64 => Value::Uint64(self.reader.read_u64()?),
			TypeCode::Float32 => Value::Float32(self.reader.read_f32()?),
			TypeCode::Float64 => Value::Float64(self.reader.read_f64()?),
			TypeCode::Enum => {
				let type_name = self.read_name(QualifiedTypeName::parse)?;
				let constant = self.read_name(Identifier::parse)?;
				Value::Enum(EnumValue { type_name, constant })
			}
			TypeCode::SymbolMap => {
				self.enter(depth)?;
				self.emit(processor, EventKind::MapStart)?;
				return self.decode_fields(processor, depth + 1);
			}
			TypeCode::Struct => {
				self.enter(depth)?;
				let type_name = self.read_name(QualifiedTypeName::parse)?;
				self.emit(processor, EventKind::StructStart(type_name))?;
				return self.decode_fields(processor, depth + 1);
			}
			TypeCode::List => {
				self.enter(depth)?;
				let element_type = self.read_name(TypeReference::parse)?;
				self.emit(processor, EventKind::ListStart(element_type))?;
				return self.decode_items(processor, depth + 1);
			}
			TypeCode::Field | TypeCode::End => {
				return Err(WireError::UnexpectedTypeCode {
					code: code as u8,
					expected: "value",
					at,
				});
			}
		};
		self.emit(processor, EventKind::Value(value))
	}

	fn decode_fields<P: EventProcessor + ?Sized>(&mut self, processor: &mut P, depth: u32) -> Result<()> {
		loop {
			let (code, at) = self.read_code()?;
			match code {
				TypeCode::End => return self.emit(processor, EventKind::End),
				TypeCode::Field => {
					let name = self.read_name(Identifier::parse)?;
					self.emit(processor, EventKind::FieldStart(name))?;
					let (code, at) = self.read_code()?;
					self.decode_value(code, at, processor, depth)?;
				}
				_ => {
					return Err(WireError::UnexpectedTypeCode {
						code: code as u8,
						expected: "field or end",
						at,
					});
				}
			}
		}
	}

	fn decode_items<P: EventProcessor + ?Sized>(&mut self, processor: &mut P, depth: u32) -> Result<()> {
		loop {
			let (code, at) = self.read_code()?;
			if code == TypeCode::End {
				return self.emit(processor, EventKind::End);
			}
			self.decode_value(code, at, processor, depth)?;
		}
	}

	fn enter(&self, depth: u32) -> Result<()> {
		if depth >= self.options.max_depth {
			return Err(WireError::DecodeDepthExceeded {
				max_depth: self.options.max_depth,
			});
		}
		Ok(())
	}

	fn read_code(&mut self) -> Result<(TypeCode, u64)> {
		let at = self.reader.pos();
		let byte = self.reader.read_u8()?;
		let code = TypeCode::from_u8(byte).ok_or(WireError::UnknownTypeCode { code: byte, at })?;
		Ok((code, at))
	}

	fn read_length(&mut self) -> Result<usize> {
		let at = self.reader.pos();
		let len = self.reader.read_i32()?;
		let len = usize::try_from(len).map_err(|_| WireError::NegativeLength { len, at })?;
		if len > self.options.max_buffer_len {
			return Err(WireError::BufferTooLarge {
				len,
				max: self.options.max_buffer_len,
				at,
			});
		}
		Ok(len)
	}

	fn read_text(&mut self) -> Result<String> {
		let at = self.reader.pos();
		let len = self.read_length()?;
		let bytes = self.reader.read_bytes(len)?;
		String::from_utf8(bytes).map_err(|_| WireError::InvalidUtf8 { at })
	}

	fn read_name<T>(&mut self, parse: fn(&str) -> Result<T>) -> Result<T> {
		let at = self.reader.pos();
		let text = self.read_text()?;
		parse(&text).map_err(|err| WireError::MalformedName { at, source: Box::new(err) })
	}
}
