use std::io::{ErrorKind, Read, Write};

use crate::wire::{Result, WireError};

/// Byte order of fixed-width wire numerics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
	/// Little-endian byte order.
	#[default]
	Little,
	/// Big-endian byte order.
	Big,
}

impl Endianness {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Little => "little",
			Self::Big => "big",
		}
	}
}

macro_rules! read_num {
	($name:ident, $ty:ty, $doc:literal) => {
		#[doc = $doc]
		pub fn $name(&mut self) -> Result<$ty> {
			let mut buf = [0_u8; size_of::<$ty>()];
			self.fill(&mut buf)?;
			Ok(match self.endianness {
				Endianness::Little => <$ty>::from_le_bytes(buf),
				Endianness::Big => <$ty>::from_be_bytes(buf),
			})
		}
	};
}

macro_rules! write_num {
	($name:ident, $ty:ty, $doc:literal) => {
		#[doc = $doc]
		pub fn $name(&mut self, value: $ty) -> Result<()> {
			match self.endianness {
				Endianness::Little => self.write_bytes(&value.to_le_bytes()),
				Endianness::Big => self.write_bytes(&value.to_be_bytes()),
			}
		}
	};
}

/// Endian-aware reader that tracks its stream offset.
///
/// Reads exactly the bytes requested and never buffers ahead, so bytes after a decoded
/// value stay on the underlying stream.
pub struct ByteReader<R> {
	inner: R,
	pos: u64,
	endianness: Endianness,
}

impl<R: Read> ByteReader<R> {
	/// Wrap `inner`, starting the offset count at 0.
	pub fn new(inner: R, endianness: Endianness) -> Self {
		Self { inner, pos: 0, endianness }
	}

	/// Bytes consumed so far.
	pub fn pos(&self) -> u64 {
		self.pos
	}

	/// Configured byte order.
	pub fn endianness(&self) -> Endianness {
		self.endianness
	}

	/// Return the wrapped stream.
	pub fn into_inner(self) -> R {
		self.inner
	}

	/// Fill `buf` completely or fail with [`WireError::UnexpectedEof`].
	pub fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
		let mut filled = 0;
		while filled < buf.len() {
			match self.inner.read(&mut buf[filled..]) {
				Ok(0) => {
					return Err(WireError::UnexpectedEof {
						at: self.pos,
						need: buf.len() - filled,
					});
				}
				Ok(n) => {
					filled += n;
					self.pos += n as u64;
				}
				Err(err) if err.kind() == ErrorKind::Interrupted => {}
				Err(err) => return Err(err.into()),
			}
		}
		Ok(())
	}

	/// Read exactly `len` bytes.
	pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
		let mut out = vec![0_u8; len];
		self.fill(&mut out)?;
		Ok(out)
	}

	/// Read one byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		let mut buf = [0_u8; 1];
		self.fill(&mut buf)?;
		Ok(buf[0])
	}

	read_num!(read_i32, i32, "Read an `i32` using the configured endianness.");
	read_num!(read_u32, u32, "Read a `u32` using the configured endianness.");
	read_num!(read_i64, i64, "Read an `i64` using the configured endianness.");
	read_num!(read_u64, u64, "Read a `u64` using the configured endianness.");
	read_num!(read_f32, f32, "Read an `f32` using the configured endianness.");
	read_num!(read_f64, f64, "Read an `f64` using the configured endianness.");
}

/// Endian-aware writer mirroring [`ByteReader`].
pub struct ByteWriter<W> {
	inner: W,
	pos: u64,
	endianness: Endianness,
}

impl<W: Write> ByteWriter<W> {
	/// Wrap `inner`.
	pub fn new(inner: W, endianness: Endianness) -> Self {
		Self { inner, pos: 0, endianness }
	}

	/// Bytes written so far.
	pub fn pos(&self) -> u64 {
		self.pos
	}

	/// Configured byte order.
	pub fn endianness(&self) -> Endianness {
		self.endianness
	}

	/// Flush the wrapped stream.
	pub fn flush(&mut self) -> Result<()> {
		self.inner.flush()?;
		Ok(())
	}

	/// Return the wrapped stream.
	pub fn into_inner(self) -> W {
		self.inner
	}

	/// Write raw bytes.
	pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
		self.inner.write_all(bytes)?;
		self.pos += bytes.len() as u64;
		Ok(())
	}

	/// Write one byte.
	pub fn write_u8(&mut self, value: u8) -> Result<()> {
		self.write_bytes(&[value])
	}

	write_num!(write_i32, i32, "Write an `i32` using the configured endianness.");
	write_num!(write_u32, u32, "Write a `u32` using the configured endianness.");
	write_num!(write_i64, i64, "Write an `i64` using the configured endianness.");
	write_num!(write_u64, u64, "Write a `u64` using the configured endianness.");
	write_num!(write_f32, f32, "Write an `f32` using the configured endianness.");
	write_num!(write_f64, f64, "Write an `f64` using the configured endianness.");
}

#[cfg(test)]
mod tests;
