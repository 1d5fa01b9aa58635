use std::fs;
use std::path::Path;

use crate::wire::{BinaryDecoder, BinaryOptions, Compression, DecompressOptions, EventProcessor, Result, Value, ValueBuilder, decode_bytes};

/// Binary payload holding one or more consecutively encoded values.
pub struct Payload {
	/// Compression mode detected for source bytes.
	pub compression: Compression,
	bytes: Vec<u8>,
}

impl Payload {
	/// Read and decompress a payload from disk.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		Self::open_with(path, &DecompressOptions::default())
	}

	/// Read a payload from disk with explicit decompression limits.
	pub fn open_with(path: impl AsRef<Path>, options: &DecompressOptions) -> Result<Self> {
		Self::from_bytes_with(fs::read(path)?, options)
	}

	/// Wrap raw or zstd-compressed bytes.
	pub fn from_bytes(raw: Vec<u8>) -> Result<Self> {
		Self::from_bytes_with(raw, &DecompressOptions::default())
	}

	/// Wrap raw or zstd-compressed bytes with explicit decompression limits.
	pub fn from_bytes_with(raw: Vec<u8>, options: &DecompressOptions) -> Result<Self> {
		let (compression, bytes) = decode_bytes(raw, options)?;
		Ok(Self { compression, bytes })
	}

	/// Decompressed bytes.
	pub fn bytes(&self) -> &[u8] {
		&self.bytes
	}

	/// Push the events of the first value into `processor`.
	pub fn stream_first<P: EventProcessor + ?Sized>(&self, options: &BinaryOptions, processor: &mut P) -> Result<()> {
		BinaryDecoder::new(self.bytes.as_slice(), options.clone()).decode_next(processor)
	}

	/// Materialize the first value.
	pub fn decode_first(&self, options: &BinaryOptions) -> Result<Value> {
		let mut builder = ValueBuilder::new();
		self.stream_first(options, &mut builder)?;
		builder.finish()
	}

	/// Materialize every value until the bytes are exhausted.
	pub fn decode_all(&self, options: &BinaryOptions) -> Result<Vec<Value>> {
		let mut decoder = BinaryDecoder::new(self.bytes.as_slice(), options.clone());
		let mut values = Vec::new();
		while decoder.position() < self.bytes.len() as u64 {
			let mut builder = ValueBuilder::new();
			decoder.decode_next(&mut builder)?;
			values.push(builder.finish()?);
		}
		Ok(values)
	}
}

#[cfg(test)]
mod tests;
