use std::io::Read;

use crate::wire::{Result, WireError};

/// zstd frame magic.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Compression mode detected for a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
	/// Raw encoded values.
	None,
	/// zstd-compressed stream.
	Zstd,
}

impl Compression {
	/// Render compression mode as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Zstd => "zstd",
		}
	}

	/// Sniff the mode from the leading bytes.
	pub fn detect(raw: &[u8]) -> Self {
		if raw.starts_with(&ZSTD_MAGIC) {
			Self::Zstd
		} else {
			Self::None
		}
	}
}

/// Limits applied while undoing compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecompressOptions {
	/// Largest decompressed output accepted, in bytes.
	pub max_output_bytes: u64,
}

impl Default for DecompressOptions {
	fn default() -> Self {
		Self {
			max_output_bytes: 512 * 1024 * 1024,
		}
	}
}

/// Detect and undo compression, returning `(mode, decoded_bytes)`.
///
/// Input without the zstd frame magic is returned unchanged.
pub fn decode_bytes(raw: Vec<u8>, options: &DecompressOptions) -> Result<(Compression, Vec<u8>)> {
	match Compression::detect(&raw) {
		Compression::None => Ok((Compression::None, raw)),
		Compression::Zstd => {
			let limit = options.max_output_bytes;
			let mut out = Vec::new();
			// One byte past the limit is enough to tell an oversized frame apart.
			zstd::stream::read::Decoder::new(raw.as_slice())?
				.take(limit.saturating_add(1))
				.read_to_end(&mut out)?;
			if out.len() as u64 > limit {
				return Err(WireError::DecompressedTooLarge { limit });
			}
			Ok((Compression::Zstd, out))
		}
	}
}
