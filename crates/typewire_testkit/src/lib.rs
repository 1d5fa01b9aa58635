//! Shared test helpers for workspace crates.

use std::path::{Path, PathBuf};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Resolve a per-test scratch file path under `<target>/typewire-scratch`, creating the directory.
pub fn scratch_path(name: &str) -> PathBuf {
	let dir = target_dir().join("typewire-scratch");
	let _ = std::fs::create_dir_all(&dir);
	dir.join(name)
}

/// Hand-assembled wire bytes for decoder tests that need malformed input.
///
/// All multi-byte values are written little-endian.
#[derive(Debug, Default, Clone)]
pub struct WireScript {
	bytes: Vec<u8>,
}

impl WireScript {
	/// Start an empty script.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append one raw byte (usually a type code).
	pub fn code(mut self, code: u8) -> Self {
		self.bytes.push(code);
		self
	}

	/// Append a little-endian `i32`.
	pub fn i32(mut self, value: i32) -> Self {
		self.bytes.extend_from_slice(&value.to_le_bytes());
		self
	}

	/// Append a length-prefixed UTF-8 string.
	pub fn text(mut self, value: &str) -> Self {
		self.bytes.extend_from_slice(&(value.len() as i32).to_le_bytes());
		self.bytes.extend_from_slice(value.as_bytes());
		self
	}

	/// Append raw bytes verbatim.
	pub fn raw(mut self, bytes: &[u8]) -> Self {
		self.bytes.extend_from_slice(bytes);
		self
	}

	/// Finish and return the assembled bytes.
	pub fn into_bytes(self) -> Vec<u8> {
		self.bytes
	}
}
