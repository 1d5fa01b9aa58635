use std::fmt;
use std::str::FromStr;

use crate::wire::{Result, WireError};

/// Name made of lowercase word parts, compared independently of how it was written.
///
/// `int32F1`, `int32-f1`, `int32_f1`, and `Int32F1` all parse to the parts `["int32", "f1"]` and
/// compare equal. Every uppercase ASCII letter starts a new part, so acronyms are written
/// `HttpServer` rather than `HTTPServer`.
///
/// The canonical external form is lowerCamelCase.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
	parts: Vec<Box<str>>,
}

impl Identifier {
	/// Parse camelCase, PascalCase, kebab-case, or snake_case text.
	pub fn parse(text: &str) -> Result<Self> {
		let invalid = || WireError::InvalidIdentifier { text: text.to_owned() };

		let mut parts = Vec::new();
		for segment in text.split(['-', '_']) {
			if segment.is_empty() || !segment.bytes().all(|byte| byte.is_ascii_alphanumeric()) {
				return Err(invalid());
			}
			split_camel(segment, &mut parts);
		}

		if parts.iter().any(|part| !part.starts_with(|ch: char| ch.is_ascii_alphabetic())) {
			return Err(invalid());
		}

		Ok(Self { parts })
	}

	/// Lowercase word parts.
	pub fn parts(&self) -> impl Iterator<Item = &str> {
		self.parts.iter().map(AsRef::as_ref)
	}

	/// Render as `lowerCamelCase`.
	pub fn to_camel_case(&self) -> String {
		let mut out = String::new();
		for (idx, part) in self.parts.iter().enumerate() {
			if idx == 0 {
				out.push_str(part);
			} else {
				push_capitalized(&mut out, part);
			}
		}
		out
	}

	/// Render as `PascalCase`.
	pub fn to_pascal_case(&self) -> String {
		let mut out = String::new();
		for part in &self.parts {
			push_capitalized(&mut out, part);
		}
		out
	}

	/// Render as `kebab-case`.
	pub fn to_kebab_case(&self) -> String {
		self.parts.join("-")
	}

	/// Render as `snake_case`.
	pub fn to_snake_case(&self) -> String {
		self.parts.join("_")
	}
}

fn split_camel(segment: &str, out: &mut Vec<Box<str>>) {
	let mut start = 0;
	for (idx, byte) in segment.bytes().enumerate().skip(1) {
		if byte.is_ascii_uppercase() {
			out.push(segment[start..idx].to_ascii_lowercase().into_boxed_str());
			start = idx;
		}
	}
	out.push(segment[start..].to_ascii_lowercase().into_boxed_str());
}

fn push_capitalized(out: &mut String, part: &str) {
	let mut chars = part.chars();
	if let Some(first) = chars.next() {
		out.push(first.to_ascii_uppercase());
		out.push_str(chars.as_str());
	}
}

impl FromStr for Identifier {
	type Err = WireError;

	fn from_str(text: &str) -> Result<Self> {
		Self::parse(text)
	}
}

impl fmt::Display for Identifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_camel_case())
	}
}

impl fmt::Debug for Identifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Identifier({})", self.to_camel_case())
	}
}
