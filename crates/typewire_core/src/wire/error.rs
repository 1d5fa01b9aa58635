use thiserror::Error;

use crate::wire::{Identifier, ObjectPath, QualifiedTypeName};

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, WireError>;

/// Coarse failure family used for reporting and for deciding who is at fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
	/// Malformed textual form of an identifier, name, or type reference.
	Syntax,
	/// Malformed event sequencing from a non-conformant producer.
	Protocol,
	/// Malformed or truncated wire bytes.
	Decode,
	/// Producer-supplied data does not satisfy the target type.
	Cast,
	/// Codec registration conflict or missing codec.
	Registration,
	/// Underlying stream failure.
	Io,
}

impl ErrorCategory {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Syntax => "syntax",
			Self::Protocol => "protocol",
			Self::Decode => "decode",
			Self::Cast => "cast",
			Self::Registration => "registration",
			Self::Io => "io",
		}
	}
}

/// Errors produced while parsing names, driving pipelines, decoding bytes, and casting values.
#[derive(Debug, Error)]
pub enum WireError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Identifier text is empty or contains characters outside `[A-Za-z0-9_-]`.
	#[error("invalid identifier: {text:?}")]
	InvalidIdentifier {
		/// Offending input.
		text: String,
	},
	/// Namespace text lacks a version segment or has an invalid segment.
	#[error("invalid namespace: {text:?}")]
	InvalidNamespace {
		/// Offending input.
		text: String,
	},
	/// Qualified type name is not `<namespace>/<Name>`.
	#[error("invalid qualified type name: {text:?}")]
	InvalidTypeName {
		/// Offending input.
		text: String,
	},
	/// Type reference expression failed to parse.
	#[error("invalid type reference {text:?} at {at}: {reason}")]
	InvalidTypeReference {
		/// Full expression.
		text: String,
		/// Byte offset of the failure.
		at: usize,
		/// Short description of what was expected.
		reason: &'static str,
	},
	/// Range restriction bound is NaN or infinite.
	#[error("range bound must be finite, got {bound}")]
	NonFiniteBound {
		/// Rejected bound.
		bound: f64,
	},
	/// Restriction regex failed to compile.
	#[error("invalid restriction pattern {pattern:?}: {source}")]
	InvalidPattern {
		/// Pattern source text.
		pattern: String,
		/// Regex compiler error.
		source: regex::Error,
	},
	/// Event sequencing broke the nesting discipline.
	///
	/// Must not occur with a conformant producer; the pipeline that saw it is unusable afterwards.
	#[error("protocol violation at {path}: {detail}")]
	Protocol {
		/// Location of the offending event.
		path: ObjectPath,
		/// What was wrong with the event.
		detail: &'static str,
	},
	/// Stream ended inside a value.
	#[error("unexpected eof at offset {at}, need {need} bytes")]
	UnexpectedEof {
		/// Stream offset where the read was attempted.
		at: u64,
		/// Bytes still required.
		need: usize,
	},
	/// Byte is not one of the known type codes.
	#[error("unknown type code {code} at offset {at}")]
	UnknownTypeCode {
		/// Raw byte read.
		code: u8,
		/// Stream offset of the code.
		at: u64,
	},
	/// Known type code in a position that does not allow it.
	#[error("unexpected type code {code} at offset {at}: expected {expected}")]
	UnexpectedTypeCode {
		/// Raw byte read.
		code: u8,
		/// What the decoder was expecting.
		expected: &'static str,
		/// Stream offset of the code.
		at: u64,
	},
	/// Length prefix was negative.
	#[error("negative buffer size: {len} at offset {at}")]
	NegativeLength {
		/// Parsed signed length.
		len: i32,
		/// Stream offset of the length prefix.
		at: u64,
	},
	/// Length prefix exceeded the configured ceiling.
	#[error("buffer size {len} at offset {at} exceeds limit {max}")]
	BufferTooLarge {
		/// Parsed length.
		len: usize,
		/// Configured ceiling.
		max: usize,
		/// Stream offset of the length prefix.
		at: u64,
	},
	/// String payload was not valid UTF-8.
	#[error("invalid utf-8 text at offset {at}")]
	InvalidUtf8 {
		/// Stream offset of the length prefix.
		at: u64,
	},
	/// Boolean payload byte was neither 0 nor 1.
	#[error("invalid boolean byte {byte} at offset {at}")]
	InvalidBoolean {
		/// Raw byte read.
		byte: u8,
		/// Stream offset of the byte.
		at: u64,
	},
	/// Timestamp seconds/nanoseconds are out of range.
	#[error("invalid timestamp at offset {at}")]
	InvalidTimestamp {
		/// Stream offset of the timestamp payload.
		at: u64,
	},
	/// Encoded identifier, type name, or type reference failed to parse.
	#[error("malformed name at offset {at}: {source}")]
	MalformedName {
		/// Stream offset of the length prefix.
		at: u64,
		/// Underlying syntax error.
		source: Box<WireError>,
	},
	/// Decoder recursion depth exceeded configured limit.
	#[error("decode depth exceeded (max={max_depth})")]
	DecodeDepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: u64,
	},
	/// Scalar kind cannot be converted to the expected type.
	#[error("cannot cast {actual} to {expected} at {path}")]
	CastMismatch {
		/// Rendered expected type.
		expected: String,
		/// Kind actually received.
		actual: &'static str,
		/// Location of the value.
		path: ObjectPath,
	},
	/// Required fields were absent when a struct closed.
	#[error("{}{}", missing_fields_message(.fields), location_suffix(.path))]
	MissingFields {
		/// Missing field names, sorted by canonical form.
		fields: Vec<String>,
		/// Location of the struct.
		path: ObjectPath,
	},
	/// A field key appeared twice in one struct or map.
	#[error("duplicate field {field}{}", location_suffix(.path))]
	DuplicateField {
		/// Repeated key.
		field: Identifier,
		/// Location of the enclosing struct or map.
		path: ObjectPath,
	},
	/// Field is not declared by the struct or union definition.
	#[error("unknown field {field} for {type_name}{}", location_suffix(.path))]
	UnknownField {
		/// Offending key.
		field: Identifier,
		/// Definition being cast to.
		type_name: QualifiedTypeName,
		/// Location of the enclosing struct.
		path: ObjectPath,
	},
	/// Converted value failed a regex or range restriction.
	#[error("value {value} violates restriction {restriction} at {path}")]
	RestrictionViolated {
		/// Rendered converted value.
		value: String,
		/// Rendered restriction.
		restriction: String,
		/// Location of the value.
		path: ObjectPath,
	},
	/// Enum constant is not declared by the enum definition.
	#[error("unknown constant {constant:?} for enum {type_name} at {path}")]
	UnknownEnumConstant {
		/// Offending constant text.
		constant: String,
		/// Enum being cast to.
		type_name: QualifiedTypeName,
		/// Location of the value.
		path: ObjectPath,
	},
	/// Non-empty list type received a list with no elements.
	#[error("empty list not allowed at {path}")]
	EmptyList {
		/// Location of the list.
		path: ObjectPath,
	},
	/// Union value did not set exactly one variant.
	#[error("union {type_name} expects exactly one variant, got {count}{}", location_suffix(.path))]
	UnionVariantCount {
		/// Union being cast to.
		type_name: QualifiedTypeName,
		/// Number of variants set.
		count: usize,
		/// Location of the union value.
		path: ObjectPath,
	},
	/// Codec identifier is already bound.
	#[error("codec {name} already registered by {prior}")]
	CodecCollision {
		/// Identifier being registered.
		name: String,
		/// Registrant that holds the binding.
		prior: String,
	},
	/// No codec is bound to the identifier.
	#[error("unknown codec: {name}")]
	UnknownCodec {
		/// Requested identifier.
		name: String,
	},
}

impl WireError {
	/// Classify this error into the failure taxonomy.
	pub fn category(&self) -> ErrorCategory {
		match self {
			Self::Io(_) => ErrorCategory::Io,
			Self::InvalidIdentifier { .. }
			| Self::InvalidNamespace { .. }
			| Self::InvalidTypeName { .. }
			| Self::InvalidTypeReference { .. }
			| Self::NonFiniteBound { .. }
			| Self::InvalidPattern { .. } => ErrorCategory::Syntax,
			Self::Protocol { .. } => ErrorCategory::Protocol,
			Self::UnexpectedEof { .. }
			| Self::UnknownTypeCode { .. }
			| Self::UnexpectedTypeCode { .. }
			| Self::NegativeLength { .. }
			| Self::BufferTooLarge { .. }
			| Self::InvalidUtf8 { .. }
			| Self::InvalidBoolean { .. }
			| Self::InvalidTimestamp { .. }
			| Self::MalformedName { .. }
			| Self::DecodeDepthExceeded { .. }
			| Self::DecompressedTooLarge { .. } => ErrorCategory::Decode,
			Self::CastMismatch { .. }
			| Self::MissingFields { .. }
			| Self::DuplicateField { .. }
			| Self::UnknownField { .. }
			| Self::RestrictionViolated { .. }
			| Self::UnknownEnumConstant { .. }
			| Self::EmptyList { .. }
			| Self::UnionVariantCount { .. } => ErrorCategory::Cast,
			Self::CodecCollision { .. } | Self::UnknownCodec { .. } => ErrorCategory::Registration,
		}
	}

	/// Object path carried by cast and protocol errors.
	pub fn path(&self) -> Option<&ObjectPath> {
		match self {
			Self::Protocol { path, .. }
			| Self::CastMismatch { path, .. }
			| Self::MissingFields { path, .. }
			| Self::DuplicateField { path, .. }
			| Self::UnknownField { path, .. }
			| Self::RestrictionViolated { path, .. }
			| Self::UnknownEnumConstant { path, .. }
			| Self::EmptyList { path }
			| Self::UnionVariantCount { path, .. } => Some(path),
			_ => None,
		}
	}

	pub(crate) fn protocol(path: &ObjectPath, detail: &'static str) -> Self {
		Self::Protocol { path: path.clone(), detail }
	}
}

fn missing_fields_message(fields: &[String]) -> String {
	if fields.len() == 1 {
		format!("missing field: {}", fields[0])
	} else {
		format!("missing fields: {}", fields.join(", "))
	}
}

fn location_suffix(path: &ObjectPath) -> String {
	if path.is_root() { String::new() } else { format!(" at {path}") }
}
