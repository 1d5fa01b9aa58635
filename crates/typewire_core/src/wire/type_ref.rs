use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::wire::{QualifiedTypeName, Result, Value, WireError};

/// `2^127`, the first float outside `i128`.
const I128_LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

/// Built-in scalar kinds addressable from a type reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
	/// `true` / `false`.
	Boolean,
	/// UTF-8 text.
	String,
	/// Opaque bytes.
	Buffer,
	/// Signed 32-bit integer.
	Int32,
	/// Signed 64-bit integer.
	Int64,
	/// Unsigned 32-bit integer.
	Uint32,
	/// Unsigned 64-bit integer.
	Uint64,
	/// 32-bit float.
	Float32,
	/// 64-bit float.
	Float64,
	/// UTC instant.
	Timestamp,
}

impl PrimitiveKind {
	/// Every primitive kind, in wire-code order.
	pub const ALL: [Self; 10] = [
		Self::Boolean,
		Self::String,
		Self::Buffer,
		Self::Int32,
		Self::Int64,
		Self::Uint32,
		Self::Uint64,
		Self::Float32,
		Self::Float64,
		Self::Timestamp,
	];

	/// Stable lowercase label, also the textual type-reference form.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Boolean => "boolean",
			Self::String => "string",
			Self::Buffer => "buffer",
			Self::Int32 => "int32",
			Self::Int64 => "int64",
			Self::Uint32 => "uint32",
			Self::Uint64 => "uint64",
			Self::Float32 => "float32",
			Self::Float64 => "float64",
			Self::Timestamp => "timestamp",
		}
	}

	/// Look up a kind by its label.
	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.as_str() == name)
	}
}

/// Leaf of a type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomicType {
	/// Built-in scalar.
	Primitive(PrimitiveKind),
	/// Declared struct, union, or enum.
	Named(QualifiedTypeName),
}

/// Anchored regex restriction; compared by source text.
#[derive(Clone)]
pub struct Pattern {
	source: Box<str>,
	regex: Regex,
}

impl Pattern {
	/// Compile `source`, anchored to the whole input.
	pub fn new(source: &str) -> Result<Self> {
		let regex = Regex::new(&format!("^(?:{source})$")).map_err(|err| WireError::InvalidPattern {
			pattern: source.to_owned(),
			source: err,
		})?;
		Ok(Self {
			source: source.into(),
			regex,
		})
	}

	/// Pattern source as written.
	pub fn as_str(&self) -> &str {
		&self.source
	}

	/// Return `true` when the whole of `text` matches.
	pub fn is_match(&self, text: &str) -> bool {
		self.regex.is_match(text)
	}
}

impl PartialEq for Pattern {
	fn eq(&self, other: &Self) -> bool {
		self.source == other.source
	}
}

impl fmt::Debug for Pattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Pattern({:?})", self.source)
	}
}

/// One side of a [`NumericRange`].
///
/// Bounds written without a fraction or exponent stay integers, so 64-bit values compare exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
	/// Whole-number bound.
	Integer(i128),
	/// Finite float bound.
	Float(f64),
}

impl fmt::Display for Bound {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Integer(v) => write!(f, "{v}"),
			// Debug always keeps a '.' or an exponent, so the text reparses as a float.
			Self::Float(v) => write!(f, "{v:?}"),
		}
	}
}

/// Inclusive numeric bounds; either side may be open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
	min: Option<Bound>,
	max: Option<Bound>,
}

impl NumericRange {
	/// Build a range from optional inclusive bounds.
	///
	/// Float bounds must be finite.
	pub fn new(min: Option<Bound>, max: Option<Bound>) -> Result<Self> {
		for bound in [min, max].into_iter().flatten() {
			if let Bound::Float(value) = bound
				&& !value.is_finite()
			{
				return Err(WireError::NonFiniteBound { bound: value });
			}
		}
		Ok(Self { min, max })
	}

	/// Lower bound.
	pub fn min(&self) -> Option<Bound> {
		self.min
	}

	/// Upper bound.
	pub fn max(&self) -> Option<Bound> {
		self.max
	}

	/// Return `true` when a numeric `value` lies within both bounds.
	///
	/// Integer kinds compare exactly against integer and float bounds alike. NaN and
	/// non-numeric values never match.
	pub fn contains(&self, value: &Value) -> bool {
		let number = match value {
			Value::Int32(v) => Number::Integer(i128::from(*v)),
			Value::Int64(v) => Number::Integer(i128::from(*v)),
			Value::Uint32(v) => Number::Integer(i128::from(*v)),
			Value::Uint64(v) => Number::Integer(i128::from(*v)),
			Value::Float32(v) => Number::Float(f64::from(*v)),
			Value::Float64(v) => Number::Float(*v),
			_ => return false,
		};
		if let Number::Float(v) = number
			&& v.is_nan()
		{
			return false;
		}
		self.min.is_none_or(|min| number.compare(min).is_some_and(Ordering::is_ge))
			&& self.max.is_none_or(|max| number.compare(max).is_some_and(Ordering::is_le))
	}
}

#[derive(Clone, Copy)]
enum Number {
	Integer(i128),
	Float(f64),
}

impl Number {
	fn compare(self, bound: Bound) -> Option<Ordering> {
		match (self, bound) {
			(Self::Integer(v), Bound::Integer(b)) => Some(v.cmp(&b)),
			(Self::Float(v), Bound::Float(b)) => v.partial_cmp(&b),
			(Self::Float(v), Bound::Integer(b)) => compare_float_to_integer(v, b),
			(Self::Integer(v), Bound::Float(b)) => compare_float_to_integer(b, v).map(Ordering::reverse),
		}
	}
}

fn compare_float_to_integer(float: f64, integer: i128) -> Option<Ordering> {
	if float.is_nan() {
		return None;
	}
	let whole = float.trunc();
	if whole >= I128_LIMIT {
		return Some(Ordering::Greater);
	}
	if whole < -I128_LIMIT {
		return Some(Ordering::Less);
	}
	match (whole as i128).cmp(&integer) {
		Ordering::Equal => float.fract().partial_cmp(&0.0),
		other => Some(other),
	}
}

/// Predicate re-checked after a value has been converted to its base type.
#[derive(Debug, Clone, PartialEq)]
pub enum Restriction {
	/// String must match the pattern.
	Regex(Pattern),
	/// Number must lie within the range.
	Range(NumericRange),
}

/// Type expression.
///
/// Textual grammar:
///
/// ```text
/// int32 | acme.orders.v1/Order
/// list<T> | list+<T>                (list+ rejects empty lists)
/// nullable<T>
/// restricted<T, "regex"> | restricted<T, [lo..hi]>
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum TypeReference {
	/// Primitive or named type.
	Atomic(AtomicType),
	/// Homogeneous list.
	List {
		/// Element type applied to every item.
		element: Box<TypeReference>,
		/// Whether a list with no elements is acceptable.
		allows_empty: bool,
	},
	/// Wrapped type or null.
	Nullable(Box<TypeReference>),
	/// Base type plus a predicate.
	Restricted {
		/// Type the value is converted to before checking.
		base: Box<TypeReference>,
		/// Predicate on the converted value.
		restriction: Restriction,
	},
}

impl TypeReference {
	/// Primitive leaf.
	pub fn primitive(kind: PrimitiveKind) -> Self {
		Self::Atomic(AtomicType::Primitive(kind))
	}

	/// Named leaf.
	pub fn named(name: QualifiedTypeName) -> Self {
		Self::Atomic(AtomicType::Named(name))
	}

	/// List that accepts zero elements.
	pub fn list(element: TypeReference) -> Self {
		Self::List {
			element: Box::new(element),
			allows_empty: true,
		}
	}

	/// List that requires at least one element.
	pub fn non_empty_list(element: TypeReference) -> Self {
		Self::List {
			element: Box::new(element),
			allows_empty: false,
		}
	}

	/// Nullable wrapper.
	pub fn nullable(inner: TypeReference) -> Self {
		Self::Nullable(Box::new(inner))
	}

	/// Restricted wrapper.
	pub fn restricted(base: TypeReference, restriction: Restriction) -> Self {
		Self::Restricted {
			base: Box::new(base),
			restriction,
		}
	}

	/// Return `true` when null is an acceptable value.
	pub fn is_nullable(&self) -> bool {
		match self {
			Self::Nullable(_) => true,
			Self::Restricted { base, .. } => base.is_nullable(),
			Self::Atomic(_) | Self::List { .. } => false,
		}
	}

	/// Parse the textual grammar.
	pub fn parse(text: &str) -> Result<Self> {
		let mut parser = Parser { text, pos: 0 };
		let parsed = parser.parse_type()?;
		parser.skip_ws();
		if parser.pos != text.len() {
			return Err(parser.error("end of input"));
		}
		Ok(parsed)
	}
}

impl FromStr for TypeReference {
	type Err = WireError;

	fn from_str(text: &str) -> Result<Self> {
		Self::parse(text)
	}
}

impl fmt::Display for TypeReference {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Atomic(AtomicType::Primitive(kind)) => f.write_str(kind.as_str()),
			Self::Atomic(AtomicType::Named(name)) => write!(f, "{name}"),
			Self::List { element, allows_empty: true } => write!(f, "list<{element}>"),
			Self::List { element, allows_empty: false } => write!(f, "list+<{element}>"),
			Self::Nullable(inner) => write!(f, "nullable<{inner}>"),
			Self::Restricted { base, restriction } => write!(f, "restricted<{base}, {restriction}>"),
		}
	}
}

impl fmt::Display for Restriction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Regex(pattern) => {
				f.write_str("\"")?;
				for ch in pattern.as_str().chars() {
					if ch == '"' || ch == '\\' {
						f.write_str("\\")?;
					}
					write!(f, "{ch}")?;
				}
				f.write_str("\"")
			}
			Self::Range(range) => {
				f.write_str("[")?;
				if let Some(min) = range.min {
					write!(f, "{min}")?;
				}
				f.write_str("..")?;
				if let Some(max) = range.max {
					write!(f, "{max}")?;
				}
				f.write_str("]")
			}
		}
	}
}

struct Parser<'a> {
	text: &'a str,
	pos: usize,
}

impl<'a> Parser<'a> {
	fn error(&self, reason: &'static str) -> WireError {
		WireError::InvalidTypeReference {
			text: self.text.to_owned(),
			at: self.pos,
			reason,
		}
	}

	fn skip_ws(&mut self) {
		while self.peek().is_some_and(|byte| byte.is_ascii_whitespace()) {
			self.pos += 1;
		}
	}

	fn peek(&self) -> Option<u8> {
		self.text.as_bytes().get(self.pos).copied()
	}

	fn eat(&mut self, byte: u8) -> bool {
		self.skip_ws();
		if self.peek() == Some(byte) {
			self.pos += 1;
			return true;
		}
		false
	}

	fn expect(&mut self, byte: u8, reason: &'static str) -> Result<()> {
		if self.eat(byte) { Ok(()) } else { Err(self.error(reason)) }
	}

	fn take_word(&mut self) -> &'a str {
		let text = self.text;
		let start = self.pos;
		while self
			.peek()
			.is_some_and(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'/'))
		{
			self.pos += 1;
		}
		&text[start..self.pos]
	}

	fn parse_type(&mut self) -> Result<TypeReference> {
		self.skip_ws();
		let start = self.pos;
		let word = self.take_word();

		match word {
			"" => Err(self.error("type expression")),
			"list" => {
				let allows_empty = !self.eat(b'+');
				self.expect(b'<', "'<' after list")?;
				let element = self.parse_type()?;
				self.expect(b'>', "'>' closing list")?;
				Ok(TypeReference::List {
					element: Box::new(element),
					allows_empty,
				})
			}
			"nullable" => {
				self.expect(b'<', "'<' after nullable")?;
				let inner = self.parse_type()?;
				self.expect(b'>', "'>' closing nullable")?;
				Ok(TypeReference::nullable(inner))
			}
			"restricted" => {
				self.expect(b'<', "'<' after restricted")?;
				let base = self.parse_type()?;
				self.expect(b',', "',' before restriction")?;
				let restriction = self.parse_restriction()?;
				self.expect(b'>', "'>' closing restricted")?;
				Ok(TypeReference::restricted(base, restriction))
			}
			_ => {
				if let Some(kind) = PrimitiveKind::from_name(word) {
					return Ok(TypeReference::primitive(kind));
				}
				QualifiedTypeName::parse(word).map(TypeReference::named).map_err(|_| WireError::InvalidTypeReference {
					text: self.text.to_owned(),
					at: start,
					reason: "primitive kind or qualified type name",
				})
			}
		}
	}

	fn parse_restriction(&mut self) -> Result<Restriction> {
		self.skip_ws();
		match self.peek() {
			Some(b'"') => {
				self.pos += 1;
				let source = self.take_quoted()?;
				Ok(Restriction::Regex(Pattern::new(&source)?))
			}
			Some(b'[') => {
				self.pos += 1;
				let min = self.take_number()?;
				if !self.text[self.pos..].starts_with("..") {
					return Err(self.error("'..' between range bounds"));
				}
				self.pos += 2;
				let max = self.take_number()?;
				self.expect(b']', "']' closing range")?;
				Ok(Restriction::Range(NumericRange::new(min, max)?))
			}
			_ => Err(self.error("quoted regex or [min..max] range")),
		}
	}

	fn take_quoted(&mut self) -> Result<String> {
		let text = self.text;
		let mut out = String::new();
		let mut chars = text[self.pos..].char_indices();
		while let Some((offset, ch)) = chars.next() {
			match ch {
				'"' => {
					self.pos += offset + 1;
					return Ok(out);
				}
				'\\' => {
					let Some((_, escaped)) = chars.next() else {
						break;
					};
					out.push(escaped);
				}
				_ => out.push(ch),
			}
		}
		self.pos = self.text.len();
		Err(self.error("closing '\"'"))
	}

	fn take_number(&mut self) -> Result<Option<Bound>> {
		self.skip_ws();
		let start = self.pos;
		while let Some(byte) = self.peek() {
			let range_dots = byte == b'.' && self.text.as_bytes().get(self.pos + 1) == Some(&b'.');
			if range_dots || !(byte.is_ascii_digit() || matches!(byte, b'+' | b'-' | b'.' | b'e' | b'E')) {
				break;
			}
			self.pos += 1;
		}
		let raw = &self.text[start..self.pos];
		self.skip_ws();
		if raw.is_empty() {
			return Ok(None);
		}

		if !raw.contains(['.', 'e', 'E'])
			&& let Ok(value) = raw.parse::<i128>()
		{
			return Ok(Some(Bound::Integer(value)));
		}
		match raw.parse::<f64>() {
			Ok(value) if value.is_finite() => Ok(Some(Bound::Float(value))),
			_ => {
				self.pos = start;
				Err(self.error("finite number"))
			}
		}
	}
}
