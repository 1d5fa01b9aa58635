use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::wire::{Identifier, ObjectPath, QualifiedTypeName, Result, TypeReference, WireError};

/// Immutable structured value.
///
/// Floats compare by bit pattern, so NaN equals itself and `-0.0` differs from `0.0`.
#[derive(Debug, Clone)]
pub enum Value {
	/// Explicit null marker.
	Null,
	/// Boolean scalar.
	Boolean(bool),
	/// UTF-8 text.
	String(Box<str>),
	/// Opaque byte payload.
	Buffer(Vec<u8>),
	/// Signed 32-bit integer.
	Int32(i32),
	/// Signed 64-bit integer.
	Int64(i64),
	/// Unsigned 32-bit integer.
	Uint32(u32),
	/// Unsigned 64-bit integer.
	Uint64(u64),
	/// 32-bit float.
	Float32(f32),
	/// 64-bit float.
	Float64(f64),
	/// UTC instant with nanosecond precision.
	Timestamp(DateTime<Utc>),
	/// Constant of a declared enum.
	Enum(EnumValue),
	/// Ordered sequence with an element-type hint.
	List(ListValue),
	/// Ordered mapping with unique keys.
	SymbolMap(SymbolMap),
	/// Typed field set.
	Struct(StructValue),
}

/// Runtime kind of a value, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
	/// [`Value::Null`].
	Null,
	/// [`Value::Boolean`].
	Boolean,
	/// [`Value::String`].
	String,
	/// [`Value::Buffer`].
	Buffer,
	/// [`Value::Int32`].
	Int32,
	/// [`Value::Int64`].
	Int64,
	/// [`Value::Uint32`].
	Uint32,
	/// [`Value::Uint64`].
	Uint64,
	/// [`Value::Float32`].
	Float32,
	/// [`Value::Float64`].
	Float64,
	/// [`Value::Timestamp`].
	Timestamp,
	/// [`Value::Enum`].
	Enum,
	/// [`Value::List`].
	List,
	/// [`Value::SymbolMap`].
	SymbolMap,
	/// [`Value::Struct`].
	Struct,
}

impl ValueKind {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Null => "null",
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
			Self::Enum => "enum",
			Self::List => "list",
			Self::SymbolMap => "symbol-map",
			Self::Struct => "struct",
		}
	}
}

impl Value {
	/// Text value from anything string-like.
	pub fn string(text: impl Into<Box<str>>) -> Self {
		Self::String(text.into())
	}

	/// Runtime kind.
	pub fn kind(&self) -> ValueKind {
		match self {
			Self::Null => ValueKind::Null,
			Self::Boolean(_) => ValueKind::Boolean,
			Self::String(_) => ValueKind::String,
			Self::Buffer(_) => ValueKind::Buffer,
			Self::Int32(_) => ValueKind::Int32,
			Self::Int64(_) => ValueKind::Int64,
			Self::Uint32(_) => ValueKind::Uint32,
			Self::Uint64(_) => ValueKind::Uint64,
			Self::Float32(_) => ValueKind::Float32,
			Self::Float64(_) => ValueKind::Float64,
			Self::Timestamp(_) => ValueKind::Timestamp,
			Self::Enum(_) => ValueKind::Enum,
			Self::List(_) => ValueKind::List,
			Self::SymbolMap(_) => ValueKind::SymbolMap,
			Self::Struct(_) => ValueKind::Struct,
		}
	}

	/// Return `true` for leaves that travel as a single value event.
	pub fn is_scalar(&self) -> bool {
		!matches!(self, Self::List(_) | Self::SymbolMap(_) | Self::Struct(_))
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Null, Self::Null) => true,
			(Self::Boolean(a), Self::Boolean(b)) => a == b,
			(Self::String(a), Self::String(b)) => a == b,
			(Self::Buffer(a), Self::Buffer(b)) => a == b,
			(Self::Int32(a), Self::Int32(b)) => a == b,
			(Self::Int64(a), Self::Int64(b)) => a == b,
			(Self::Uint32(a), Self::Uint32(b)) => a == b,
			(Self::Uint64(a), Self::Uint64(b)) => a == b,
			(Self::Float32(a), Self::Float32(b)) => a.to_bits() == b.to_bits(),
			(Self::Float64(a), Self::Float64(b)) => a.to_bits() == b.to_bits(),
			(Self::Timestamp(a), Self::Timestamp(b)) => a == b,
			(Self::Enum(a), Self::Enum(b)) => a == b,
			(Self::List(a), Self::List(b)) => a == b,
			(Self::SymbolMap(a), Self::SymbolMap(b)) => a == b,
			(Self::Struct(a), Self::Struct(b)) => a == b,
			_ => false,
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => f.write_str("null"),
			Self::Boolean(v) => write!(f, "{v}"),
			Self::String(v) => write!(f, "{v:?}"),
			Self::Buffer(v) => write!(f, "buffer[{}]", v.len()),
			Self::Int32(v) => write!(f, "{v}"),
			Self::Int64(v) => write!(f, "{v}"),
			Self::Uint32(v) => write!(f, "{v}"),
			Self::Uint64(v) => write!(f, "{v}"),
			Self::Float32(v) => write!(f, "{v}"),
			Self::Float64(v) => write!(f, "{v}"),
			Self::Timestamp(v) => f.write_str(&v.to_rfc3339()),
			Self::Enum(v) => write!(f, "{}::{}", v.type_name, v.constant),
			Self::List(v) => write!(f, "list[{}]", v.len()),
			Self::SymbolMap(v) => write!(f, "map[{}]", v.len()),
			Self::Struct(v) => write!(f, "{} {{..}}", v.type_name),
		}
	}
}

/// Constant of a declared enum type.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
	/// Declaring enum type.
	pub type_name: QualifiedTypeName,
	/// Selected constant.
	pub constant: Identifier,
}

/// Ordered list with the element type declared by its producer.
#[derive(Debug, Clone, PartialEq)]
pub struct ListValue {
	element_type: TypeReference,
	items: Vec<Value>,
}

impl ListValue {
	/// Element-type hint.
	pub fn element_type(&self) -> &TypeReference {
		&self.element_type
	}

	/// Items in index order.
	pub fn items(&self) -> &[Value] {
		&self.items
	}

	/// Number of items.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Return `true` when there are no items.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}

/// Ordered mapping from identifier to value with unique keys.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SymbolMap {
	entries: Vec<(Identifier, Value)>,
}

impl SymbolMap {
	/// Look up a value by key.
	pub fn get(&self, key: &Identifier) -> Option<&Value> {
		self.entries.iter().find(|(name, _)| name == key).map(|(_, value)| value)
	}

	/// Entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&Identifier, &Value)> {
		self.entries.iter().map(|(name, value)| (name, value))
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Return `true` when there are no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Typed field set.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
	/// Declared struct type.
	pub type_name: QualifiedTypeName,
	/// Fields in insertion order.
	pub fields: SymbolMap,
}

/// Accumulates symbol-map entries, rejecting duplicate keys.
#[derive(Debug, Default)]
pub struct SymbolMapBuilder {
	entries: Vec<(Identifier, Value)>,
	seen: HashSet<Identifier>,
}

impl SymbolMapBuilder {
	/// Start an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append an entry.
	pub fn insert(&mut self, key: Identifier, value: Value) -> Result<()> {
		self.insert_at(key, value, &ObjectPath::root())
	}

	/// Chaining form of [`SymbolMapBuilder::insert`].
	pub fn with(mut self, key: Identifier, value: Value) -> Result<Self> {
		self.insert(key, value)?;
		Ok(self)
	}

	pub(crate) fn insert_at(&mut self, key: Identifier, value: Value, path: &ObjectPath) -> Result<()> {
		if !self.seen.insert(key.clone()) {
			return Err(WireError::DuplicateField {
				field: key,
				path: path.clone(),
			});
		}
		self.entries.push((key, value));
		Ok(())
	}

	/// Freeze into an immutable map.
	pub fn build(self) -> SymbolMap {
		SymbolMap { entries: self.entries }
	}
}

/// Accumulates struct fields, rejecting duplicate keys.
#[derive(Debug)]
pub struct StructBuilder {
	type_name: QualifiedTypeName,
	fields: SymbolMapBuilder,
}

impl StructBuilder {
	/// Start a struct of the given type.
	pub fn new(type_name: QualifiedTypeName) -> Self {
		Self {
			type_name,
			fields: SymbolMapBuilder::new(),
		}
	}

	/// Append a field.
	pub fn field(mut self, name: Identifier, value: Value) -> Result<Self> {
		self.fields.insert(name, value)?;
		Ok(self)
	}

	pub(crate) fn insert_at(&mut self, name: Identifier, value: Value, path: &ObjectPath) -> Result<()> {
		self.fields.insert_at(name, value, path)
	}

	/// Freeze into an immutable struct.
	pub fn build(self) -> StructValue {
		StructValue {
			type_name: self.type_name,
			fields: self.fields.build(),
		}
	}
}

/// Accumulates list items in order.
#[derive(Debug)]
pub struct ListBuilder {
	element_type: TypeReference,
	items: Vec<Value>,
}

impl ListBuilder {
	/// Start a list with an element-type hint.
	pub fn new(element_type: TypeReference) -> Self {
		Self {
			element_type,
			items: Vec::new(),
		}
	}

	/// Append an item.
	pub fn push(&mut self, item: Value) {
		self.items.push(item);
	}

	/// Chaining form of [`ListBuilder::push`].
	pub fn with(mut self, item: Value) -> Self {
		self.push(item);
		self
	}

	/// Freeze into an immutable list.
	pub fn build(self) -> ListValue {
		ListValue {
			element_type: self.element_type,
			items: self.items,
		}
	}
}
