use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::wire::{Identifier, PipelineBuilder, QualifiedTypeName, Result, TypeReference, Value, ValueBuilder, visit_value};

mod convert;
mod stage;

pub use stage::CastStage;

/// Declared field or union variant.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
	/// Field key.
	pub name: Identifier,
	/// Declared type of the field's value.
	pub type_ref: TypeReference,
}

impl FieldDefinition {
	/// Pair a field name with its type.
	pub fn new(name: Identifier, type_ref: TypeReference) -> Self {
		Self { name, type_ref }
	}

	/// A field is required unless its type admits null.
	pub fn is_required(&self) -> bool {
		!self.type_ref.is_nullable()
	}
}

/// Struct definition: an ordered field list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructDefinition {
	/// Declared fields in declaration order.
	pub fields: Vec<FieldDefinition>,
}

impl StructDefinition {
	/// Build from declared fields.
	pub fn new(fields: Vec<FieldDefinition>) -> Self {
		Self { fields }
	}

	/// Look up a declared field.
	pub fn field(&self, name: &Identifier) -> Option<&FieldDefinition> {
		self.fields.iter().find(|field| &field.name == name)
	}

	/// Fields that must be present.
	pub fn required(&self) -> impl Iterator<Item = &FieldDefinition> {
		self.fields.iter().filter(|field| field.is_required())
	}
}

/// Union definition: exactly one variant is set per value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnionDefinition {
	/// Declared variants.
	pub variants: Vec<FieldDefinition>,
}

impl UnionDefinition {
	/// Build from declared variants.
	pub fn new(variants: Vec<FieldDefinition>) -> Self {
		Self { variants }
	}

	/// Look up a declared variant.
	pub fn variant(&self, name: &Identifier) -> Option<&FieldDefinition> {
		self.variants.iter().find(|variant| &variant.name == name)
	}
}

/// Enum definition: the closed set of constants.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnumDefinition {
	/// Declared constants.
	pub constants: Vec<Identifier>,
}

impl EnumDefinition {
	/// Build from declared constants.
	pub fn new(constants: Vec<Identifier>) -> Self {
		Self { constants }
	}

	/// Return `true` when `constant` is declared.
	pub fn contains(&self, constant: &Identifier) -> bool {
		self.constants.contains(constant)
	}
}

/// Declared type shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
	/// Struct with fields.
	Struct(StructDefinition),
	/// Union of variants.
	Union(UnionDefinition),
	/// Enum of constants.
	Enum(EnumDefinition),
}

/// Read-only mapping from declared type names to their definitions.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
	definitions: HashMap<QualifiedTypeName, Definition>,
}

impl TypeTable {
	/// Empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Declare or replace a type.
	pub fn insert(&mut self, name: QualifiedTypeName, definition: Definition) {
		self.definitions.insert(name, definition);
	}

	/// Chaining form of [`TypeTable::insert`].
	pub fn with(mut self, name: QualifiedTypeName, definition: Definition) -> Self {
		self.insert(name, definition);
		self
	}

	/// Look up a declared type.
	pub fn get(&self, name: &QualifiedTypeName) -> Option<&Definition> {
		self.definitions.get(name)
	}

	/// Number of declared types.
	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	/// Return `true` when no types are declared.
	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}
}

/// `(enclosing type, field)` pairs whose subsequences bypass cast validation.
#[derive(Debug, Clone, Default)]
pub struct PassthroughFields {
	fields: HashMap<QualifiedTypeName, HashSet<Identifier>>,
}

impl PassthroughFields {
	/// Empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Exempt `field` of `enclosing` from validation.
	pub fn allow(&mut self, enclosing: QualifiedTypeName, field: Identifier) {
		self.fields.entry(enclosing).or_default().insert(field);
	}

	/// Chaining form of [`PassthroughFields::allow`].
	pub fn with(mut self, enclosing: QualifiedTypeName, field: Identifier) -> Self {
		self.allow(enclosing, field);
		self
	}

	/// Return `true` when the pair is exempt.
	pub fn contains(&self, enclosing: &QualifiedTypeName, field: &Identifier) -> bool {
		self.fields.get(enclosing).is_some_and(|fields| fields.contains(field))
	}
}

/// Visit `value`, cast it against `target`, and rebuild the result.
pub fn cast_value(value: &Value, target: &TypeReference, table: Arc<TypeTable>) -> Result<Value> {
	let stage = CastStage::new(target.clone(), table);
	let mut pipeline = PipelineBuilder::new().add(Box::new(stage)).build(ValueBuilder::new());
	visit_value(value, &mut pipeline)?;
	pipeline.into_sink().finish()
}
