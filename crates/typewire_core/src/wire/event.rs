use std::fmt;

use crate::wire::{Identifier, QualifiedTypeName, Result, TypeReference, Value};

/// One step from a parent composite to a child.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
	/// Field of a struct or symbol map.
	Field(Identifier),
	/// Zero-based list index.
	Index(usize),
}

/// Location of an event relative to the traversal root, rendered as `$.items[2].name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ObjectPath {
	steps: Vec<PathStep>,
}

impl ObjectPath {
	/// Path of the top-level value.
	pub fn root() -> Self {
		Self::default()
	}

	/// Return `true` for the top-level path.
	pub fn is_root(&self) -> bool {
		self.steps.is_empty()
	}

	/// Ordered steps from the root.
	pub fn steps(&self) -> &[PathStep] {
		&self.steps
	}

	/// Path of a named child.
	pub fn child_field(&self, name: Identifier) -> Self {
		self.child(PathStep::Field(name))
	}

	/// Path of an indexed child.
	pub fn child_index(&self, index: usize) -> Self {
		self.child(PathStep::Index(index))
	}

	fn child(&self, step: PathStep) -> Self {
		let mut steps = Vec::with_capacity(self.steps.len() + 1);
		steps.extend_from_slice(&self.steps);
		steps.push(step);
		Self { steps }
	}
}

impl fmt::Display for ObjectPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("$")?;
		for step in &self.steps {
			match step {
				PathStep::Field(name) => write!(f, ".{name}")?,
				PathStep::Index(index) => write!(f, "[{index}]")?,
			}
		}
		Ok(())
	}
}

/// Payload of one traversal event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
	/// Scalar leaf. Composite values never travel in this variant.
	Value(Value),
	/// Opens an untyped symbol map.
	MapStart,
	/// Opens a struct of the given type.
	StructStart(QualifiedTypeName),
	/// Opens a list whose elements are hinted to be of the given type.
	ListStart(TypeReference),
	/// Names the field whose value follows.
	FieldStart(Identifier),
	/// Closes the innermost open composite.
	End,
}

impl fmt::Display for EventKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Value(value) => write!(f, "value {} {value}", value.kind().as_str()),
			Self::MapStart => f.write_str("map-start"),
			Self::StructStart(name) => write!(f, "struct-start {name}"),
			Self::ListStart(element) => write!(f, "list-start {element}"),
			Self::FieldStart(name) => write!(f, "field-start {name}"),
			Self::End => f.write_str("end"),
		}
	}
}

/// Traversal event stamped with its object path.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
	/// Event payload.
	pub kind: EventKind,
	/// Location within the top-level value.
	pub path: ObjectPath,
}

impl Event {
	/// Pair a payload with its location.
	pub fn new(kind: EventKind, path: ObjectPath) -> Self {
		Self { kind, path }
	}
}

impl fmt::Display for Event {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {}", self.path, self.kind)
	}
}

/// Push interface implemented by every event consumer.
///
/// Calls are synchronous; an error halts the traversal and leaves the processor in an
/// unspecified state.
pub trait EventProcessor {
	/// Consume one event.
	fn process_event(&mut self, event: Event) -> Result<()>;
}

impl<P: EventProcessor + ?Sized> EventProcessor for &mut P {
	fn process_event(&mut self, event: Event) -> Result<()> {
		(**self).process_event(event)
	}
}

impl<P: EventProcessor + ?Sized> EventProcessor for Box<P> {
	fn process_event(&mut self, event: Event) -> Result<()> {
		(**self).process_event(event)
	}
}
