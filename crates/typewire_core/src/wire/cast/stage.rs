use std::collections::HashSet;
use std::sync::Arc;

use tracing::trace;

use super::convert::{convert, mismatch};
use crate::wire::{
	AtomicType, Definition, Event, EventKind, EventProcessor, Identifier, ObjectPath, PassthroughFields, QualifiedTypeName, Result, SequenceCheck,
	Stage, TypeReference, TypeTable, WireError,
};

/// What the next value subsequence must satisfy.
#[derive(Debug, Clone)]
enum Expect {
	Type(TypeReference),
	Any,
}

#[derive(Debug)]
enum Pending {
	Idle,
	Value(Expect),
	Passthrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
	Struct,
	Union,
	Unconstrained,
}

#[derive(Debug)]
enum Frame {
	Fields {
		type_name: QualifiedTypeName,
		shape: Shape,
		path: ObjectPath,
		seen: HashSet<Identifier>,
		outstanding: HashSet<Identifier>,
		pending: Pending,
		variants_seen: usize,
	},
	List {
		element: Expect,
		allows_empty: bool,
		count: usize,
		path: ObjectPath,
	},
	Passthrough {
		depth: usize,
	},
}

/// Pipeline stage that validates and converts an event stream against a target type.
///
/// Struct and union starts are rewritten to carry the target type name and list starts
/// carry the declared element type, so downstream consumers see the declared shape rather
/// than the producer's. Fields registered in [`PassthroughFields`] are forwarded unchanged.
pub struct CastStage {
	target: TypeReference,
	table: Arc<TypeTable>,
	passthrough: Arc<PassthroughFields>,
	frames: Vec<Frame>,
}

impl CastStage {
	/// Stable stage name.
	pub const NAME: &'static str = "cast";

	/// Cast the next top-level value to `target`, resolving named types through `table`.
	pub fn new(target: TypeReference, table: Arc<TypeTable>) -> Self {
		Self {
			target,
			table,
			passthrough: Arc::new(PassthroughFields::new()),
			frames: Vec::new(),
		}
	}

	/// Exempt the given fields from validation.
	pub fn with_passthrough(mut self, passthrough: Arc<PassthroughFields>) -> Self {
		self.passthrough = passthrough;
		self
	}

	fn take_expectation(&mut self, path: &ObjectPath) -> Result<Option<Expect>> {
		match self.frames.last_mut() {
			None => Ok(Some(Expect::Type(self.target.clone()))),
			Some(Frame::Fields { pending, .. }) => match std::mem::replace(pending, Pending::Idle) {
				Pending::Value(expect) => Ok(Some(expect)),
				Pending::Passthrough => Ok(None),
				Pending::Idle => Err(WireError::protocol(path, "value without a preceding field start")),
			},
			Some(Frame::List { element, count, .. }) => {
				*count += 1;
				Ok(Some(element.clone()))
			}
			Some(Frame::Passthrough { .. }) => Ok(None),
		}
	}

	fn open(&mut self, event: Event, downstream: &mut dyn EventProcessor) -> Result<()> {
		if let Some(Frame::Passthrough { depth }) = self.frames.last_mut() {
			*depth += 1;
			return downstream.process_event(event);
		}

		let expect = match self.take_expectation(&event.path)? {
			Some(Expect::Type(expected)) => expected,
			Some(Expect::Any) | None => {
				self.frames.push(Frame::Passthrough { depth: 1 });
				return downstream.process_event(event);
			}
		};

		let (is_list, actual) = match &event.kind {
			EventKind::ListStart(_) => (true, "list"),
			EventKind::StructStart(_) => (false, "struct"),
			_ => (false, "symbol-map"),
		};

		match (is_list, composite_target(&expect)) {
			(true, TypeReference::List { element, allows_empty }) => {
				let element = element.as_ref().clone();
				self.frames.push(Frame::List {
					element: Expect::Type(element.clone()),
					allows_empty: *allows_empty,
					count: 0,
					path: event.path.clone(),
				});
				downstream.process_event(Event::new(EventKind::ListStart(element), event.path))
			}
			(false, TypeReference::Atomic(AtomicType::Named(name))) => {
				let shape = match self.table.get(name) {
					Some(Definition::Struct(_)) => Shape::Struct,
					Some(Definition::Union(_)) => Shape::Union,
					Some(Definition::Enum(_)) => return Err(mismatch(&expect, actual, &event.path)),
					None => Shape::Unconstrained,
				};
				let outstanding = match self.table.get(name) {
					Some(Definition::Struct(definition)) => definition.required().map(|field| field.name.clone()).collect(),
					_ => HashSet::new(),
				};
				let name = name.clone();
				trace!(type_name = %name, path = %event.path, "cast frame opened");
				self.frames.push(Frame::Fields {
					type_name: name.clone(),
					shape,
					path: event.path.clone(),
					seen: HashSet::new(),
					outstanding,
					pending: Pending::Idle,
					variants_seen: 0,
				});
				let kind = match shape {
					Shape::Unconstrained => event.kind,
					Shape::Struct | Shape::Union => EventKind::StructStart(name),
				};
				downstream.process_event(Event::new(kind, event.path))
			}
			_ => Err(mismatch(&expect, actual, &event.path)),
		}
	}

	fn field(&mut self, name: Identifier, path: ObjectPath, downstream: &mut dyn EventProcessor) -> Result<()> {
		let table = Arc::clone(&self.table);
		let passthrough = Arc::clone(&self.passthrough);

		match self.frames.last_mut() {
			Some(Frame::Passthrough { .. }) => {}
			Some(Frame::Fields {
				type_name,
				shape,
				path: frame_path,
				seen,
				outstanding,
				pending,
				variants_seen,
			}) => {
				if !seen.insert(name.clone()) {
					return Err(WireError::DuplicateField {
						field: name,
						path: frame_path.clone(),
					});
				}

				let declared = match (table.get(type_name), *shape) {
					(Some(Definition::Struct(definition)), Shape::Struct) => definition.field(&name),
					(Some(Definition::Union(definition)), Shape::Union) => definition.variant(&name),
					_ => None,
				};

				*pending = match declared {
					Some(field) => {
						outstanding.remove(&name);
						if *shape == Shape::Union {
							*variants_seen += 1;
						}
						Pending::Value(Expect::Type(field.type_ref.clone()))
					}
					None if *shape == Shape::Unconstrained => Pending::Value(Expect::Any),
					None if passthrough.contains(type_name, &name) => Pending::Passthrough,
					None => {
						return Err(WireError::UnknownField {
							field: name,
							type_name: type_name.clone(),
							path: frame_path.clone(),
						});
					}
				};
			}
			Some(Frame::List { path: list_path, .. }) => return Err(WireError::protocol(list_path, "field start directly inside a list")),
			None => return Err(WireError::protocol(&path, "field start outside an open struct or map")),
		}

		downstream.process_event(Event::new(EventKind::FieldStart(name), path))
	}

	fn close(&mut self, path: ObjectPath, downstream: &mut dyn EventProcessor) -> Result<()> {
		match self.frames.last_mut() {
			Some(Frame::Passthrough { depth }) => {
				*depth -= 1;
				if *depth == 0 {
					self.frames.pop();
				}
			}
			Some(Frame::Fields {
				type_name,
				shape,
				path: frame_path,
				outstanding,
				variants_seen,
				..
			}) => {
				if !outstanding.is_empty() {
					let mut fields: Vec<String> = outstanding.iter().map(ToString::to_string).collect();
					fields.sort();
					return Err(WireError::MissingFields {
						fields,
						path: frame_path.clone(),
					});
				}
				if *shape == Shape::Union && *variants_seen != 1 {
					return Err(WireError::UnionVariantCount {
						type_name: type_name.clone(),
						count: *variants_seen,
						path: frame_path.clone(),
					});
				}
				self.frames.pop();
			}
			Some(Frame::List {
				allows_empty,
				count,
				path: list_path,
				..
			}) => {
				if !*allows_empty && *count == 0 {
					return Err(WireError::EmptyList { path: list_path.clone() });
				}
				self.frames.pop();
			}
			None => return Err(WireError::protocol(&path, "end without an open composite")),
		}
		downstream.process_event(Event::new(EventKind::End, path))
	}
}

impl Stage for CastStage {
	fn name(&self) -> &'static str {
		Self::NAME
	}

	fn required_stages(&self) -> Vec<Box<dyn Stage>> {
		vec![Box::new(SequenceCheck::new())]
	}

	fn process_event(&mut self, event: Event, downstream: &mut dyn EventProcessor) -> Result<()> {
		match event.kind {
			EventKind::Value(value) => {
				let value = match self.take_expectation(&event.path)? {
					None | Some(Expect::Any) => value,
					Some(Expect::Type(expected)) => convert(value, &expected, &self.table, &event.path)?,
				};
				downstream.process_event(Event::new(EventKind::Value(value), event.path))
			}
			kind @ (EventKind::MapStart | EventKind::StructStart(_) | EventKind::ListStart(_)) => self.open(Event::new(kind, event.path), downstream),
			EventKind::FieldStart(name) => self.field(name, event.path, downstream),
			EventKind::End => self.close(event.path, downstream),
		}
	}
}

/// Strip wrappers that do not change a composite's shape.
fn composite_target(expected: &TypeReference) -> &TypeReference {
	match expected {
		TypeReference::Nullable(inner) => composite_target(inner),
		TypeReference::Restricted { base, .. } => composite_target(base),
		other => other,
	}
}
