use crate::wire::{
	Event, EventKind, EventProcessor, Identifier, ListBuilder, ObjectPath, Result, StructBuilder, SymbolMapBuilder, Value, WireError,
};

enum Partial {
	Map {
		fields: SymbolMapBuilder,
		path: ObjectPath,
		pending: Option<Identifier>,
	},
	Struct {
		fields: StructBuilder,
		path: ObjectPath,
		pending: Option<Identifier>,
	},
	List {
		items: ListBuilder,
	},
}

impl Partial {
	fn freeze(self) -> Value {
		match self {
			Self::Map { fields, .. } => Value::SymbolMap(fields.build()),
			Self::Struct { fields, .. } => Value::Struct(fields.build()),
			Self::List { items } => Value::List(items.build()),
		}
	}
}

/// Terminal sink that materializes exactly one [`Value`] from a well-formed event sequence.
#[derive(Default)]
pub struct ValueBuilder {
	stack: Vec<Partial>,
	result: Option<Value>,
}

impl ValueBuilder {
	/// Start with no value.
	pub fn new() -> Self {
		Self::default()
	}

	/// Return `true` once a complete top-level value has been built.
	pub fn is_complete(&self) -> bool {
		self.stack.is_empty() && self.result.is_some()
	}

	/// Take the built value.
	pub fn finish(self) -> Result<Value> {
		if !self.stack.is_empty() {
			return Err(WireError::protocol(&ObjectPath::root(), "event stream ended inside an open composite"));
		}
		self.result.ok_or_else(|| WireError::protocol(&ObjectPath::root(), "event stream produced no value"))
	}

	fn complete(&mut self, value: Value, at: &ObjectPath) -> Result<()> {
		let Some(top) = self.stack.last_mut() else {
			if self.result.is_some() {
				return Err(WireError::protocol(at, "second top-level value"));
			}
			self.result = Some(value);
			return Ok(());
		};

		match top {
			Partial::Map { fields, path, pending } => {
				let key = pending.take().ok_or_else(|| WireError::protocol(path, "value without a preceding field start"))?;
				fields.insert_at(key, value, path)
			}
			Partial::Struct { fields, path, pending } => {
				let key = pending.take().ok_or_else(|| WireError::protocol(path, "value without a preceding field start"))?;
				fields.insert_at(key, value, path)
			}
			Partial::List { items } => {
				items.push(value);
				Ok(())
			}
		}
	}
}

impl EventProcessor for ValueBuilder {
	fn process_event(&mut self, event: Event) -> Result<()> {
		match event.kind {
			EventKind::Value(value) => {
				if !value.is_scalar() {
					return Err(WireError::protocol(&event.path, "composite value carried in a value event"));
				}
				self.complete(value, &event.path)
			}
			EventKind::MapStart => {
				self.stack.push(Partial::Map {
					fields: SymbolMapBuilder::new(),
					path: event.path,
					pending: None,
				});
				Ok(())
			}
			EventKind::StructStart(type_name) => {
				self.stack.push(Partial::Struct {
					fields: StructBuilder::new(type_name),
					path: event.path,
					pending: None,
				});
				Ok(())
			}
			EventKind::ListStart(element_type) => {
				self.stack.push(Partial::List {
					items: ListBuilder::new(element_type),
				});
				Ok(())
			}
			EventKind::FieldStart(name) => match self.stack.last_mut() {
				Some(Partial::Map { pending, .. } | Partial::Struct { pending, .. }) if pending.is_none() => {
					*pending = Some(name);
					Ok(())
				}
				_ => Err(WireError::protocol(&event.path, "field start outside an open struct or map")),
			},
			EventKind::End => {
				let Some(partial) = self.stack.pop() else {
					return Err(WireError::protocol(&event.path, "end without an open composite"));
				};
				self.complete(partial.freeze(), &event.path)
			}
		}
	}
}

#[cfg(test)]
mod tests;
