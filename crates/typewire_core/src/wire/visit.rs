use crate::wire::{EventKind, EventProcessor, PathTracker, Result, SymbolMap, Value};

/// Drive the canonical depth-first event sequence of `value` into `processor`.
///
/// Composites open with their start event and close with `End`; symbol-map and struct
/// fields follow insertion order, list elements follow index order.
pub fn visit_value<P: EventProcessor + ?Sized>(value: &Value, processor: &mut P) -> Result<()> {
	let mut tracker = PathTracker::new();
	visit(value, &mut tracker, processor)
}

fn visit<P: EventProcessor + ?Sized>(value: &Value, tracker: &mut PathTracker, processor: &mut P) -> Result<()> {
	match value {
		Value::List(list) => {
			emit(tracker, processor, EventKind::ListStart(list.element_type().clone()))?;
			for item in list.items() {
				visit(item, tracker, processor)?;
			}
			emit(tracker, processor, EventKind::End)
		}
		Value::SymbolMap(map) => {
			emit(tracker, processor, EventKind::MapStart)?;
			visit_fields(map, tracker, processor)?;
			emit(tracker, processor, EventKind::End)
		}
		Value::Struct(value) => {
			emit(tracker, processor, EventKind::StructStart(value.type_name.clone()))?;
			visit_fields(&value.fields, tracker, processor)?;
			emit(tracker, processor, EventKind::End)
		}
		scalar => emit(tracker, processor, EventKind::Value(scalar.clone())),
	}
}

fn visit_fields<P: EventProcessor + ?Sized>(fields: &SymbolMap, tracker: &mut PathTracker, processor: &mut P) -> Result<()> {
	for (name, value) in fields.iter() {
		emit(tracker, processor, EventKind::FieldStart(name.clone()))?;
		visit(value, tracker, processor)?;
	}
	Ok(())
}

fn emit<P: EventProcessor + ?Sized>(tracker: &mut PathTracker, processor: &mut P, kind: EventKind) -> Result<()> {
	let event = tracker.stamp(kind)?;
	processor.process_event(event)
}

#[cfg(test)]
mod tests;
