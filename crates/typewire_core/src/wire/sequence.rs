use tracing::trace;

use crate::wire::{Event, EventKind, EventProcessor, Identifier, ObjectPath, Result, Stage, WireError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LevelKind {
	Fields,
	List,
}

#[derive(Debug)]
struct Level {
	kind: LevelKind,
	path: ObjectPath,
	next_index: usize,
	field: Option<Identifier>,
}

/// Nesting-discipline state for one top-level traversal.
///
/// Producers feed each outgoing event kind through [`PathTracker::stamp`] to obtain its
/// object path. Sequences that break the Start/End or FieldStart discipline fail with
/// [`WireError::Protocol`].
#[derive(Debug, Default)]
pub struct PathTracker {
	stack: Vec<Level>,
	finished: bool,
}

impl PathTracker {
	/// Start tracking a fresh top-level value.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of open composites.
	pub fn depth(&self) -> usize {
		self.stack.len()
	}

	/// Return `true` once the top-level value has been closed.
	pub fn is_complete(&self) -> bool {
		self.finished
	}

	/// Validate `kind` and pair it with its object path.
	pub fn stamp(&mut self, kind: EventKind) -> Result<Event> {
		let path = self.observe(&kind)?;
		Ok(Event::new(kind, path))
	}

	/// Validate `kind` against the open nesting and return the path it occupies.
	pub fn observe(&mut self, kind: &EventKind) -> Result<ObjectPath> {
		match kind {
			EventKind::Value(value) => {
				if !value.is_scalar() {
					return Err(WireError::protocol(&self.current_path(), "composite value carried in a value event"));
				}
				let path = self.value_path()?;
				self.complete_value();
				Ok(path)
			}
			EventKind::MapStart | EventKind::StructStart(_) => self.open(LevelKind::Fields),
			EventKind::ListStart(_) => self.open(LevelKind::List),
			EventKind::FieldStart(name) => {
				let Some(top) = self.stack.last_mut() else {
					return Err(WireError::protocol(&ObjectPath::root(), "field start outside an open struct or map"));
				};
				if top.kind != LevelKind::Fields {
					return Err(WireError::protocol(&top.path, "field start directly inside a list"));
				}
				if top.field.is_some() {
					return Err(WireError::protocol(&top.path, "field start before the previous field's value"));
				}
				top.field = Some(name.clone());
				Ok(top.path.child_field(name.clone()))
			}
			EventKind::End => {
				let Some(top) = self.stack.last() else {
					return Err(WireError::protocol(&ObjectPath::root(), "end without an open composite"));
				};
				if top.field.is_some() {
					return Err(WireError::protocol(&top.path, "end before the pending field's value"));
				}
				let path = top.path.clone();
				self.stack.pop();
				self.complete_value();
				Ok(path)
			}
		}
	}

	fn open(&mut self, kind: LevelKind) -> Result<ObjectPath> {
		let path = self.value_path()?;
		self.stack.push(Level {
			kind,
			path: path.clone(),
			next_index: 0,
			field: None,
		});
		Ok(path)
	}

	fn value_path(&mut self) -> Result<ObjectPath> {
		if self.finished {
			return Err(WireError::protocol(&ObjectPath::root(), "event after the top-level value completed"));
		}
		let Some(top) = self.stack.last_mut() else {
			return Ok(ObjectPath::root());
		};
		match top.kind {
			LevelKind::List => {
				let path = top.path.child_index(top.next_index);
				top.next_index += 1;
				Ok(path)
			}
			LevelKind::Fields => match top.field.take() {
				Some(name) => Ok(top.path.child_field(name)),
				None => Err(WireError::protocol(&top.path, "value without a preceding field start")),
			},
		}
	}

	fn complete_value(&mut self) {
		if self.stack.is_empty() {
			self.finished = true;
		}
	}

	fn current_path(&self) -> ObjectPath {
		self.stack.last().map(|top| top.path.clone()).unwrap_or_default()
	}
}

/// Stage that rejects malformed sequences and restamps object paths.
#[derive(Debug, Default)]
pub struct SequenceCheck {
	tracker: PathTracker,
}

impl SequenceCheck {
	/// Stable stage name.
	pub const NAME: &'static str = "sequence-check";

	/// Check a fresh top-level traversal.
	pub fn new() -> Self {
		Self::default()
	}
}

impl Stage for SequenceCheck {
	fn name(&self) -> &'static str {
		Self::NAME
	}

	fn process_event(&mut self, event: Event, downstream: &mut dyn EventProcessor) -> Result<()> {
		let path = self.tracker.observe(&event.kind)?;
		downstream.process_event(Event::new(event.kind, path))
	}
}

/// Stage that logs every event at `trace` level and forwards it unchanged.
#[derive(Debug, Default)]
pub struct TraceStage {
	seen: u64,
}

impl TraceStage {
	/// Stable stage name.
	pub const NAME: &'static str = "trace";

	/// Create a tracing stage.
	pub fn new() -> Self {
		Self::default()
	}
}

impl Stage for TraceStage {
	fn name(&self) -> &'static str {
		Self::NAME
	}

	fn process_event(&mut self, event: Event, downstream: &mut dyn EventProcessor) -> Result<()> {
		trace!(seq = self.seen, path = %event.path, kind = %event.kind, "event");
		self.seen += 1;
		downstream.process_event(event)
	}
}

/// Terminal sink that keeps every event it receives.
#[derive(Debug, Default)]
pub struct EventRecorder {
	events: Vec<Event>,
}

impl EventRecorder {
	/// Create an empty recorder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Recorded events in arrival order.
	pub fn events(&self) -> &[Event] {
		&self.events
	}

	/// One `"<path> <kind>"` line per recorded event.
	pub fn lines(&self) -> Vec<String> {
		self.events.iter().map(ToString::to_string).collect()
	}

	/// Consume the recorder.
	pub fn into_events(self) -> Vec<Event> {
		self.events
	}
}

impl EventProcessor for EventRecorder {
	fn process_event(&mut self, event: Event) -> Result<()> {
		self.events.push(event);
		Ok(())
	}
}
