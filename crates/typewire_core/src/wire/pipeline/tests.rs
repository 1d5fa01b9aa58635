use std::cell::RefCell;
use std::rc::Rc;

use crate::wire::test_support::ident;
use crate::wire::{
	CastStage, Event, EventKind, EventProcessor, EventRecorder, ObjectPath, PipelineBuilder, Result, SequenceCheck, Stage, TypeReference, TypeTable,
	Value, WireError,
};

type Journal = Rc<RefCell<Vec<&'static str>>>;

/// Stage chain `D -> C -> B -> A` built from prerequisites.
struct Chained {
	name: &'static str,
	requires: Option<&'static str>,
	journal: Journal,
}

fn chained(name: &'static str, journal: &Journal) -> Chained {
	let requires = match name {
		"d" => Some("c"),
		"c" => Some("b"),
		"b" => Some("a"),
		_ => None,
	};
	Chained {
		name,
		requires,
		journal: Rc::clone(journal),
	}
}

impl Stage for Chained {
	fn name(&self) -> &'static str {
		self.name
	}

	fn required_stages(&self) -> Vec<Box<dyn Stage>> {
		self.requires.map(|name| Box::new(chained(name, &self.journal)) as Box<dyn Stage>).into_iter().collect()
	}

	fn process_event(&mut self, event: Event, downstream: &mut dyn EventProcessor) -> Result<()> {
		self.journal.borrow_mut().push(self.name);
		downstream.process_event(event)
	}
}

struct Reject;

impl Stage for Reject {
	fn name(&self) -> &'static str {
		"reject"
	}

	fn process_event(&mut self, event: Event, _downstream: &mut dyn EventProcessor) -> Result<()> {
		Err(WireError::protocol(&event.path, "rejected by test stage"))
	}
}

struct Duplicate;

impl Stage for Duplicate {
	fn name(&self) -> &'static str {
		"duplicate"
	}

	fn process_event(&mut self, event: Event, downstream: &mut dyn EventProcessor) -> Result<()> {
		downstream.process_event(event.clone())?;
		downstream.process_event(event)
	}
}

fn null_event() -> Event {
	Event::new(EventKind::Value(Value::Null), ObjectPath::root())
}

#[test]
fn prerequisites_are_inserted_ahead_in_order() {
	let journal = Journal::default();
	let builder = PipelineBuilder::new().add(Box::new(chained("d", &journal)));
	assert_eq!(builder.stage_names(), ["a", "b", "c", "d"]);

	let mut pipeline = builder.build(EventRecorder::new());
	pipeline.process_event(null_event()).expect("event flows");
	assert_eq!(*journal.borrow(), ["a", "b", "c", "d"]);
	assert_eq!(pipeline.sink().events().len(), 1);
}

#[test]
fn present_prerequisites_are_not_repeated() {
	let journal = Journal::default();
	let builder = PipelineBuilder::new().add(Box::new(chained("b", &journal))).add(Box::new(chained("d", &journal)));
	assert_eq!(builder.stage_names(), ["a", "b", "c", "d"]);
	assert!(builder.contains("c"));
}

#[test]
fn cast_stage_pulls_in_sequence_check() {
	let cast = CastStage::new(TypeReference::parse("int64").expect("parses"), TypeTable::new().into());
	let builder = PipelineBuilder::new().add(Box::new(cast));
	assert_eq!(builder.stage_names(), [SequenceCheck::NAME, CastStage::NAME]);

	let explicit = PipelineBuilder::new()
		.add(Box::new(SequenceCheck::new()))
		.add(Box::new(CastStage::new(TypeReference::parse("int64").expect("parses"), TypeTable::new().into())));
	assert_eq!(explicit.stage_names(), [SequenceCheck::NAME, CastStage::NAME]);
}

#[test]
fn stage_may_forward_many_events() {
	let mut pipeline = PipelineBuilder::new().add(Box::new(Duplicate)).build(EventRecorder::new());
	pipeline.process_event(null_event()).expect("event flows");
	assert_eq!(pipeline.sink().events().len(), 2);
}

#[test]
fn first_error_propagates_and_halts() {
	let journal = Journal::default();
	let mut pipeline = PipelineBuilder::new()
		.add(Box::new(Reject))
		.add(Box::new(chained("a", &journal)))
		.build(EventRecorder::new());

	let err = pipeline.process_event(null_event()).expect_err("reject stage fails");
	assert!(matches!(err, WireError::Protocol { detail: "rejected by test stage", .. }));
	assert!(journal.borrow().is_empty());
	assert!(pipeline.into_sink().events().is_empty());
}

#[test]
fn empty_pipeline_feeds_sink_directly() {
	let mut pipeline = PipelineBuilder::new().build(EventRecorder::new());
	pipeline.process_event(Event::new(EventKind::FieldStart(ident("loose")), ObjectPath::root())).expect("sink accepts anything");
	assert!(pipeline.stage_names().is_empty());
	assert_eq!(pipeline.sink().lines(), ["$ field-start loose"]);
}
