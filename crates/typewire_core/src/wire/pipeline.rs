use tracing::debug;

use crate::wire::{Event, EventProcessor, Result};

/// Pipeline member that sees each event and decides what, if anything, to forward.
///
/// A stage is stateful across one top-level traversal. It forwards by calling
/// `downstream.process_event`, zero or more times per incoming event.
pub trait Stage {
	/// Stable name, used to detect whether a prerequisite is already present.
	fn name(&self) -> &'static str;

	/// Stages that must run immediately ahead of this one.
	///
	/// Consulted once by [`PipelineBuilder::add`]; prerequisites may declare their own.
	fn required_stages(&self) -> Vec<Box<dyn Stage>> {
		Vec::new()
	}

	/// Inspect, transform, or reject one event.
	fn process_event(&mut self, event: Event, downstream: &mut dyn EventProcessor) -> Result<()>;
}

/// Ordered stage list under construction.
#[derive(Default)]
pub struct PipelineBuilder {
	stages: Vec<Box<dyn Stage>>,
}

impl PipelineBuilder {
	/// Start an empty pipeline.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a stage, first inserting any prerequisites not already present.
	pub fn add(mut self, stage: Box<dyn Stage>) -> Self {
		self.insert(stage);
		self
	}

	fn insert(&mut self, stage: Box<dyn Stage>) {
		for required in stage.required_stages() {
			if !self.contains(required.name()) {
				self.insert(required);
			}
		}
		debug!(stage = stage.name(), position = self.stages.len(), "pipeline stage added");
		self.stages.push(stage);
	}

	/// Return `true` when a stage with `name` has been added.
	pub fn contains(&self, name: &str) -> bool {
		self.stages.iter().any(|stage| stage.name() == name)
	}

	/// Stage names in processing order.
	pub fn stage_names(&self) -> Vec<&'static str> {
		self.stages.iter().map(|stage| stage.name()).collect()
	}

	/// Attach the terminal consumer.
	pub fn build<S: EventProcessor>(self, sink: S) -> Pipeline<S> {
		Pipeline { stages: self.stages, sink }
	}
}

/// Assembled stage chain ending in a terminal sink.
///
/// Single-use: after any error the pipeline must be discarded.
pub struct Pipeline<S> {
	stages: Vec<Box<dyn Stage>>,
	sink: S,
}

impl<S: EventProcessor> Pipeline<S> {
	/// Stage names in processing order.
	pub fn stage_names(&self) -> Vec<&'static str> {
		self.stages.iter().map(|stage| stage.name()).collect()
	}

	/// Borrow the terminal sink.
	pub fn sink(&self) -> &S {
		&self.sink
	}

	/// Drop the stages and return the terminal sink.
	pub fn into_sink(self) -> S {
		self.sink
	}
}

impl<S: EventProcessor> EventProcessor for Pipeline<S> {
	fn process_event(&mut self, event: Event) -> Result<()> {
		dispatch(&mut self.stages, &mut self.sink, event)
	}
}

struct Downstream<'a, 'b> {
	stages: &'a mut [Box<dyn Stage>],
	sink: &'a mut (dyn EventProcessor + 'b),
}

impl EventProcessor for Downstream<'_, '_> {
	fn process_event(&mut self, event: Event) -> Result<()> {
		dispatch(self.stages, self.sink, event)
	}
}

fn dispatch<'b>(stages: &mut [Box<dyn Stage>], sink: &mut (dyn EventProcessor + 'b), event: Event) -> Result<()> {
	match stages.split_first_mut() {
		None => sink.process_event(event),
		Some((head, rest)) => head.process_event(event, &mut Downstream { stages: rest, sink }),
	}
}

#[cfg(test)]
mod tests;
