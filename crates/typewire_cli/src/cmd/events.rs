use std::path::PathBuf;

use typewire::wire::{EventRecorder, Payload, PipelineBuilder, Result, SequenceCheck, TraceStage};

use crate::cmd::util::binary_options;

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
	#[arg(long)]
	pub big_endian: bool,
	#[arg(long)]
	pub max_depth: Option<u32>,
}

/// Print one `<path> <event>` line per event of the first value.
pub fn run(args: Args) -> Result<()> {
	let Args { file, big_endian, max_depth } = args;

	let payload = Payload::open(&file)?;
	let mut pipeline = PipelineBuilder::new()
		.add(Box::new(SequenceCheck::new()))
		.add(Box::new(TraceStage::new()))
		.build(EventRecorder::new());
	payload.stream_first(&binary_options(big_endian, max_depth), &mut pipeline)?;

	for line in pipeline.sink().lines() {
		println!("{line}");
	}
	Ok(())
}

#[cfg(test)]
mod tests;
