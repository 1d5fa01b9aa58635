use std::path::PathBuf;

use tracing::debug;
use typewire::wire::{Payload, Result};

use crate::cmd::print::{PrintOptions, print_value};
use crate::cmd::util::{binary_options, emit_json, value_json};

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
	#[arg(long)]
	pub big_endian: bool,
	/// Decode every concatenated value instead of only the first.
	#[arg(long)]
	pub all: bool,
	#[arg(long)]
	pub max_depth: Option<u32>,
	#[arg(long)]
	pub json: bool,
}

/// Decode and print values from a payload file.
pub fn run(args: Args) -> Result<()> {
	let Args {
		file,
		big_endian,
		all,
		max_depth,
		json,
	} = args;

	let options = binary_options(big_endian, max_depth);
	let payload = Payload::open(&file)?;
	let values = if all {
		payload.decode_all(&options)?
	} else {
		vec![payload.decode_first(&options)?]
	};
	debug!(
		path = %file.display(),
		compression = payload.compression.as_str(),
		values = values.len(),
		"decoded payload"
	);

	if json {
		return emit_json(&DumpJson {
			path: file.display().to_string(),
			compression: payload.compression.as_str(),
			endianness: options.endianness.as_str(),
			values: values.iter().map(value_json).collect(),
		});
	}

	let print = if all { PrintOptions::compact() } else { PrintOptions::default() };
	println!("path: {}", file.display());
	println!("compression: {}", payload.compression.as_str());
	println!("endianness: {}", options.endianness.as_str());
	println!("values: {}", values.len());
	for (idx, value) in values.iter().enumerate() {
		println!("value[{idx}]:");
		print_value(value, print);
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct DumpJson {
	path: String,
	compression: &'static str,
	endianness: &'static str,
	values: Vec<serde_json::Value>,
}
