use typewire::wire::{CodecRegistry, Result};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	#[arg(long)]
	pub json: bool,
}

/// List the codecs registered by default with their registrants.
pub fn run(args: Args) -> Result<()> {
	let registry = CodecRegistry::with_defaults()?;
	let rows: Vec<CodecJson> = registry
		.names()
		.into_iter()
		.map(|name| {
			let registrant = registry.registrant(&name).unwrap_or("-").to_owned();
			CodecJson { name, registrant }
		})
		.collect();

	if args.json {
		return emit_json(&rows);
	}

	println!("name\tregistrant");
	for row in &rows {
		println!("{}\t{}", row.name, row.registrant);
	}
	Ok(())
}

#[derive(serde::Serialize)]
struct CodecJson {
	name: String,
	registrant: String,
}
