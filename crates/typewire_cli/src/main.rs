#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "typewire", about = "Typed binary payload inspection tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Decode and print payload values.
	Dump(cmd::dump::Args),
	/// Print the path-stamped event stream of the first value.
	Events(cmd::events::Args),
	/// Cast the first value against a declared type.
	Cast(cmd::cast::Args),
	/// List registered codecs.
	Codecs(cmd::codecs::Args),
}

fn main() {
	init_tracing();
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> typewire::wire::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Dump(args) => cmd::dump::run(args),
		Commands::Events(args) => cmd::events::run(args),
		Commands::Cast(args) => cmd::cast::run(args),
		Commands::Codecs(args) => cmd::codecs::run(args),
	}
}

fn init_tracing() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
