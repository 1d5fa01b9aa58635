use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::OnceLock;

use typewire::wire::{
	BinaryCodec, Identifier, ListBuilder, QualifiedTypeName, StructBuilder, SymbolMapBuilder, TypeReference, Value, encode,
};
use typewire_testkit::{scratch_path, target_dir as workspace_target_dir};

static TYPEWIRE_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn run_typewire(args: &[&str]) -> Output {
	run_typewire_with_env(args, &[])
}

pub(crate) fn run_typewire_with_env(args: &[&str], envs: &[(&str, &str)]) -> Output {
	Command::new(typewire_bin())
		.args(args)
		.env_remove("RUST_LOG")
		.envs(envs.iter().copied())
		.output()
		.expect("typewire command executes")
}

pub(crate) fn run_typewire_stdout(args: &[&str]) -> String {
	let output = run_typewire(args);
	assert!(
		output.status.success(),
		"typewire command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	String::from_utf8(output.stdout).expect("stdout should be utf-8")
}

pub(crate) fn run_typewire_json(args: &[&str]) -> serde_json::Value {
	serde_json::from_str(&run_typewire_stdout(args)).expect("stdout should be valid json")
}

pub(crate) fn ident(text: &str) -> Identifier {
	Identifier::parse(text).expect("identifier parses")
}

pub(crate) fn type_name(text: &str) -> QualifiedTypeName {
	QualifiedTypeName::parse(text).expect("type name parses")
}

/// Producer-shaped order: a plain map with narrow ints and a string enum.
pub(crate) fn raw_order(id: &str) -> Value {
	let line = SymbolMapBuilder::new()
		.with(ident("sku"), Value::string("ABC"))
		.and_then(|map| map.with(ident("quantity"), Value::Int32(2)))
		.expect("line builds")
		.build();
	let lines = ListBuilder::new(TypeReference::parse("string").expect("type parses"))
		.with(Value::SymbolMap(line))
		.build();
	let order = SymbolMapBuilder::new()
		.with(ident("id"), Value::string(id))
		.and_then(|map| map.with(ident("status"), Value::string("shipped")))
		.and_then(|map| map.with(ident("lines"), Value::List(lines)))
		.expect("order builds")
		.build();
	Value::SymbolMap(order)
}

pub(crate) fn tagged_point() -> Value {
	let point = StructBuilder::new(type_name("acme.geo.v1/Point"))
		.field(ident("x"), Value::Int32(3))
		.and_then(|builder| builder.field(ident("label"), Value::string("origin")))
		.expect("point builds")
		.build();
	Value::Struct(point)
}

/// Encode `values` back to back into a scratch file and return its path as a string.
pub(crate) fn write_payload(name: &str, codec: &BinaryCodec, values: &[Value]) -> String {
	let bytes: Vec<u8> = values.iter().flat_map(|value| encode(value, codec).expect("encode succeeds")).collect();
	write_scratch(name, &bytes)
}

pub(crate) fn write_scratch(name: &str, bytes: &[u8]) -> String {
	let path = scratch_path(name);
	std::fs::write(&path, bytes).expect("scratch file writes");
	path.to_string_lossy().into_owned()
}

fn typewire_bin() -> &'static PathBuf {
	TYPEWIRE_BIN.get_or_init(resolve_typewire_bin)
}

fn resolve_typewire_bin() -> PathBuf {
	if let Ok(path) = std::env::var("CARGO_BIN_EXE_typewire") {
		return PathBuf::from(path);
	}

	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let target_dir = workspace_target_dir();

	let mut bin = target_dir.join("debug");
	bin.push(if cfg!(windows) { "typewire.exe" } else { "typewire" });

	let status = Command::new("cargo")
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "typewire"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build typewire binary at {}", bin.display());

	bin
}
