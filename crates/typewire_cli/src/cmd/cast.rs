use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;
use typewire::wire::{
	CastStage, Definition, EnumDefinition, FieldDefinition, Identifier, PassthroughFields, Payload, PipelineBuilder, QualifiedTypeName, Result,
	StructDefinition, TraceStage, TypeReference, TypeTable, UnionDefinition, ValueBuilder,
};

use crate::cmd::print::{PrintOptions, print_value};
use crate::cmd::util::{binary_options, emit_json, value_json};

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
	/// JSON schema file declaring structs, unions, enums, and passthrough fields.
	#[arg(long)]
	pub schema: PathBuf,
	/// Target type reference, e.g. `acme.orders.v1/Order` or `list<int64>`.
	#[arg(long = "type")]
	pub target: String,
	#[arg(long)]
	pub big_endian: bool,
	#[arg(long)]
	pub json: bool,
}

/// Cast the first payload value to the target type and print the result.
pub fn run(args: Args) -> Result<()> {
	let Args {
		file,
		schema,
		target,
		big_endian,
		json,
	} = args;

	let target = TypeReference::parse(&target)?;
	let (table, passthrough) = load_schema(&schema)?;
	debug!(schema = %schema.display(), types = table.len(), %target, "loaded schema");

	let stage = CastStage::new(target.clone(), Arc::new(table)).with_passthrough(Arc::new(passthrough));
	let mut pipeline = PipelineBuilder::new()
		.add(Box::new(TraceStage::new()))
		.add(Box::new(stage))
		.build(ValueBuilder::new());

	let payload = Payload::open(&file)?;
	payload.stream_first(&binary_options(big_endian, None), &mut pipeline)?;
	let value = pipeline.into_sink().finish()?;

	if json {
		return emit_json(&CastJson {
			path: file.display().to_string(),
			target: target.to_string(),
			value: value_json(&value),
		});
	}

	println!("path: {}", file.display());
	println!("target: {target}");
	print_value(&value, PrintOptions::default());
	Ok(())
}

#[derive(Debug, Deserialize)]
struct SchemaFile {
	#[serde(default)]
	types: Vec<TypeDecl>,
	#[serde(default)]
	passthrough: Vec<PassthroughDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum TypeDecl {
	Struct { name: String, fields: Vec<FieldDecl> },
	Union { name: String, variants: Vec<FieldDecl> },
	Enum { name: String, constants: Vec<String> },
}

#[derive(Debug, Deserialize)]
struct FieldDecl {
	name: String,
	#[serde(rename = "type")]
	type_ref: String,
}

#[derive(Debug, Deserialize)]
struct PassthroughDecl {
	#[serde(rename = "type")]
	type_name: String,
	field: String,
}

fn load_schema(path: &Path) -> Result<(TypeTable, PassthroughFields)> {
	let bytes = std::fs::read(path)?;
	let schema: SchemaFile = serde_json::from_slice(&bytes).map_err(std::io::Error::from)?;

	let mut table = TypeTable::new();
	for decl in schema.types {
		let (name, definition) = match decl {
			TypeDecl::Struct { name, fields } => (name, Definition::Struct(StructDefinition::new(field_definitions(fields)?))),
			TypeDecl::Union { name, variants } => (name, Definition::Union(UnionDefinition::new(field_definitions(variants)?))),
			TypeDecl::Enum { name, constants } => {
				let constants = constants.iter().map(|text| Identifier::parse(text)).collect::<Result<Vec<_>>>()?;
				(name, Definition::Enum(EnumDefinition::new(constants)))
			}
		};
		table.insert(QualifiedTypeName::parse(&name)?, definition);
	}

	let mut passthrough = PassthroughFields::new();
	for decl in schema.passthrough {
		passthrough.allow(QualifiedTypeName::parse(&decl.type_name)?, Identifier::parse(&decl.field)?);
	}

	Ok((table, passthrough))
}

fn field_definitions(fields: Vec<FieldDecl>) -> Result<Vec<FieldDefinition>> {
	fields
		.into_iter()
		.map(|field| -> Result<FieldDefinition> {
			let name = Identifier::parse(&field.name)?;
			Ok(FieldDefinition::new(name, TypeReference::parse(&field.type_ref)?))
		})
		.collect()
}

#[derive(serde::Serialize)]
struct CastJson {
	path: String,
	target: String,
	value: serde_json::Value,
}
