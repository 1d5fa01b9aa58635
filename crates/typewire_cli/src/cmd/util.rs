use serde::Serialize;
use serde_json::{Map, Number};
use typewire::wire::{BinaryOptions, Result, Value};

/// Build decode options from the shared `--big-endian` / `--max-depth` flags.
pub(crate) fn binary_options(big_endian: bool, max_depth: Option<u32>) -> BinaryOptions {
	let mut options = if big_endian { BinaryOptions::big_endian() } else { BinaryOptions::default() };
	if let Some(max_depth) = max_depth {
		options.max_depth = max_depth;
	}
	options
}

/// Pretty-print a serializable payload to stdout.
pub(crate) fn emit_json<T: Serialize>(payload: &T) -> Result<()> {
	let text = serde_json::to_string_pretty(payload).map_err(std::io::Error::from)?;
	println!("{text}");
	Ok(())
}

/// JSON view of a runtime value.
///
/// Struct objects carry their type under `"$type"`; buffers become `{"$buffer": "<hex>"}`.
pub(crate) fn value_json(value: &Value) -> serde_json::Value {
	match value {
		Value::Null => serde_json::Value::Null,
		Value::Boolean(v) => serde_json::Value::Bool(*v),
		Value::String(v) => serde_json::Value::String(v.to_string()),
		Value::Buffer(bytes) => {
			let hex: String = bytes.iter().map(|byte| format!("{byte:02x}")).collect();
			let mut object = Map::new();
			object.insert("$buffer".to_owned(), serde_json::Value::String(hex));
			serde_json::Value::Object(object)
		}
		Value::Int32(v) => serde_json::Value::from(*v),
		Value::Int64(v) => serde_json::Value::from(*v),
		Value::Uint32(v) => serde_json::Value::from(*v),
		Value::Uint64(v) => serde_json::Value::from(*v),
		Value::Float32(v) => float_json(f64::from(*v)),
		Value::Float64(v) => float_json(*v),
		Value::Timestamp(v) => serde_json::Value::String(v.to_rfc3339()),
		Value::Enum(v) => serde_json::Value::String(v.constant.to_string()),
		Value::List(list) => serde_json::Value::Array(list.items().iter().map(value_json).collect()),
		Value::SymbolMap(map) => {
			let object = map.iter().map(|(key, value)| (key.to_string(), value_json(value))).collect();
			serde_json::Value::Object(object)
		}
		Value::Struct(item) => {
			let mut object = Map::new();
			object.insert("$type".to_owned(), serde_json::Value::String(item.type_name.to_string()));
			for (key, value) in item.fields.iter() {
				object.insert(key.to_string(), value_json(value));
			}
			serde_json::Value::Object(object)
		}
	}
}

fn float_json(value: f64) -> serde_json::Value {
	Number::from_f64(value).map_or(serde_json::Value::Null, serde_json::Value::Number)
}
