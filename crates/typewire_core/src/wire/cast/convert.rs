use chrono::{DateTime, Utc};

use crate::wire::{
	AtomicType, Definition, EnumDefinition, EnumValue, Identifier, ObjectPath, PrimitiveKind, QualifiedTypeName, Restriction, Result, TypeReference,
	TypeTable, Value, WireError,
};

/// Convert a scalar to `expected`, then re-check any restriction on the converted value.
pub(super) fn convert(value: Value, expected: &TypeReference, table: &TypeTable, path: &ObjectPath) -> Result<Value> {
	match expected {
		TypeReference::Nullable(_) if matches!(value, Value::Null) => Ok(Value::Null),
		TypeReference::Nullable(inner) => convert(value, inner, table, path),
		TypeReference::Restricted { base, restriction } => {
			let converted = convert(value, base, table, path)?;
			if !matches!(converted, Value::Null) {
				check_restriction(&converted, restriction, path)?;
			}
			Ok(converted)
		}
		TypeReference::Atomic(AtomicType::Primitive(kind)) => widen(value, *kind, path),
		TypeReference::Atomic(AtomicType::Named(name)) => match table.get(name) {
			Some(Definition::Enum(definition)) => to_enum(value, name, definition, path),
			Some(Definition::Struct(_) | Definition::Union(_)) => Err(mismatch(expected, value.kind().as_str(), path)),
			None => Ok(value),
		},
		TypeReference::List { .. } => Err(mismatch(expected, value.kind().as_str(), path)),
	}
}

fn widen(value: Value, kind: PrimitiveKind, path: &ObjectPath) -> Result<Value> {
	let converted = match (kind, value) {
		(PrimitiveKind::Boolean, value @ Value::Boolean(_))
		| (PrimitiveKind::String, value @ Value::String(_))
		| (PrimitiveKind::Buffer, value @ Value::Buffer(_))
		| (PrimitiveKind::Int32, value @ Value::Int32(_))
		| (PrimitiveKind::Int64, value @ Value::Int64(_))
		| (PrimitiveKind::Uint32, value @ Value::Uint32(_))
		| (PrimitiveKind::Uint64, value @ Value::Uint64(_))
		| (PrimitiveKind::Float32, value @ Value::Float32(_))
		| (PrimitiveKind::Float64, value @ Value::Float64(_))
		| (PrimitiveKind::Timestamp, value @ Value::Timestamp(_)) => value,

		(PrimitiveKind::Int64, Value::Int32(v)) => Value::Int64(i64::from(v)),
		(PrimitiveKind::Float64, Value::Int32(v)) => Value::Float64(f64::from(v)),
		(PrimitiveKind::Uint64, Value::Uint32(v)) => Value::Uint64(u64::from(v)),
		(PrimitiveKind::Int64, Value::Uint32(v)) => Value::Int64(i64::from(v)),
		(PrimitiveKind::Float64, Value::Uint32(v)) => Value::Float64(f64::from(v)),
		(PrimitiveKind::Float64, Value::Float32(v)) => Value::Float64(f64::from(v)),
		(PrimitiveKind::Timestamp, Value::String(text)) => match DateTime::parse_from_rfc3339(&text) {
			Ok(parsed) => Value::Timestamp(parsed.with_timezone(&Utc)),
			Err(_) => {
				return Err(WireError::CastMismatch {
					expected: kind.as_str().to_owned(),
					actual: "string",
					path: path.clone(),
				});
			}
		},

		(kind, value) => {
			return Err(WireError::CastMismatch {
				expected: kind.as_str().to_owned(),
				actual: value.kind().as_str(),
				path: path.clone(),
			});
		}
	};
	Ok(converted)
}

fn to_enum(value: Value, type_name: &QualifiedTypeName, definition: &EnumDefinition, path: &ObjectPath) -> Result<Value> {
	let unknown = |constant: String| WireError::UnknownEnumConstant {
		constant,
		type_name: type_name.clone(),
		path: path.clone(),
	};

	let constant = match value {
		Value::Enum(EnumValue { constant, .. }) => constant,
		Value::String(text) => Identifier::parse(&text).map_err(|_| unknown(text.to_string()))?,
		other => {
			return Err(WireError::CastMismatch {
				expected: type_name.to_string(),
				actual: other.kind().as_str(),
				path: path.clone(),
			});
		}
	};

	if !definition.contains(&constant) {
		return Err(unknown(constant.to_string()));
	}
	Ok(Value::Enum(EnumValue {
		type_name: type_name.clone(),
		constant,
	}))
}

fn check_restriction(value: &Value, restriction: &Restriction, path: &ObjectPath) -> Result<()> {
	let satisfied = match (restriction, value) {
		(Restriction::Regex(pattern), Value::String(text)) => pattern.is_match(text),
		(Restriction::Regex(_), _) => false,
		(Restriction::Range(range), value) => range.contains(value),
	};
	if satisfied {
		return Ok(());
	}
	Err(WireError::RestrictionViolated {
		value: value.to_string(),
		restriction: restriction.to_string(),
		path: path.clone(),
	})
}

pub(super) fn mismatch(expected: &TypeReference, actual: &'static str, path: &ObjectPath) -> WireError {
	WireError::CastMismatch {
		expected: expected.to_string(),
		actual,
		path: path.clone(),
	}
}
