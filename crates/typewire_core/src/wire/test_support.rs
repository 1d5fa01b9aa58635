use std::sync::Arc;

use crate::wire::{
	Definition, EnumDefinition, EnumValue, FieldDefinition, Identifier, ListBuilder, PrimitiveKind, QualifiedTypeName, StructBuilder, StructDefinition,
	SymbolMapBuilder, TypeReference, TypeTable, UnionDefinition, Value,
};

pub(crate) fn ident(text: &str) -> Identifier {
	Identifier::parse(text).expect("identifier parses")
}

pub(crate) fn type_name(local: &str) -> QualifiedTypeName {
	QualifiedTypeName::parse(&format!("acme.orders.v1/{local}")).expect("type name parses")
}

pub(crate) fn type_ref(text: &str) -> TypeReference {
	TypeReference::parse(text).expect("type reference parses")
}

pub(crate) fn primitive(kind: PrimitiveKind) -> TypeReference {
	TypeReference::primitive(kind)
}

fn field(name: &str, type_ref_text: &str) -> FieldDefinition {
	FieldDefinition::new(ident(name), type_ref(type_ref_text))
}

/// Declared types shared by cast and codec tests.
///
/// `Sample` requires `stringF1` then `int32F1`; `Order` exercises restrictions, enums,
/// nested lists, and nullable fields.
pub(crate) fn sample_table() -> Arc<TypeTable> {
	let table = TypeTable::new()
		.with(
			type_name("Sample"),
			Definition::Struct(StructDefinition::new(vec![field("stringF1", "string"), field("int32F1", "int32")])),
		)
		.with(
			type_name("Order"),
			Definition::Struct(StructDefinition::new(vec![
				field("id", r#"restricted<string, "[A-Z]{3}-[0-9]+">"#),
				field("count", "int32"),
				field("total", "nullable<float64>"),
				field("status", "acme.orders.v1/Status"),
				field("lines", "list+<acme.orders.v1/OrderLine>"),
				field("placedAt", "nullable<timestamp>"),
			])),
		)
		.with(
			type_name("OrderLine"),
			Definition::Struct(StructDefinition::new(vec![field("sku", "string"), field("quantity", "restricted<int64, [1..100]>")])),
		)
		.with(
			type_name("Status"),
			Definition::Enum(EnumDefinition::new(vec![ident("pending"), ident("shipped"), ident("cancelled")])),
		)
		.with(
			type_name("Payment"),
			Definition::Union(UnionDefinition::new(vec![field("card", "string"), field("voucher", "int64")])),
		);
	Arc::new(table)
}

pub(crate) fn order_line(sku: &str, quantity: i32) -> Value {
	let map = SymbolMapBuilder::new()
		.with(ident("sku"), Value::string(sku))
		.and_then(|map| map.with(ident("quantity"), Value::Int32(quantity)))
		.expect("line builds");
	Value::SymbolMap(map.build())
}

/// Loosely typed order as a producer would send it: plain maps, narrow ints, string enum.
pub(crate) fn raw_order() -> Value {
	let lines = ListBuilder::new(primitive(PrimitiveKind::String))
		.with(order_line("ABC", 2))
		.with(order_line("XYZ", 7))
		.build();
	let map = SymbolMapBuilder::new()
		.with(ident("id"), Value::string("ORD-42"))
		.and_then(|map| map.with(ident("count"), Value::Int32(9)))
		.and_then(|map| map.with(ident("status"), Value::string("shipped")))
		.and_then(|map| map.with(ident("lines"), Value::List(lines)))
		.and_then(|map| map.with(ident("placedAt"), Value::string("2024-05-01T12:30:00Z")))
		.expect("order builds");
	Value::SymbolMap(map.build())
}

/// Fully typed struct covering every scalar kind.
pub(crate) fn every_kind() -> Value {
	let timestamp = chrono::DateTime::from_timestamp(1_714_566_600, 123_456_789).expect("timestamp in range");
	let nested = StructBuilder::new(type_name("OrderLine"))
		.field(ident("sku"), Value::string("ABC"))
		.and_then(|builder| builder.field(ident("quantity"), Value::Int64(3)))
		.expect("nested builds")
		.build();
	let list = ListBuilder::new(primitive(PrimitiveKind::Int32)).with(Value::Int32(1)).with(Value::Int32(-2)).build();
	let map = SymbolMapBuilder::new().with(ident("inner-key"), Value::Boolean(false)).expect("map builds").build();

	let builder = StructBuilder::new(type_name("Everything"));
	let fields = [
		("null", Value::Null),
		("boolean", Value::Boolean(true)),
		("string", Value::string("héllo")),
		("buffer", Value::Buffer(vec![0, 1, 2, 255])),
		("timestamp", Value::Timestamp(timestamp)),
		("int32", Value::Int32(i32::MIN)),
		("int64", Value::Int64(i64::MAX)),
		("uint32", Value::Uint32(u32::MAX)),
		("uint64", Value::Uint64(u64::MAX)),
		("float32", Value::Float32(1.5)),
		("float64", Value::Float64(-0.25)),
		(
			"status",
			Value::Enum(EnumValue {
				type_name: type_name("Status"),
				constant: ident("shipped"),
			}),
		),
		("lines", Value::List(list)),
		("extras", Value::SymbolMap(map)),
		("nested", Value::Struct(nested)),
	];
	let builder = fields
		.into_iter()
		.try_fold(builder, |builder, (name, value)| builder.field(ident(name), value))
		.expect("struct builds");
	Value::Struct(builder.build())
}
