use typewire::wire::{EnumValue, ListBuilder, StructBuilder, SymbolMapBuilder, TypeReference, Value};

use super::{PrintOptions, render_value};
use crate::cmd::test_support::{ident, tagged_point, type_name};

#[test]
fn renders_struct_fields_inline() {
	assert_eq!(
		render_value(&tagged_point(), PrintOptions::default()),
		["acme.geo.v1/Point {", "  x = 3", "  label = \"origin\"", "}"]
	);
}

#[test]
fn truncates_long_lists() {
	let list = (0..6).fold(ListBuilder::new(TypeReference::parse("int32").expect("type parses")), |list, idx| {
		list.with(Value::Int32(idx))
	});
	assert_eq!(
		render_value(&Value::List(list.build()), PrintOptions::compact()),
		["list<int32> [", "  0", "  1", "  2", "  3", "  ... 2 more", "]"]
	);
}

#[test]
fn summarizes_beyond_print_depth() {
	let meta = SymbolMapBuilder::new().with(ident("flag"), Value::Boolean(true)).expect("map builds").build();
	let status = Value::Enum(EnumValue {
		type_name: type_name("acme.orders.v1/Status"),
		constant: ident("shipped"),
	});
	let value = StructBuilder::new(type_name("acme.orders.v1/Order"))
		.field(ident("meta"), Value::SymbolMap(meta))
		.and_then(|builder| builder.field(ident("status"), status))
		.expect("struct builds")
		.build();
	let options = PrintOptions {
		max_print_depth: 1,
		..PrintOptions::default()
	};
	assert_eq!(
		render_value(&Value::Struct(value), options),
		["acme.orders.v1/Order {", "  meta = map { ... }", "  status = acme.orders.v1/Status::shipped", "}"]
	);
}

#[test]
fn truncates_strings_on_char_boundaries() {
	let options = PrintOptions {
		max_string_len: 3,
		..PrintOptions::default()
	};
	assert_eq!(render_value(&Value::string("héllo"), options), ["\"hél...\""]);
	assert_eq!(render_value(&Value::string("abc"), options), ["\"abc\""]);
}
