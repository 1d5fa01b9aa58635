use crate::wire::test_support::{ident, type_name, type_ref};
use crate::wire::{EventRecorder, ListBuilder, StructBuilder, SymbolMapBuilder, Value, visit_value};

#[test]
fn emits_canonical_depth_first_sequence() {
	let list = ListBuilder::new(type_ref("int32")).with(Value::Int32(4)).with(Value::Int32(5)).build();
	let meta = SymbolMapBuilder::new()
		.with(ident("zeta"), Value::Boolean(true))
		.and_then(|map| map.with(ident("alpha"), Value::Null))
		.expect("map builds")
		.build();
	let value = StructBuilder::new(type_name("Sample"))
		.field(ident("counts"), Value::List(list))
		.and_then(|builder| builder.field(ident("meta"), Value::SymbolMap(meta)))
		.expect("struct builds")
		.build();

	let mut recorder = EventRecorder::new();
	visit_value(&Value::Struct(value), &mut recorder).expect("visit succeeds");
	assert_eq!(
		recorder.lines(),
		[
			"$ struct-start acme.orders.v1/Sample",
			"$.counts field-start counts",
			"$.counts list-start int32",
			"$.counts[0] value int32 4",
			"$.counts[1] value int32 5",
			"$.counts end",
			"$.meta field-start meta",
			"$.meta map-start",
			"$.meta.zeta field-start zeta",
			"$.meta.zeta value boolean true",
			"$.meta.alpha field-start alpha",
			"$.meta.alpha value null null",
			"$.meta end",
			"$ end",
		]
	);
}

#[test]
fn scalar_is_single_event() {
	let mut recorder = EventRecorder::new();
	visit_value(&Value::Uint64(7), &mut recorder).expect("visit succeeds");
	assert_eq!(recorder.lines(), ["$ value uint64 7"]);
}

#[test]
fn empty_list_opens_and_closes() {
	let mut recorder = EventRecorder::new();
	visit_value(&Value::List(ListBuilder::new(type_ref("string")).build()), &mut recorder).expect("visit succeeds");
	assert_eq!(recorder.lines(), ["$ list-start string", "$ end"]);
}
