use crate::wire::test_support::{every_kind, ident, raw_order, type_name, type_ref};
use crate::wire::{Event, EventKind, EventProcessor, ObjectPath, Value, ValueBuilder, WireError, visit_value};

fn feed(builder: &mut ValueBuilder, kinds: Vec<EventKind>) -> Result<(), WireError> {
	kinds.into_iter().try_for_each(|kind| builder.process_event(Event::new(kind, ObjectPath::root())))
}

#[test]
fn rebuilds_visited_values() {
	for value in [every_kind(), raw_order(), Value::Int32(3), Value::Null] {
		let mut builder = ValueBuilder::new();
		visit_value(&value, &mut builder).expect("visit succeeds");
		assert!(builder.is_complete());
		assert_eq!(builder.finish().expect("value built"), value);
	}
}

#[test]
fn rejects_duplicate_fields_with_parent_path() {
	let mut builder = ValueBuilder::new();
	let err = feed(
		&mut builder,
		vec![
			EventKind::StructStart(type_name("Sample")),
			EventKind::FieldStart(ident("stringF1")),
			EventKind::Value(Value::string("a")),
			EventKind::FieldStart(ident("string-f1")),
			EventKind::Value(Value::string("b")),
		],
	)
	.expect_err("duplicate should fail");
	assert!(matches!(err, WireError::DuplicateField { .. }));
	assert_eq!(err.to_string(), "duplicate field stringF1");
}

#[test]
fn finish_requires_a_closed_value() {
	let mut builder = ValueBuilder::new();
	feed(&mut builder, vec![EventKind::ListStart(type_ref("int32")), EventKind::Value(Value::Int32(1))]).expect("partial list accepted");
	assert!(!builder.is_complete());
	assert!(matches!(builder.finish(), Err(WireError::Protocol { .. })));

	assert!(matches!(ValueBuilder::new().finish(), Err(WireError::Protocol { .. })));
}

#[test]
fn rejects_second_top_level_value() {
	let mut builder = ValueBuilder::new();
	let err = feed(&mut builder, vec![EventKind::Value(Value::Null), EventKind::Value(Value::Null)]).expect_err("second value should fail");
	assert!(matches!(err, WireError::Protocol { detail: "second top-level value", .. }));
}

#[test]
fn rejects_field_start_in_list() {
	let mut builder = ValueBuilder::new();
	let err = feed(&mut builder, vec![EventKind::ListStart(type_ref("int32")), EventKind::FieldStart(ident("x"))]).expect_err("field in list should fail");
	assert!(matches!(err, WireError::Protocol { .. }));
}
