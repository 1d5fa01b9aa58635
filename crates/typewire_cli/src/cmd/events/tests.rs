use typewire::wire::BinaryCodec;

use crate::cmd::test_support::{run_typewire_stdout, tagged_point, write_payload};

#[test]
fn events_prints_path_stamped_lines() {
	let file = write_payload("events-point.twb", &BinaryCodec::little_endian(), &[tagged_point()]);
	let stdout = run_typewire_stdout(&["events", &file]);

	assert_eq!(
		stdout.lines().collect::<Vec<_>>(),
		[
			"$ struct-start acme.geo.v1/Point",
			"$.x field-start x",
			"$.x value int32 3",
			"$.label field-start label",
			"$.label value string \"origin\"",
			"$ end",
		]
	);
}
