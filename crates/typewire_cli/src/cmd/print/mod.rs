use typewire::wire::Value;

/// Output truncation and formatting limits for rendered values.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Maximum number of fields printed for a single struct or map.
	pub max_fields: usize,
	/// Maximum number of Unicode scalar values printed for strings.
	pub max_string_len: usize,
	/// Maximum number of items printed for lists.
	pub max_list_items: usize,
	/// Maximum nesting depth before composites are summarized.
	pub max_print_depth: u32,
}

impl Default for PrintOptions {
	fn default() -> Self {
		Self {
			max_fields: 80,
			max_string_len: 200,
			max_list_items: 16,
			max_print_depth: 6,
		}
	}
}

impl PrintOptions {
	/// Preset for skimming many values at once.
	pub fn compact() -> Self {
		Self {
			max_fields: 24,
			max_string_len: 80,
			max_list_items: 4,
			max_print_depth: 3,
		}
	}
}

/// Print one value tree to stdout.
pub fn print_value(value: &Value, options: PrintOptions) {
	for line in render_value(value, options) {
		println!("{line}");
	}
}

/// Render one value tree as indented lines.
pub fn render_value(value: &Value, options: PrintOptions) -> Vec<String> {
	let mut lines = Vec::new();
	render_into(value, 0, 0, "", options, &mut lines);
	lines
}

fn render_into(value: &Value, indent: usize, depth: u32, label: &str, options: PrintOptions, lines: &mut Vec<String>) {
	let pad = " ".repeat(indent);
	match value {
		Value::List(list) => {
			if depth >= options.max_print_depth {
				lines.push(format!("{pad}{label}list<{}> [... {} items]", list.element_type(), list.len()));
				return;
			}
			lines.push(format!("{pad}{label}list<{}> [", list.element_type()));
			for item in list.items().iter().take(options.max_list_items) {
				render_into(item, indent + 2, depth + 1, "", options, lines);
			}
			if list.len() > options.max_list_items {
				lines.push(format!("{pad}  ... {} more", list.len() - options.max_list_items));
			}
			lines.push(format!("{pad}]"));
		}
		Value::SymbolMap(map) => {
			if depth >= options.max_print_depth {
				lines.push(format!("{pad}{label}map {{ ... }}"));
				return;
			}
			lines.push(format!("{pad}{label}map {{"));
			for (key, field) in map.iter().take(options.max_fields) {
				render_into(field, indent + 2, depth + 1, &format!("{key} = "), options, lines);
			}
			if map.len() > options.max_fields {
				lines.push(format!("{pad}  ... {} more fields", map.len() - options.max_fields));
			}
			lines.push(format!("{pad}}}"));
		}
		Value::Struct(item) => {
			if depth >= options.max_print_depth {
				lines.push(format!("{pad}{label}{} {{ ... }}", item.type_name));
				return;
			}
			lines.push(format!("{pad}{label}{} {{", item.type_name));
			for (key, field) in item.fields.iter().take(options.max_fields) {
				render_into(field, indent + 2, depth + 1, &format!("{key} = "), options, lines);
			}
			if item.fields.len() > options.max_fields {
				lines.push(format!("{pad}  ... {} more fields", item.fields.len() - options.max_fields));
			}
			lines.push(format!("{pad}}}"));
		}
		Value::String(text) => lines.push(format!("{pad}{label}\"{}\"", truncate(text, options.max_string_len))),
		scalar => lines.push(format!("{pad}{label}{scalar}")),
	}
}

fn truncate(text: &str, max_chars: usize) -> String {
	match text.char_indices().nth(max_chars) {
		Some((end, _)) => format!("{}...", &text[..end]),
		None => text.to_owned(),
	}
}

#[cfg(test)]
mod tests;
