/// Parsed field tag.
///
/// Tag is a comma-separated list. First entry is the output key, the rest are directives:
///
/// * `omitempty` - Leave the field out entirely when its value is zero / empty / absent.
/// * `escape` - Escape string content (also applies to elements of string sequences).
/// * `raw` - Value is pre-encoded JSON, written verbatim (`null` if empty).
/// * `encoder` - Value writes its own JSON (`JsonEncode` or `JsonWrite`).
/// * `stringer` - Value is written as a quoted string using its `Display` impl.
///
/// Unknown directives are ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Directives<'t> {
	pub key: &'t str,
	pub omitempty: bool,
	pub escape: bool,
	pub raw: bool,
	pub encoder: bool,
	pub stringer: bool,
}

impl<'t> Directives<'t> {
	/// Parse tag. Returns `None` if tag has no key, meaning field is not serialized.
	pub fn parse(tag: &'t str) -> Option<Self> {
		let mut parts = tag.split(',');
		let key = parts.next().unwrap_or("");
		if key.is_empty() {
			return None;
		}

		let mut directives = Directives {
			key,
			..Directives::default()
		};
		for part in parts {
			match part {
				"omitempty" => directives.omitempty = true,
				"escape" => directives.escape = true,
				"raw" => directives.raw = true,
				"encoder" => directives.encoder = true,
				"stringer" => directives.stringer = true,
				_ => {}
			}
		}
		Some(directives)
	}
}
