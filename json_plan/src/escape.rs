//! String escaping.
//!
//! Only escapes the characters which commonly break JSON string literals:
//! backslash, double quote, newline, carriage return and tab.
//! Other control characters are passed through unchanged.

use crate::Buffer;

/// Write `bytes` to `buf`, escaping special characters.
///
/// Runs of bytes which need no escaping are copied in one go.
pub fn escape_into(bytes: &[u8], buf: &mut Buffer) {
	let mut start = 0;
	for (index, &byte) in bytes.iter().enumerate() {
		let escaped: &[u8] = match byte {
			b'\\' => b"\\\\",
			b'"' => b"\\\"",
			b'\n' => b"\\n",
			b'\r' => b"\\r",
			b'\t' => b"\\t",
			_ => continue,
		};

		if start < index {
			buf.write(&bytes[start..index]);
		}
		buf.write(escaped);
		start = index + 1;
	}

	if start < bytes.len() {
		buf.write(&bytes[start..]);
	}
}

/// Write `s` to `buf`, escaping special characters.
#[inline]
pub fn escape_str(s: &str, buf: &mut Buffer) {
	escape_into(s.as_bytes(), buf);
}

#[cfg(test)]
mod tests {
	use super::*;

	fn escaped(s: &str) -> String {
		let mut buf = Buffer::new();
		escape_str(s, &mut buf);
		buf.as_str().unwrap().to_string()
	}

	#[test]
	fn plain_text_unchanged() {
		assert_eq!(escaped(""), "");
		assert_eq!(escaped("hello world"), "hello world");
		assert_eq!(escaped("月曜日"), "月曜日");
	}

	#[test]
	fn escapes_specials() {
		assert_eq!(escaped(r"a\b"), r"a\\b");
		assert_eq!(escaped("say \"hi\""), r#"say \"hi\""#);
		assert_eq!(escaped("one\ntwo\r\nthree\tfour"), r"one\ntwo\r\nthree\tfour");
		assert_eq!(escaped("\\\"\n\r\t"), r#"\\\"\n\r\t"#);
	}

	#[test]
	fn other_controls_pass_through() {
		assert_eq!(escaped("a\u{8}b"), "a\u{8}b");
	}

	#[test]
	fn escaped_output_parses_back() {
		for s in ["one\\two\\,three,\n\t\tfour\"", "\"\"", "tab\tend\\"] {
			let json = format!("\"{}\"", escaped(s));
			let parsed: String = serde_json::from_str(&json).unwrap();
			assert_eq!(parsed, s);
		}
	}

	#[test]
	fn random_mixes_parse_back() {
		use rand::Rng;
		use rand_pcg::Lcg64Xsh32;

		const STATE: u64 = 3141592653;
		const STREAM: u64 = 5897932384;
		const PIECES: [&str; 8] = ["\\", "\"", "\n", "\r", "\t", "a", "plain ", "月"];

		let mut rng = Lcg64Xsh32::new(STATE, STREAM);
		for _ in 0..500 {
			let len = rng.gen_range(0..20);
			let s = (0..len)
				.map(|_| PIECES[rng.gen_range(0..PIECES.len())])
				.collect::<String>();
			let json = format!("\"{}\"", escaped(&s));
			let parsed: String = serde_json::from_str(&json).unwrap();
			assert_eq!(parsed, s);
		}
	}
}
