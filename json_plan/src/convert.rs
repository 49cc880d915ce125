//! Converters which write a single scalar value to a [`Buffer`].
//!
//! Plans call these directly. They're public so hand-written [`Encode`](crate::Encode)
//! implementations can use them too.

use std::fmt::{self, Display};

use log::warn;

use crate::{escape, Buffer};

pub(crate) const NULL: &[u8] = b"null";

/// Write `null`.
#[inline]
pub fn write_null(buf: &mut Buffer) {
	buf.write(NULL);
}

#[inline]
pub fn write_bool(value: &bool, buf: &mut Buffer) {
	buf.write(if *value { b"true" } else { b"false" });
}

/// Write integer in decimal.
#[inline]
pub fn write_int<I: itoa::Integer + Copy>(value: &I, buf: &mut Buffer) {
	let mut digits = itoa::Buffer::new();
	buf.write_string(digits.format(*value));
}

/// Write float in shortest form which round-trips.
/// NaN and infinities have no JSON representation, so are written as `null`.
#[inline]
pub fn write_f32(value: &f32, buf: &mut Buffer) {
	if value.is_finite() {
		let mut digits = ryu::Buffer::new();
		buf.write_string(digits.format_finite(*value));
	} else {
		write_null(buf);
	}
}

/// Write float in shortest form which round-trips.
/// NaN and infinities have no JSON representation, so are written as `null`.
#[inline]
pub fn write_f64(value: &f64, buf: &mut Buffer) {
	if value.is_finite() {
		let mut digits = ryu::Buffer::new();
		buf.write_string(digits.format_finite(*value));
	} else {
		write_null(buf);
	}
}

/// Write string surrounded by quotes. Content is not escaped.
#[inline]
pub fn write_quoted(value: &str, buf: &mut Buffer) {
	buf.write_byte(b'"');
	buf.write_string(value);
	buf.write_byte(b'"');
}

/// Write string surrounded by quotes, with content escaped.
#[inline]
pub fn write_quoted_escaped(value: &str, buf: &mut Buffer) {
	buf.write_byte(b'"');
	escape::escape_str(value, buf);
	buf.write_byte(b'"');
}

/// Write pre-encoded JSON verbatim. Empty input is written as `null`.
#[inline]
pub fn write_raw(bytes: &[u8], buf: &mut Buffer) {
	if bytes.is_empty() {
		write_null(buf);
	} else {
		buf.write(bytes);
	}
}

/// Write a value's `Display` output. No quotes, no escaping.
pub fn write_display<D: Display + ?Sized>(value: &D, buf: &mut Buffer) {
	// `Buffer` never fails, so error can only come from the `Display` impl
	if fmt::write(buf, format_args!("{}", value)).is_err() {
		warn!("`Display` implementation returned an error");
	}
}

/// Write timestamp in RFC 3339 format, with sub-second precision only where non-zero.
/// No quotes.
///
/// Timestamps RFC 3339 can't represent (e.g. year > 9999) fall back to `Display` output.
#[cfg(feature = "time")]
pub fn write_time(value: &time::OffsetDateTime, buf: &mut Buffer) {
	use time::format_description::well_known::Rfc3339;

	let start = buf.len();
	if value.format_into(buf, &Rfc3339).is_err() {
		buf.truncate(start);
		write_display(value, buf);
	}
}
