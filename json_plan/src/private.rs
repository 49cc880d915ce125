//! Support code for `#[derive(Shape)]`. Not public API.
//!
//! Derived code needs to pick how to describe a field based on which traits the field's type
//! implements, which it can't know at macro expansion time. `Probe` resolves this at compile
//! time using method resolution order ("autoref specialization"): derived code calls methods on
//! a `&&Probe<F>`, and the compiler picks the first impl in this order whose bounds hold:
//!
//! 1. impl for `&Probe<F>`
//! 2. impl for `&&Probe<F>`
//! 3. impl for `Probe<F>`

use std::{fmt::Display, marker::PhantomData};

use crate::{Encode, FieldDescriptor, JsonEncode, JsonWrite};

pub struct Probe<F>(PhantomData<fn() -> F>);

impl<F> Probe<F> {
	#[inline]
	pub const fn new() -> Self {
		Probe(PhantomData)
	}
}

/// Import with `use ::json_plan::__private::probe::*;` to bring all probe methods into scope.
pub mod probe {
	use super::*;

	type Name = &'static str;
	type Tag = Option<&'static str>;

	/// Field type implements `Encode`.
	pub trait EncodeBase<F> {
		fn base<T: 'static>(&self, name: Name, tag: Tag, get: fn(&T) -> &F) -> FieldDescriptor<T>;
		fn base_optional<T: 'static>(
			&self,
			name: Name,
			tag: Tag,
			get: fn(&T) -> &Option<F>,
		) -> FieldDescriptor<T>;
	}

	impl<F: Encode> EncodeBase<F> for &Probe<F> {
		#[inline]
		fn base<T: 'static>(&self, name: Name, tag: Tag, get: fn(&T) -> &F) -> FieldDescriptor<T> {
			FieldDescriptor::new(name, tag, get)
		}

		#[inline]
		fn base_optional<T: 'static>(
			&self,
			name: Name,
			tag: Tag,
			get: fn(&T) -> &Option<F>,
		) -> FieldDescriptor<T> {
			FieldDescriptor::new(name, tag, get)
		}
	}

	/// Field type does not implement `Encode`.
	pub trait OpaqueBase<F> {
		fn base<T: 'static>(&self, name: Name, tag: Tag, get: fn(&T) -> &F) -> FieldDescriptor<T>;
		fn base_optional<T: 'static>(
			&self,
			name: Name,
			tag: Tag,
			get: fn(&T) -> &Option<F>,
		) -> FieldDescriptor<T>;
	}

	impl<F: 'static> OpaqueBase<F> for Probe<F> {
		#[inline]
		fn base<T: 'static>(&self, name: Name, tag: Tag, _get: fn(&T) -> &F) -> FieldDescriptor<T> {
			FieldDescriptor::opaque(name, tag)
		}

		#[inline]
		fn base_optional<T: 'static>(
			&self,
			name: Name,
			tag: Tag,
			get: fn(&T) -> &Option<F>,
		) -> FieldDescriptor<T> {
			FieldDescriptor::opaque_optional(name, tag, get)
		}
	}

	/// Field type implements `Display`.
	pub trait DisplayStringer<F> {
		fn stringer<T: 'static>(&self, field: FieldDescriptor<T>, get: fn(&T) -> &F)
			-> FieldDescriptor<T>;
		fn stringer_optional<T: 'static>(
			&self,
			field: FieldDescriptor<T>,
			get: fn(&T) -> &Option<F>,
		) -> FieldDescriptor<T>;
	}

	impl<F: Display + 'static> DisplayStringer<F> for &Probe<F> {
		#[inline]
		fn stringer<T: 'static>(
			&self,
			field: FieldDescriptor<T>,
			get: fn(&T) -> &F,
		) -> FieldDescriptor<T> {
			field.stringer(get)
		}

		#[inline]
		fn stringer_optional<T: 'static>(
			&self,
			field: FieldDescriptor<T>,
			get: fn(&T) -> &Option<F>,
		) -> FieldDescriptor<T> {
			field.stringer_optional(get)
		}
	}

	/// Field type does not implement `Display`. `stringer` directive is ignored.
	pub trait NoStringer<F> {
		fn stringer<T: 'static>(&self, field: FieldDescriptor<T>, get: fn(&T) -> &F)
			-> FieldDescriptor<T>;
		fn stringer_optional<T: 'static>(
			&self,
			field: FieldDescriptor<T>,
			get: fn(&T) -> &Option<F>,
		) -> FieldDescriptor<T>;
	}

	impl<F> NoStringer<F> for Probe<F> {
		#[inline]
		fn stringer<T: 'static>(
			&self,
			field: FieldDescriptor<T>,
			_get: fn(&T) -> &F,
		) -> FieldDescriptor<T> {
			field
		}

		#[inline]
		fn stringer_optional<T: 'static>(
			&self,
			field: FieldDescriptor<T>,
			_get: fn(&T) -> &Option<F>,
		) -> FieldDescriptor<T> {
			field
		}
	}

	/// Field type implements `JsonEncode`. Preferred over `JsonWrite`.
	pub trait BufferEncoder<F> {
		fn encoder<T: 'static>(&self, field: FieldDescriptor<T>, get: fn(&T) -> &F)
			-> FieldDescriptor<T>;
		fn encoder_optional<T: 'static>(
			&self,
			field: FieldDescriptor<T>,
			get: fn(&T) -> &Option<F>,
		) -> FieldDescriptor<T>;
	}

	impl<F: JsonEncode + 'static> BufferEncoder<F> for &Probe<F> {
		#[inline]
		fn encoder<T: 'static>(
			&self,
			field: FieldDescriptor<T>,
			get: fn(&T) -> &F,
		) -> FieldDescriptor<T> {
			field.encoder(get)
		}

		#[inline]
		fn encoder_optional<T: 'static>(
			&self,
			field: FieldDescriptor<T>,
			get: fn(&T) -> &Option<F>,
		) -> FieldDescriptor<T> {
			field.encoder_optional(get)
		}
	}

	/// Field type implements `JsonWrite`.
	pub trait StreamEncoder<F> {
		fn encoder<T: 'static>(&self, field: FieldDescriptor<T>, get: fn(&T) -> &F)
			-> FieldDescriptor<T>;
		fn encoder_optional<T: 'static>(
			&self,
			field: FieldDescriptor<T>,
			get: fn(&T) -> &Option<F>,
		) -> FieldDescriptor<T>;
	}

	impl<F: JsonWrite + 'static> StreamEncoder<F> for &&Probe<F> {
		#[inline]
		fn encoder<T: 'static>(
			&self,
			field: FieldDescriptor<T>,
			get: fn(&T) -> &F,
		) -> FieldDescriptor<T> {
			field.writer(get)
		}

		#[inline]
		fn encoder_optional<T: 'static>(
			&self,
			field: FieldDescriptor<T>,
			get: fn(&T) -> &Option<F>,
		) -> FieldDescriptor<T> {
			field.writer_optional(get)
		}
	}

	/// Field type has no encoding capability. Compiling the plan will fail.
	pub trait NoEncoder<F> {
		fn encoder<T: 'static>(&self, field: FieldDescriptor<T>, get: fn(&T) -> &F)
			-> FieldDescriptor<T>;
		fn encoder_optional<T: 'static>(
			&self,
			field: FieldDescriptor<T>,
			get: fn(&T) -> &Option<F>,
		) -> FieldDescriptor<T>;
	}

	impl<F> NoEncoder<F> for Probe<F> {
		#[inline]
		fn encoder<T: 'static>(
			&self,
			field: FieldDescriptor<T>,
			_get: fn(&T) -> &F,
		) -> FieldDescriptor<T> {
			field
		}

		#[inline]
		fn encoder_optional<T: 'static>(
			&self,
			field: FieldDescriptor<T>,
			_get: fn(&T) -> &Option<F>,
		) -> FieldDescriptor<T> {
			field
		}
	}
}

#[cfg(test)]
mod tests {
	use std::{fmt, io};

	use super::{probe::*, Probe};
	use crate::{Buffer, JsonEncode, JsonWrite, Kind};

	struct Both;
	struct StreamOnly;
	struct Neither;

	impl JsonEncode for Both {
		fn encode_json(&self, buf: &mut Buffer) {
			buf.write(b"\"buffer\"");
		}
	}

	impl JsonWrite for Both {
		fn write_json<W: io::Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
			writer.write_all(b"\"stream\"")
		}
	}

	impl JsonWrite for StreamOnly {
		fn write_json<W: io::Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
			writer.write_all(b"\"stream\"")
		}
	}

	impl fmt::Display for Neither {
		fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
			f.write_str("neither")
		}
	}

	struct Holder {
		both: Both,
		stream: StreamOnly,
		neither: Neither,
		num: u32,
	}

	fn write<T: 'static>(field: &crate::FieldDescriptor<T>, value: &T) -> String {
		let mut buf = Buffer::new();
		(field.encoder.as_ref().unwrap())(value, &mut buf);
		buf.as_str().unwrap().to_string()
	}

	fn holder() -> Holder {
		Holder {
			both: Both,
			stream: StreamOnly,
			neither: Neither,
			num: 5,
		}
	}

	#[test]
	fn base_picks_encode() {
		let field = (&&Probe::<u32>::new()).base("num", None, |h: &Holder| &h.num);
		assert_eq!(field.kind(), Kind::U32);
		assert!(field.compile.is_some());

		let field = (&&Probe::<Neither>::new()).base("neither", None, |h: &Holder| &h.neither);
		assert_eq!(field.kind(), Kind::Custom);
		assert!(field.compile.is_none());
	}

	#[test]
	fn encoder_prefers_buffer() {
		let probe = &&Probe::<Both>::new();
		let field = probe.base("both", None, |h: &Holder| &h.both);
		let field = probe.encoder(field, |h: &Holder| &h.both);
		assert_eq!(write(&field, &holder()), "\"buffer\"");

		let probe = &&Probe::<StreamOnly>::new();
		let field = probe.base("stream", None, |h: &Holder| &h.stream);
		let field = probe.encoder(field, |h: &Holder| &h.stream);
		assert_eq!(write(&field, &holder()), "\"stream\"");

		let probe = &&Probe::<Neither>::new();
		let field = probe.base("neither", None, |h: &Holder| &h.neither);
		let field = probe.encoder(field, |h: &Holder| &h.neither);
		assert!(field.encoder.is_none());
	}

	#[test]
	fn stringer_needs_display() {
		let probe = &&Probe::<Neither>::new();
		let field = probe.base("neither", None, |h: &Holder| &h.neither);
		let field = probe.stringer(field, |h: &Holder| &h.neither);
		assert!(field.stringer.is_some());

		let probe = &&Probe::<StreamOnly>::new();
		let field = probe.base("stream", None, |h: &Holder| &h.stream);
		let field = probe.stringer(field, |h: &Holder| &h.stream);
		assert!(field.stringer.is_none());
	}
}
