use std::{fmt, fmt::Display};

use log::warn;

use crate::{
	convert, Buffer, CompileError, Context, Encode, JsonEncode, JsonWrite, Kind, Mode, Predicate,
	Writer,
};

type Compile<T> = Box<dyn FnOnce(&mut Context, Mode) -> Result<Writer<T>, CompileError>>;

/// Description of one field of shape `T`.
///
/// Holds the field's name, tag and kind, plus everything the compiler may need to write it:
/// a zero check, a way to compile a writer for the field's type, and any `stringer` / `encoder`
/// capabilities the field's type has.
///
/// Each accessor is a plain `fn(&T) -> &F` which projects the field out of the shape.
///
/// `#[derive(Shape)]` builds these. Hand-written [`Shape`](crate::Shape) impls can use
/// [`FieldDescriptor::new`] for any field whose type implements [`Encode`].
pub struct FieldDescriptor<T: 'static> {
	pub(crate) name: &'static str,
	pub(crate) tag: Option<&'static str>,
	pub(crate) kind: Kind,
	pub(crate) optional: bool,
	pub(crate) is_zero: Predicate<T>,
	pub(crate) compile: Option<Compile<T>>,
	pub(crate) stringer: Option<Writer<T>>,
	pub(crate) encoder: Option<Writer<T>>,
}

impl<T: 'static> FieldDescriptor<T> {
	/// Descriptor for a field whose type implements [`Encode`].
	pub fn new<F: Encode>(
		name: &'static str,
		tag: Option<&'static str>,
		get: fn(&T) -> &F,
	) -> Self {
		let compile: Compile<T> = Box::new(move |cx: &mut Context, mode: Mode| {
			let write = F::compile(cx, mode)?;
			let writer: Writer<T> = Box::new(move |value: &T, buf: &mut Buffer| write(get(value), buf));
			Ok(writer)
		});

		Self {
			name,
			tag,
			kind: F::KIND,
			optional: F::OPTIONAL,
			is_zero: Box::new(move |value: &T| get(value).is_zero()),
			compile: Some(compile),
			stringer: None,
			encoder: None,
		}
	}

	/// Descriptor for a field whose type does not implement [`Encode`].
	///
	/// Can only be serialized via `stringer` or `encoder` capabilities. Never counts as zero.
	pub fn opaque(name: &'static str, tag: Option<&'static str>) -> Self {
		Self {
			name,
			tag,
			kind: Kind::Custom,
			optional: false,
			is_zero: Box::new(|_: &T| false),
			compile: None,
			stringer: None,
			encoder: None,
		}
	}

	/// Descriptor for an optional field whose inner type does not implement [`Encode`].
	///
	/// Counts as zero when absent.
	pub fn opaque_optional<F: 'static>(
		name: &'static str,
		tag: Option<&'static str>,
		get: fn(&T) -> &Option<F>,
	) -> Self {
		Self {
			optional: true,
			is_zero: Box::new(move |value: &T| get(value).is_none()),
			..Self::opaque(name, tag)
		}
	}

	/// Add `stringer` capability. Value is written as a quoted string using its `Display` impl.
	pub fn stringer<F: Display + 'static>(mut self, get: fn(&T) -> &F) -> Self {
		// Compiler adds the quotes
		self.stringer = Some(Box::new(move |value: &T, buf: &mut Buffer| {
			convert::write_display(get(value), buf)
		}));
		self
	}

	/// Add `stringer` capability to an optional field. Absent values are written as `null`.
	pub fn stringer_optional<F: Display + 'static>(mut self, get: fn(&T) -> &Option<F>) -> Self {
		self.optional = true;
		self.stringer = Some(Box::new(move |value: &T, buf: &mut Buffer| match get(value) {
			Some(inner) => {
				buf.write_byte(b'"');
				convert::write_display(inner, buf);
				buf.write_byte(b'"');
			}
			None => convert::write_null(buf),
		}));
		self
	}

	/// Add `encoder` capability via [`JsonEncode`].
	pub fn encoder<F: JsonEncode + 'static>(mut self, get: fn(&T) -> &F) -> Self {
		self.encoder = Some(Box::new(move |value: &T, buf: &mut Buffer| {
			get(value).encode_json(buf)
		}));
		self
	}

	/// Add `encoder` capability via [`JsonEncode`] to an optional field.
	/// Absent values are written as `null`.
	pub fn encoder_optional<F: JsonEncode + 'static>(mut self, get: fn(&T) -> &Option<F>) -> Self {
		self.optional = true;
		self.encoder = Some(Box::new(move |value: &T, buf: &mut Buffer| match get(value) {
			Some(inner) => inner.encode_json(buf),
			None => convert::write_null(buf),
		}));
		self
	}

	/// Add `encoder` capability via [`JsonWrite`].
	pub fn writer<F: JsonWrite + 'static>(mut self, get: fn(&T) -> &F) -> Self {
		self.encoder = Some(Box::new(move |value: &T, buf: &mut Buffer| {
			write_json(get(value), buf)
		}));
		self
	}

	/// Add `encoder` capability via [`JsonWrite`] to an optional field.
	/// Absent values are written as `null`.
	pub fn writer_optional<F: JsonWrite + 'static>(mut self, get: fn(&T) -> &Option<F>) -> Self {
		self.optional = true;
		self.encoder = Some(Box::new(move |value: &T, buf: &mut Buffer| match get(value) {
			Some(inner) => write_json(inner, buf),
			None => convert::write_null(buf),
		}));
		self
	}

	#[inline]
	pub fn name(&self) -> &'static str {
		self.name
	}

	#[inline]
	pub fn tag(&self) -> Option<&'static str> {
		self.tag
	}

	#[inline]
	pub fn kind(&self) -> Kind {
		self.kind
	}

	#[inline]
	pub fn is_optional(&self) -> bool {
		self.optional
	}
}

/// Write value via `JsonWrite`. On error, discard partial output and write `null`.
fn write_json<F: JsonWrite>(value: &F, buf: &mut Buffer) {
	let start = buf.len();
	if let Err(err) = value.write_json(buf) {
		warn!("`JsonWrite` implementation failed, writing null: {}", err);
		buf.truncate(start);
		convert::write_null(buf);
	}
}

impl<T: 'static> fmt::Debug for FieldDescriptor<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldDescriptor")
			.field("name", &self.name)
			.field("tag", &self.tag)
			.field("kind", &self.kind)
			.field("optional", &self.optional)
			.field("stringer", &self.stringer.is_some())
			.field("encoder", &self.encoder.is_some())
			.finish()
	}
}
