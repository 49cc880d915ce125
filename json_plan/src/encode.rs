use std::io;

use crate::{Buffer, CompileError, Context, Kind};

/// Writes one value of type `T` to a [`Buffer`]. Produced by plan compilation.
pub type Writer<T> = Box<dyn Fn(&T, &mut Buffer) + Send + Sync>;

/// Tests a value of type `T`. Used for zero checks.
pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// How string content is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style {
	/// Write verbatim
	Plain,
	/// Escape special characters
	Escape,
	/// Value is pre-encoded JSON. Written verbatim without quotes, `null` if empty.
	Raw,
}

impl Style {
	/// Name of directive which selects this style.
	pub const fn directive(self) -> &'static str {
		match self {
			Style::Plain => "",
			Style::Escape => "escape",
			Style::Raw => "raw",
		}
	}
}

/// Options for compiling a value's writer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mode {
	style: Style,
	quoted: bool,
}

impl Mode {
	pub(crate) const fn new(style: Style) -> Self {
		Self {
			style,
			quoted: true,
		}
	}

	/// Same mode, but the compiler writes the surrounding quotes itself as static bytes.
	pub(crate) const fn unquoted(self) -> Self {
		Self {
			quoted: false,
			..self
		}
	}

	/// Same mode, but writer must produce its own quotes.
	pub const fn quoted(self) -> Self {
		Self {
			quoted: true,
			..self
		}
	}

	#[inline]
	pub const fn style(self) -> Style {
		self.style
	}

	/// Whether writers for quoted kinds (strings, timestamps) must write their own quotes.
	/// Ignored by other kinds.
	#[inline]
	pub const fn is_quoted(self) -> bool {
		self.quoted
	}
}

/// Types which plans can serialize.
///
/// `compile` is called once per field when compiling a plan. The returned [`Writer`] is then
/// called every time a value is serialized, so all decisions which can be made up front should
/// be made in `compile`, not in the writer.
///
/// Implemented for primitives, strings, timestamps, `Option`, `Box`, `Arc`, `Vec`, boxed slices
/// and arrays. `#[derive(Shape)]` implements it for structs.
pub trait Encode: Sized + 'static {
	const KIND: Kind;

	/// `true` for types which may be absent (`Option`). Absent values are written as `null`.
	const OPTIONAL: bool = false;

	/// Get bytes of a slice of this type, for the `raw` directive on sequences.
	#[doc(hidden)]
	const BYTES: Option<fn(&[Self]) -> &[u8]> = None;

	/// Compile a writer for values of this type.
	fn compile(cx: &mut Context, mode: Mode) -> Result<Writer<Self>, CompileError>;

	/// Whether value counts as empty for `omitempty`.
	fn is_zero(&self) -> bool;
}

/// Capability to write own JSON directly into plan's output buffer.
///
/// Used for fields tagged `encoder`. Preferred over [`JsonWrite`] if a type implements both.
/// Output is written verbatim, so must be valid JSON.
pub trait JsonEncode {
	fn encode_json(&self, buf: &mut Buffer);
}

/// Capability to write own JSON to any byte sink.
///
/// Used for fields tagged `encoder`, if type does not implement [`JsonEncode`].
/// If an error is returned, any partial output is discarded and `null` is written instead.
pub trait JsonWrite {
	fn write_json<W: io::Write + ?Sized>(&self, writer: &mut W) -> io::Result<()>;
}
