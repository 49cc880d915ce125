use std::{borrow::Cow, num, sync::Arc};

use crate::{convert, escape, Buffer, CompileError, Context, Encode, Kind, Mode, Style, Writer};

macro_rules! impl_int {
	($ty:ty, $kind:ident) => {
		impl_int!($ty, $kind, None);
	};

	($ty:ty, $kind:ident, $bytes:expr) => {
		impl Encode for $ty {
			const KIND: Kind = Kind::$kind;
			const BYTES: Option<fn(&[Self]) -> &[u8]> = $bytes;

			fn compile(cx: &mut Context, mode: Mode) -> Result<Writer<Self>, CompileError> {
				cx.require_plain(mode, Self::KIND)?;
				Ok(Box::new(convert::write_int::<$ty>))
			}

			#[inline]
			fn is_zero(&self) -> bool {
				*self == 0
			}
		}
	};
}

fn u8_slice(bytes: &[u8]) -> &[u8] {
	bytes
}

impl_int!(u8, U8, Some(u8_slice));
impl_int!(u16, U16);
impl_int!(u32, U32);
impl_int!(u64, U64);
impl_int!(u128, U128);
impl_int!(usize, Usize);

impl_int!(i8, I8);
impl_int!(i16, I16);
impl_int!(i32, I32);
impl_int!(i64, I64);
impl_int!(i128, I128);
impl_int!(isize, Isize);

macro_rules! impl_non_zero {
	($ty:ty, $kind:ident) => {
		impl Encode for $ty {
			const KIND: Kind = Kind::$kind;

			fn compile(cx: &mut Context, mode: Mode) -> Result<Writer<Self>, CompileError> {
				cx.require_plain(mode, Self::KIND)?;
				Ok(Box::new(|value: &Self, buf: &mut Buffer| {
					convert::write_int(&value.get(), buf)
				}))
			}

			#[inline]
			fn is_zero(&self) -> bool {
				false
			}
		}
	};
}

impl_non_zero!(num::NonZeroU8, U8);
impl_non_zero!(num::NonZeroU16, U16);
impl_non_zero!(num::NonZeroU32, U32);
impl_non_zero!(num::NonZeroU64, U64);
impl_non_zero!(num::NonZeroU128, U128);
impl_non_zero!(num::NonZeroUsize, Usize);

impl_non_zero!(num::NonZeroI8, I8);
impl_non_zero!(num::NonZeroI16, I16);
impl_non_zero!(num::NonZeroI32, I32);
impl_non_zero!(num::NonZeroI64, I64);
impl_non_zero!(num::NonZeroI128, I128);
impl_non_zero!(num::NonZeroIsize, Isize);

macro_rules! impl_float {
	($ty:ty, $kind:ident, $write:path) => {
		impl Encode for $ty {
			const KIND: Kind = Kind::$kind;

			fn compile(cx: &mut Context, mode: Mode) -> Result<Writer<Self>, CompileError> {
				cx.require_plain(mode, Self::KIND)?;
				Ok(Box::new($write))
			}

			#[inline]
			fn is_zero(&self) -> bool {
				*self == 0.0
			}
		}
	};
}

impl_float!(f32, F32, convert::write_f32);
impl_float!(f64, F64, convert::write_f64);

impl Encode for bool {
	const KIND: Kind = Kind::Bool;

	fn compile(cx: &mut Context, mode: Mode) -> Result<Writer<Self>, CompileError> {
		cx.require_plain(mode, Self::KIND)?;
		Ok(Box::new(convert::write_bool))
	}

	#[inline]
	fn is_zero(&self) -> bool {
		!*self
	}
}

macro_rules! impl_str {
	($ty:ty) => {
		impl Encode for $ty {
			const KIND: Kind = Kind::Str;

			#[inline]
			fn compile(_cx: &mut Context, mode: Mode) -> Result<Writer<Self>, CompileError> {
				Ok(compile_str::<Self>(mode))
			}

			#[inline]
			fn is_zero(&self) -> bool {
				self.is_empty()
			}
		}
	};
}

impl_str!(String);
impl_str!(&'static str);
impl_str!(Box<str>);
impl_str!(Arc<str>);
impl_str!(Cow<'static, str>);

/// Compile writer for a string type.
fn compile_str<S: AsRef<str> + 'static>(mode: Mode) -> Writer<S> {
	match (mode.style(), mode.is_quoted()) {
		(Style::Plain, true) => Box::new(|value: &S, buf: &mut Buffer| {
			convert::write_quoted(value.as_ref(), buf)
		}),
		(Style::Plain, false) => Box::new(|value: &S, buf: &mut Buffer| {
			buf.write_string(value.as_ref())
		}),
		(Style::Escape, true) => Box::new(|value: &S, buf: &mut Buffer| {
			convert::write_quoted_escaped(value.as_ref(), buf)
		}),
		(Style::Escape, false) => Box::new(|value: &S, buf: &mut Buffer| {
			escape::escape_str(value.as_ref(), buf)
		}),
		(Style::Raw, _) => Box::new(|value: &S, buf: &mut Buffer| {
			convert::write_raw(value.as_ref().as_bytes(), buf)
		}),
	}
}
