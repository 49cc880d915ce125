use std::sync::Arc;

use crate::{plan::compile_sequence, Buffer, CompileError, Context, Encode, Kind, Mode, Writer};

impl<T: Encode> Encode for Box<T> {
	const KIND: Kind = T::KIND;
	const OPTIONAL: bool = T::OPTIONAL;

	fn compile(cx: &mut Context, mode: Mode) -> Result<Writer<Self>, CompileError> {
		let write = T::compile(cx, mode)?;
		// Write boxed value
		Ok(Box::new(move |value: &Self, buf: &mut Buffer| write(&**value, buf)))
	}

	#[inline]
	fn is_zero(&self) -> bool {
		(**self).is_zero()
	}
}

impl<T: Encode> Encode for Arc<T> {
	const KIND: Kind = T::KIND;
	const OPTIONAL: bool = T::OPTIONAL;

	fn compile(cx: &mut Context, mode: Mode) -> Result<Writer<Self>, CompileError> {
		let write = T::compile(cx, mode)?;
		Ok(Box::new(move |value: &Self, buf: &mut Buffer| write(&**value, buf)))
	}

	#[inline]
	fn is_zero(&self) -> bool {
		(**self).is_zero()
	}
}

impl<T: Encode> Encode for Vec<T> {
	const KIND: Kind = Kind::Seq;

	fn compile(cx: &mut Context, mode: Mode) -> Result<Writer<Self>, CompileError> {
		compile_sequence(cx, mode, |items: &Self| items.as_slice())
	}

	#[inline]
	fn is_zero(&self) -> bool {
		self.is_empty()
	}
}

impl<T: Encode> Encode for Box<[T]> {
	const KIND: Kind = Kind::Seq;

	fn compile(cx: &mut Context, mode: Mode) -> Result<Writer<Self>, CompileError> {
		compile_sequence(cx, mode, |items: &Self| &**items)
	}

	#[inline]
	fn is_zero(&self) -> bool {
		self.is_empty()
	}
}

impl<T: Encode, const N: usize> Encode for [T; N] {
	const KIND: Kind = Kind::Seq;

	fn compile(cx: &mut Context, mode: Mode) -> Result<Writer<Self>, CompileError> {
		compile_sequence(cx, mode, |items: &Self| items.as_slice())
	}

	#[inline]
	fn is_zero(&self) -> bool {
		N == 0
	}
}
