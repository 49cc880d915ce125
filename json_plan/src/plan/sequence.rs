use std::{any, fmt, sync::Arc};

use log::debug;

use super::Context;
use crate::{convert, Buffer, CompileError, Encode, Kind, Mode, Style, Writer};

/// Compiled plan for serializing a sequence of `E`s as a JSON array.
///
/// Element writer is compiled once, and reused for every element.
pub struct SequencePlan<E: 'static> {
	element: Arc<Writer<E>>,
}

impl<E: Encode> SequencePlan<E> {
	/// Compile plan for sequence.
	pub fn compile() -> Result<Self, CompileError> {
		Self::build(&mut Context::new(), Style::Plain)
	}

	/// Compile plan for sequence with string content escaped.
	pub fn compile_escaped() -> Result<Self, CompileError> {
		Self::build(&mut Context::new(), Style::Escape)
	}

	pub(crate) fn build(cx: &mut Context, style: Style) -> Result<Self, CompileError> {
		let element = E::compile(cx, Mode::new(style))?;
		debug!("Compiled sequence plan for `{}`", any::type_name::<E>());
		Ok(Self {
			element: Arc::new(element),
		})
	}
}

impl<E: 'static> SequencePlan<E> {
	/// Serialize `items` as a JSON array, appending output to `buf`.
	///
	/// Empty sequence is written as `[]`.
	pub fn marshal(&self, items: &[E], buf: &mut Buffer) {
		buf.write_byte(b'[');
		let mut items = items.iter();
		if let Some(first) = items.next() {
			(self.element)(first, buf);
			for item in items {
				buf.write_byte(b',');
				(self.element)(item, buf);
			}
		}
		buf.write_byte(b']');
	}

	/// Serialize `items` into a new `Vec<u8>`.
	pub fn to_vec(&self, items: &[E]) -> Vec<u8> {
		let mut buf = Buffer::new();
		self.marshal(items, &mut buf);
		buf.into_vec()
	}
}

impl<E: 'static> Clone for SequencePlan<E> {
	fn clone(&self) -> Self {
		Self {
			element: Arc::clone(&self.element),
		}
	}
}

impl<E: 'static> fmt::Debug for SequencePlan<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("SequencePlan")
			.field(&any::type_name::<E>())
			.finish()
	}
}

/// Compile writer for a sequence-typed field.
///
/// `raw` is only valid for byte sequences, which are written verbatim.
pub(crate) fn compile_field<E: Encode, S: 'static>(
	cx: &mut Context,
	mode: Mode,
	as_slice: fn(&S) -> &[E],
) -> Result<Writer<S>, CompileError> {
	let writer: Writer<S> = match mode.style() {
		Style::Raw => match E::BYTES {
			Some(bytes) => Box::new(move |value: &S, buf: &mut Buffer| {
				convert::write_raw(bytes(as_slice(value)), buf)
			}),
			None => return Err(cx.directive_kind(Style::Raw.directive(), Kind::Seq)),
		},
		style => {
			let plan = SequencePlan::<E>::build(cx, style)?;
			Box::new(move |value: &S, buf: &mut Buffer| plan.marshal(as_slice(value), buf))
		}
	};
	Ok(writer)
}
