use std::{
	any::Any,
	collections::{BTreeMap, HashMap},
	sync::mpsc,
};

use crate::{convert, Buffer, CompileError, Context, Encode, Kind, Mode, Writer};

impl<T: Encode> Encode for Option<T> {
	const KIND: Kind = T::KIND;
	const OPTIONAL: bool = true;

	fn compile(cx: &mut Context, mode: Mode) -> Result<Writer<Self>, CompileError> {
		// Absent values are `null`, so value can't rely on quotes written around it
		let write = T::compile(cx, mode.quoted())?;
		Ok(Box::new(move |value: &Self, buf: &mut Buffer| match value {
			Some(inner) => write(inner, buf),
			None => convert::write_null(buf),
		}))
	}

	#[inline]
	fn is_zero(&self) -> bool {
		self.is_none()
	}
}

#[cfg(feature = "time")]
impl Encode for time::OffsetDateTime {
	const KIND: Kind = Kind::Time;

	fn compile(cx: &mut Context, mode: Mode) -> Result<Writer<Self>, CompileError> {
		cx.require_plain(mode, Self::KIND)?;
		let writer: Writer<Self> = if mode.is_quoted() {
			Box::new(|value: &Self, buf: &mut Buffer| {
				buf.write_byte(b'"');
				convert::write_time(value, buf);
				buf.write_byte(b'"');
			})
		} else {
			Box::new(convert::write_time)
		};
		Ok(writer)
	}

	/// Timestamps are never empty
	#[inline]
	fn is_zero(&self) -> bool {
		false
	}
}

macro_rules! impl_unsupported {
	($kind:ident, [$($generics:tt)*], $ty:ty, $is_zero:expr) => {
		impl<$($generics)*> Encode for $ty {
			const KIND: Kind = Kind::$kind;

			fn compile(cx: &mut Context, _mode: Mode) -> Result<Writer<Self>, CompileError> {
				Err(cx.unsupported(Self::KIND))
			}

			#[inline]
			fn is_zero(&self) -> bool {
				let is_zero: fn(&Self) -> bool = $is_zero;
				is_zero(self)
			}
		}
	};
}

impl_unsupported!(Map, [K: 'static, V: 'static, H: 'static], HashMap<K, V, H>, |map| map.is_empty());
impl_unsupported!(Map, [K: 'static, V: 'static], BTreeMap<K, V>, |map| map.is_empty());

impl_unsupported!(Dynamic, [], Box<dyn Any>, |_| false);
impl_unsupported!(Dynamic, [], Box<dyn Any + Send>, |_| false);
impl_unsupported!(Dynamic, [], Box<dyn Any + Send + Sync>, |_| false);

impl_unsupported!(Func, [], fn(), |_| false);
impl_unsupported!(Func, [], Box<dyn Fn() + Send + Sync>, |_| false);

impl_unsupported!(Channel, [T: 'static], mpsc::Sender<T>, |_| false);
impl_unsupported!(Channel, [T: 'static], mpsc::SyncSender<T>, |_| false);
impl_unsupported!(Channel, [T: 'static], mpsc::Receiver<T>, |_| false);
