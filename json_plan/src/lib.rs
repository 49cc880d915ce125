//! JSON serializer which does all the work of inspecting a type once, up front.
//!
//! Each shape is compiled into a [`Plan`]: an immutable list of instructions (static byte runs,
//! field copies, conditional omission groups and custom dispatches). Serializing a value then
//! just replays the plan against it, with no further type inspection and no allocation beyond
//! growing the output [`Buffer`].
//!
//! ```ignore
//! use json_plan::{Buffer, Plan, Shape};
//!
//! #[derive(Shape)]
//! struct Node {
//! 	#[json("name")]
//! 	name: String,
//! 	#[json("child")]
//! 	child: Option<Box<Node>>,
//! }
//!
//! let plan = Plan::<Node>::new();
//! let mut buf = Buffer::new();
//! plan.marshal(&Node { name: "A".into(), child: None }, &mut buf);
//! assert_eq!(buf.as_bytes(), br#"{"name":"A","child":null}"#);
//! ```

#[cfg(feature = "derive")]
pub use json_plan_derive::Shape;

pub mod buffer;
pub use buffer::{Buffer, BufferPool, PooledBuffer};

pub mod convert;
pub mod escape;

mod descriptor;
pub use descriptor::FieldDescriptor;

mod directive;
pub use directive::Directives;

mod encode;
pub use encode::{Encode, JsonEncode, JsonWrite, Mode, Predicate, Style, Writer};

mod error;
pub use error::CompileError;

mod kind;
pub use kind::Kind;

mod impls;

mod plan;
pub use plan::{Context, Plan, SequencePlan};

#[doc(hidden)]
#[path = "private.rs"]
pub mod __private;

/// Types whose fields can be described to the plan compiler.
///
/// Usually implemented with `#[derive(Shape)]`, which also implements [`Encode`] so the shape
/// can be nested inside other shapes and sequences.
pub trait Shape: Sized + 'static {
	/// Name of the shape, used in log and error messages.
	const NAME: &'static str;

	/// Descriptors for the shape's fields, in declaration order.
	fn fields() -> Vec<FieldDescriptor<Self>>;
}

/// Compile a plan for `T` and serialize `value` with it.
///
/// Only for one-off use. Compiling is the expensive part, so hold on to a [`Plan`] when
/// serializing the same shape repeatedly.
pub fn to_vec<T: Shape>(value: &T) -> Result<Vec<u8>, CompileError> {
	let plan = Plan::<T>::compile()?;
	Ok(plan.to_vec(value))
}
