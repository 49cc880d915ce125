use std::{fmt, sync::Arc};

use crate::{Buffer, CompileError, Predicate, Shape, Writer};

mod compiler;
mod context;
mod sequence;

pub use context::Context;
pub(crate) use sequence::compile_field as compile_sequence;
pub use sequence::SequencePlan;

/// Compiled serialization plan for shape `T`.
///
/// Immutable once compiled. Cheap to clone, and can be shared between threads and used
/// concurrently, each caller writing into its own [`Buffer`].
///
/// # Recursive shapes
///
/// A shape which contains itself (directly, or via other shapes) refers back to its own plan
/// through a `Weak` pointer. Each recursive occurrence upgrades that pointer while it's written,
/// which is an atomic update of the plan's reference count. Writing deeply recursive values
/// from many threads at once on the same plan therefore contends on that count.
/// Non-recursive shapes never touch it during `marshal`.
pub struct Plan<T: 'static> {
	program: Arc<Program<T>>,
}

impl<T: Shape> Plan<T> {
	/// Compile plan for `T`, and for every shape nested within it.
	pub fn compile() -> Result<Self, CompileError> {
		Context::new().compile_shape::<T>()
	}

	/// Compile plan for `T`.
	///
	/// # Panics
	///
	/// Panics if `T` contains a field which cannot be serialized.
	/// Use [`Plan::compile`] to handle the error instead.
	pub fn new() -> Self {
		match Self::compile() {
			Ok(plan) => plan,
			Err(err) => panic!("Cannot compile plan for `{}`: {}", T::NAME, err),
		}
	}
}

impl<T: 'static> Plan<T> {
	/// Serialize `value`, appending output to `buf`.
	#[inline]
	pub fn marshal(&self, value: &T, buf: &mut Buffer) {
		self.program.run(value, buf);
	}

	/// Serialize `value` into a new `Vec<u8>`.
	pub fn to_vec(&self, value: &T) -> Vec<u8> {
		let mut buf = Buffer::new();
		self.marshal(value, &mut buf);
		buf.into_vec()
	}

	/// Serialize `value` into a new `String`.
	///
	/// Invalid UTF-8 (only possible from a `raw` field holding non-UTF-8 bytes) is replaced with
	/// `U+FFFD`.
	pub fn to_string(&self, value: &T) -> String {
		match String::from_utf8(self.to_vec(value)) {
			Ok(json) => json,
			Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
		}
	}

	/// Name of shape this plan serializes.
	pub fn shape(&self) -> &'static str {
		self.program.shape
	}

	/// Number of top-level instructions.
	pub fn len(&self) -> usize {
		self.program.instructions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.program.instructions.is_empty()
	}

	pub(crate) fn from_program(program: Arc<Program<T>>) -> Self {
		Self { program }
	}

	#[cfg(test)]
	pub(crate) fn instructions(&self) -> &[Instruction<T>] {
		&self.program.instructions
	}
}

impl<T: Shape> Default for Plan<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: 'static> Clone for Plan<T> {
	fn clone(&self) -> Self {
		Self {
			program: Arc::clone(&self.program),
		}
	}
}

impl<T: 'static> fmt::Debug for Plan<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Plan")
			.field("shape", &self.program.shape)
			.field("instructions", &self.program.instructions)
			.finish()
	}
}

/// Instructions for a shape.
///
/// Separate from `Plan` so recursive shapes can refer to their own program weakly
/// while it is still being compiled.
pub(crate) struct Program<T: 'static> {
	shape: &'static str,
	instructions: Box<[Instruction<T>]>,
}

impl<T: 'static> Program<T> {
	pub(crate) fn new(shape: &'static str, instructions: Vec<Instruction<T>>) -> Self {
		Self {
			shape,
			instructions: instructions.into_boxed_slice(),
		}
	}

	#[inline]
	pub(crate) fn run(&self, value: &T, buf: &mut Buffer) {
		execute(&self.instructions, value, buf);
	}
}

fn execute<T: 'static>(instructions: &[Instruction<T>], value: &T, buf: &mut Buffer) {
	for instruction in instructions {
		match instruction {
			Instruction::Static(bytes) => buf.write(bytes),
			Instruction::Copy(step) | Instruction::Dispatch(step) => (step.write)(value, buf),
			Instruction::Omit(group) => {
				buf.write(&group.prefix);
				if (group.is_zero)(value) {
					if group.on_empty == OnEmpty::TrimSeparator {
						buf.trim_separator();
					}
				} else {
					execute(&group.body, value, buf);
				}
			}
		}
	}
}

pub(crate) enum Instruction<T: 'static> {
	/// Write fixed bytes
	Static(Box<[u8]>),
	/// Convert a scalar field and write it
	Copy(Step<T>),
	/// Write field only if it's not zero
	Omit(OmitGroup<T>),
	/// Hand field to a sub-plan or custom writer
	Dispatch(Step<T>),
}

pub(crate) struct Step<T: 'static> {
	pub field: &'static str,
	pub write: Writer<T>,
}

/// Instructions for an `omitempty` field.
///
/// `prefix` is always written. `body` (key, value and trailing separator) is only written if
/// field is not zero.
pub(crate) struct OmitGroup<T: 'static> {
	pub field: &'static str,
	pub is_zero: Predicate<T>,
	pub prefix: Box<[u8]>,
	pub body: Box<[Instruction<T>]>,
	pub on_empty: OnEmpty,
}

/// What to do when an omit group's field is zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OnEmpty {
	Skip,
	/// Field is last in shape, so the previous field's `,` must go
	TrimSeparator,
}

impl<T: 'static> fmt::Debug for Instruction<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Instruction::Static(bytes) => f
				.debug_tuple("Static")
				.field(&String::from_utf8_lossy(bytes))
				.finish(),
			Instruction::Copy(step) => f.debug_tuple("Copy").field(&step.field).finish(),
			Instruction::Dispatch(step) => f.debug_tuple("Dispatch").field(&step.field).finish(),
			Instruction::Omit(group) => f
				.debug_struct("Omit")
				.field("field", &group.field)
				.field("prefix", &String::from_utf8_lossy(&group.prefix))
				.field("body", &group.body)
				.field("on_empty", &group.on_empty)
				.finish(),
		}
	}
}
