use std::{
	any::{Any, TypeId},
	collections::HashMap,
	sync::{Arc, Weak},
};

use log::{debug, trace};

use super::{compiler, Plan, Program};
use crate::{convert, Buffer, CompileError, Kind, Mode, Shape, Style, Writer};

/// State of a plan compilation.
///
/// Remembers every shape compiled so far, so each shape is compiled only once however many
/// times it appears, and recursive shapes refer back to their own in-progress plan.
/// Also tracks which field is being compiled, for error messages.
pub struct Context {
	plans: HashMap<TypeId, Entry>,
	location: Vec<(&'static str, &'static str)>,
}

enum Entry {
	/// Holds `Weak<Program<S>>`
	Pending(Box<dyn Any>),
	/// Holds `Plan<S>`
	Ready(Box<dyn Any>),
}

impl Context {
	pub(crate) fn new() -> Self {
		Self {
			plans: HashMap::new(),
			location: Vec::new(),
		}
	}

	/// Compile writer for a nested shape.
	///
	/// If `S` is already being compiled further up (i.e. `S` is recursive), writer refers to that
	/// in-progress plan instead of compiling `S` again.
	pub fn shape<S: Shape>(&mut self, mode: Mode) -> Result<Writer<S>, CompileError> {
		self.require_plain(mode, Kind::Struct)?;

		if let Some(writer) = self.existing::<S>() {
			return Ok(writer);
		}

		let plan = self.compile_shape::<S>()?;
		Ok(Box::new(move |value: &S, buf: &mut Buffer| plan.marshal(value, buf)))
	}

	/// Get writer for shape `S` if it's already compiled, or being compiled.
	fn existing<S: Shape>(&self) -> Option<Writer<S>> {
		let writer: Writer<S> = match self.plans.get(&TypeId::of::<S>())? {
			Entry::Ready(plan) => {
				let plan = plan.downcast_ref::<Plan<S>>()?.clone();
				Box::new(move |value: &S, buf: &mut Buffer| plan.marshal(value, buf))
			}
			Entry::Pending(program) => {
				trace!("Reusing in-progress plan for recursive shape `{}`", S::NAME);
				let program = program.downcast_ref::<Weak<Program<S>>>()?.clone();
				// Upgrade touches the plan's shared reference count, once per recursive value
				Box::new(move |value: &S, buf: &mut Buffer| match program.upgrade() {
					Some(program) => program.run(value, buf),
					// Plan was dropped. Can't happen while an outer plan holds it.
					None => convert::write_null(buf),
				})
			}
		};
		Some(writer)
	}

	/// Compile plan for shape `S`.
	pub(crate) fn compile_shape<S: Shape>(&mut self) -> Result<Plan<S>, CompileError> {
		let id = TypeId::of::<S>();
		let mut result = Ok(());
		let program = Arc::new_cyclic(|weak: &Weak<Program<S>>| {
			self.plans.insert(id, Entry::Pending(Box::new(weak.clone())));
			match compiler::compile_struct::<S>(self) {
				Ok(instructions) => Program::new(S::NAME, instructions),
				Err(err) => {
					result = Err(err);
					Program::new(S::NAME, Vec::new())
				}
			}
		});

		if let Err(err) = result {
			self.plans.remove(&id);
			return Err(err);
		}

		let plan = Plan::from_program(program);
		debug!(
			"Compiled plan for `{}`: {} instructions",
			S::NAME,
			plan.len()
		);
		self.plans.insert(id, Entry::Ready(Box::new(plan.clone())));
		Ok(plan)
	}

	/// Error if `mode` requests `escape` or `raw`.
	/// For use in [`Encode`](crate::Encode) impls of types where those make no sense.
	pub fn require_plain(&self, mode: Mode, kind: Kind) -> Result<(), CompileError> {
		match mode.style() {
			Style::Plain => Ok(()),
			style => Err(self.directive_kind(style.directive(), kind)),
		}
	}

	/// Error for a value of unsupported kind at current location.
	pub fn unsupported(&self, kind: Kind) -> CompileError {
		let (shape, field) = self.current();
		CompileError::UnsupportedKind { shape, field, kind }
	}

	/// Error for a directive which cannot apply to `kind`, at current location.
	pub fn directive_kind(&self, directive: &'static str, kind: Kind) -> CompileError {
		let (shape, field) = self.current();
		CompileError::DirectiveKind {
			shape,
			field,
			directive,
			kind,
		}
	}

	pub(crate) fn missing_encoder(&self) -> CompileError {
		let (shape, field) = self.current();
		CompileError::MissingEncoder { shape, field }
	}

	pub(crate) fn enter(&mut self, shape: &'static str, field: &'static str) {
		self.location.push((shape, field));
	}

	pub(crate) fn exit(&mut self) {
		self.location.pop();
	}

	fn current(&self) -> (&'static str, &'static str) {
		self.location.last().copied().unwrap_or(("<root>", "[]"))
	}
}
