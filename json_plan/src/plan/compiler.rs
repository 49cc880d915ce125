use std::mem;

use log::trace;

use super::{Instruction, OmitGroup, OnEmpty, Step};
use crate::{
	escape, Buffer, CompileError, Context, Directives, FieldDescriptor, Mode, Predicate, Shape,
	Style, Writer,
};

/// Compile instructions for shape `S`.
///
/// Output is `{`, then `"key":value,` for each field, then `}`, with the last field's trailing `,`
/// removed. Adjacent static bytes are merged into a single `Static` instruction.
///
/// `omitempty` fields become omit groups. The group's body holds the field's key, value and
/// trailing `,`, so all are skipped if field is zero. If the last field is an omit group, its body
/// has no trailing `,`, and if it's skipped, the previous field's `,` is trimmed off the buffer.
pub(super) fn compile_struct<S: Shape>(
	cx: &mut Context,
) -> Result<Vec<Instruction<S>>, CompileError> {
	let mut emitter = Emitter::new();
	emitter.push_static(b"{");

	let mut last_omitted = false;
	for field in S::fields() {
		let directives = match field.tag.and_then(Directives::parse) {
			Some(directives) => directives,
			None => {
				trace!("`{}.{}`: no key, skipping", S::NAME, field.name);
				continue;
			}
		};

		cx.enter(S::NAME, field.name);
		let result = compile_field(cx, &mut emitter, field, &directives);
		cx.exit();
		last_omitted = result?;
	}

	Ok(emitter.finish(last_omitted))
}

/// Compile one field. Returns `true` if field is in an omit group.
fn compile_field<S: 'static>(
	cx: &mut Context,
	emitter: &mut Emitter<S>,
	field: FieldDescriptor<S>,
	directives: &Directives,
) -> Result<bool, CompileError> {
	// Aggregates are always written, unless they're optional and absent
	let omit = directives.omitempty && (field.optional || !field.kind.is_aggregate());
	trace!(
		"`{}`: key `{}`, kind {}{}",
		field.name,
		directives.key,
		field.kind,
		if omit { ", omitempty" } else { "" }
	);

	let FieldDescriptor {
		name,
		kind,
		optional,
		is_zero,
		compile,
		stringer,
		encoder,
		..
	} = field;

	if omit {
		emitter.open_group(name, is_zero);
	}

	emitter.push_static(b"\"");
	let mut key = Buffer::new();
	escape::escape_str(directives.key, &mut key);
	emitter.push_static(key.as_bytes());
	emitter.push_static(b"\":");

	let stringer = stringer.filter(|_| directives.stringer);
	if let Some(write) = stringer {
		// Optional stringers write their own quotes, as they may write `null`
		emitter.push_value(name, write, !optional, false);
	} else if directives.encoder {
		match encoder {
			Some(write) => emitter.push_value(name, write, false, true),
			None => return Err(cx.missing_encoder()),
		}
	} else {
		let compile = match compile {
			Some(compile) if kind.is_supported() => compile,
			_ => return Err(cx.unsupported(kind)),
		};

		let style = if directives.raw {
			Style::Raw
		} else if directives.escape {
			Style::Escape
		} else {
			Style::Plain
		};

		// Quotes of non-optional strings and timestamps are written as static bytes
		let inline_quotes = kind.is_quoted() && !optional && style != Style::Raw;
		let mut mode = Mode::new(style);
		if inline_quotes {
			mode = mode.unquoted();
		}

		let write = compile(cx, mode)?;
		emitter.push_value(name, write, inline_quotes, kind.is_dispatched());
	}

	emitter.push_static(b",");
	if omit {
		emitter.close_group();
	}

	Ok(omit)
}

/// Builds instruction list, merging adjacent static bytes.
struct Emitter<S: 'static> {
	pending: Vec<u8>,
	instructions: Vec<Instruction<S>>,
	group: Option<GroupBuilder<S>>,
}

struct GroupBuilder<S: 'static> {
	field: &'static str,
	is_zero: Predicate<S>,
	prefix: Box<[u8]>,
	body: Vec<Instruction<S>>,
}

impl<S: 'static> Emitter<S> {
	fn new() -> Self {
		Self {
			pending: Vec::new(),
			instructions: Vec::new(),
			group: None,
		}
	}

	fn push_static(&mut self, bytes: &[u8]) {
		self.pending.extend_from_slice(bytes);
	}

	fn push_value(&mut self, field: &'static str, write: Writer<S>, quoted: bool, dispatch: bool) {
		if quoted {
			self.push_static(b"\"");
		}

		self.flush();
		let step = Step { field, write };
		self.push(if dispatch {
			Instruction::Dispatch(step)
		} else {
			Instruction::Copy(step)
		});

		if quoted {
			self.push_static(b"\"");
		}
	}

	/// Start an omit group. Pending static bytes become the group's prefix,
	/// except the opening `{`, which always leads the plan as a `Static`.
	fn open_group(&mut self, field: &'static str, is_zero: Predicate<S>) {
		if self.instructions.is_empty() {
			self.flush();
		}
		let prefix = mem::take(&mut self.pending).into_boxed_slice();
		self.group = Some(GroupBuilder {
			field,
			is_zero,
			prefix,
			body: Vec::new(),
		});
	}

	fn close_group(&mut self) {
		self.flush();
		if let Some(group) = self.group.take() {
			self.instructions.push(Instruction::Omit(OmitGroup {
				field: group.field,
				is_zero: group.is_zero,
				prefix: group.prefix,
				body: group.body.into_boxed_slice(),
				on_empty: OnEmpty::Skip,
			}));
		}
	}

	fn flush(&mut self) {
		if !self.pending.is_empty() {
			let bytes = mem::take(&mut self.pending).into_boxed_slice();
			self.push(Instruction::Static(bytes));
		}
	}

	fn push(&mut self, instruction: Instruction<S>) {
		match &mut self.group {
			Some(group) => group.body.push(instruction),
			None => self.instructions.push(instruction),
		}
	}

	fn finish(mut self, last_omitted: bool) -> Vec<Instruction<S>> {
		if last_omitted {
			// Trailing `,` is inside last group's body
			if let Some(Instruction::Omit(group)) = self.instructions.last_mut() {
				let mut body = mem::take(&mut group.body).into_vec();
				if let Some(Instruction::Static(bytes)) = body.pop() {
					let bytes = bytes.strip_suffix(b",").unwrap_or(&bytes[..]);
					if !bytes.is_empty() {
						body.push(Instruction::Static(bytes.into()));
					}
				}
				group.body = body.into_boxed_slice();
				group.on_empty = OnEmpty::TrimSeparator;
			}
		} else if self.pending.last() == Some(&b',') {
			self.pending.pop();
		}

		self.push_static(b"}");
		self.flush();
		self.instructions
	}
}
