use thiserror::Error;

use crate::Kind;

/// Error compiling a plan.
///
/// All variants name the shape and field where compilation failed. Fields of sequences
/// compiled on their own are reported as field `[]`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
	/// Field's type has a kind plans cannot serialize
	#[error("`{shape}.{field}`: {kind} values cannot be serialized")]
	UnsupportedKind {
		shape: &'static str,
		field: &'static str,
		kind: Kind,
	},
	/// Field tagged `encoder` but its type has no encoding capability
	#[error("`{shape}.{field}`: tagged `encoder` but type implements neither `JsonEncode` nor `JsonWrite`")]
	MissingEncoder {
		shape: &'static str,
		field: &'static str,
	},
	/// Directive cannot be applied to field's kind
	#[error("`{shape}.{field}`: `{directive}` cannot be applied to {kind} values")]
	DirectiveKind {
		shape: &'static str,
		field: &'static str,
		directive: &'static str,
		kind: Kind,
	},
}
