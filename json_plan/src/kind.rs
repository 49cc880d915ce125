use std::fmt;

/// Category of a field's value, as seen by the plan compiler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
	Bool,
	I8,
	I16,
	I32,
	I64,
	I128,
	Isize,
	U8,
	U16,
	U32,
	U64,
	U128,
	Usize,
	F32,
	F64,
	Str,
	/// Timestamp
	Time,
	/// Nested shape
	Struct,
	/// Sequence of values
	Seq,
	/// Value which writes itself (`encoder` / `stringer` capabilities)
	Custom,
	/// Maps are not supported
	Map,
	/// Dynamically-typed values are not supported
	Dynamic,
	/// Function values are not supported
	Func,
	/// Channels are not supported
	Channel,
}

impl Kind {
	/// Whether plans can be compiled for values of this kind.
	pub const fn is_supported(self) -> bool {
		!matches!(self, Kind::Map | Kind::Dynamic | Kind::Func | Kind::Channel)
	}

	/// Aggregates are never omitted by `omitempty`, unless optional and absent.
	pub const fn is_aggregate(self) -> bool {
		matches!(self, Kind::Struct | Kind::Time | Kind::Custom)
	}

	/// Values of these kinds are surrounded by quotes.
	pub const fn is_quoted(self) -> bool {
		matches!(self, Kind::Str | Kind::Time)
	}

	/// Values of these kinds are written by a sub-plan or custom writer,
	/// rather than a scalar converter.
	pub const fn is_dispatched(self) -> bool {
		matches!(self, Kind::Struct | Kind::Seq | Kind::Custom)
	}

	pub const fn name(self) -> &'static str {
		match self {
			Kind::Bool => "bool",
			Kind::I8 => "i8",
			Kind::I16 => "i16",
			Kind::I32 => "i32",
			Kind::I64 => "i64",
			Kind::I128 => "i128",
			Kind::Isize => "isize",
			Kind::U8 => "u8",
			Kind::U16 => "u16",
			Kind::U32 => "u32",
			Kind::U64 => "u64",
			Kind::U128 => "u128",
			Kind::Usize => "usize",
			Kind::F32 => "f32",
			Kind::F64 => "f64",
			Kind::Str => "string",
			Kind::Time => "timestamp",
			Kind::Struct => "struct",
			Kind::Seq => "sequence",
			Kind::Custom => "custom",
			Kind::Map => "map",
			Kind::Dynamic => "dynamic",
			Kind::Func => "function",
			Kind::Channel => "channel",
		}
	}
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}
