use syn::{parse_macro_input, Data, DeriveInput};

mod structs;
use structs::derive_struct;

/// Derive `Shape` and `Encode` for a struct.
///
/// Only fields with a `#[json("...")]` attribute are serialized. The attribute holds the field's
/// tag: the output key, followed by any directives, comma-separated
/// e.g. `#[json("name,omitempty,escape")]`.
///
/// Fields tagged `stringer` or `encoder` need not implement `Encode`.
#[proc_macro_derive(Shape, attributes(json))]
pub fn shape(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	shape_impl(input).into()
}

fn shape_impl(input: DeriveInput) -> proc_macro2::TokenStream {
	match input.data {
		Data::Struct(data) => derive_struct(data, input.ident, input.generics),
		Data::Enum(_) => panic!("Deriving `Shape` on enums not supported"),
		Data::Union(_) => panic!("Deriving `Shape` on unions not supported"),
	}
}
