use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote, quote_spanned};
use syn::{
	parse_quote, spanned::Spanned, DataStruct, Field, Fields, FieldsNamed, FieldsUnnamed,
	GenericArgument, Generics, Ident, Index, LitStr, PathArguments, Type, TypePath,
};

/// A field with a `#[json]` attribute.
struct TaggedField {
	member: TokenStream,
	name: String,
	tag: String,
	ty: Type,
	span: Span,
}

impl TaggedField {
	fn has_directive(&self, directive: &str) -> bool {
		self.tag.split(',').skip(1).any(|part| part == directive)
	}

	/// Whether field is described via its `Encode` impl alone.
	fn is_plain(&self) -> bool {
		!self.has_directive("stringer") && !self.has_directive("encoder")
	}
}

pub fn derive_struct(data: DataStruct, ident: Ident, generics: Generics) -> TokenStream {
	let fields: Vec<TaggedField> = match data.fields {
		Fields::Named(fields) => get_named_fields(fields),
		Fields::Unnamed(fields) => get_unnamed_fields(fields),
		Fields::Unit => vec![],
	};

	let generics_for_impl = get_generics(&generics, &fields);
	let (impl_generics, type_generics, where_clause) = generics_for_impl.split_for_impl();

	let name = ident.to_string();
	let descriptors = fields.iter().map(get_descriptor);

	quote! {
		#[automatically_derived]
		impl #impl_generics ::json_plan::Shape for #ident #type_generics #where_clause {
			const NAME: &'static str = #name;

			fn fields() -> ::std::vec::Vec<::json_plan::FieldDescriptor<Self>> {
				::std::vec![#(#descriptors),*]
			}
		}

		#[automatically_derived]
		impl #impl_generics ::json_plan::Encode for #ident #type_generics #where_clause {
			const KIND: ::json_plan::Kind = ::json_plan::Kind::Struct;

			fn compile(
				cx: &mut ::json_plan::Context,
				mode: ::json_plan::Mode,
			) -> ::std::result::Result<::json_plan::Writer<Self>, ::json_plan::CompileError> {
				cx.shape::<Self>(mode)
			}

			#[inline]
			fn is_zero(&self) -> bool {
				false
			}
		}
	}
}

/// Amend generics to add `'static` bound to type params, and `Encode` bound to types of fields
/// which need it.
fn get_generics(generics: &Generics, fields: &[TaggedField]) -> Generics {
	let mut generics_for_impl = generics.clone();
	if generics.type_params().next().is_none() {
		return generics_for_impl;
	}

	for param in generics_for_impl.type_params_mut() {
		param.bounds.push(parse_quote!('static));
	}

	let where_clause = generics_for_impl.make_where_clause();
	for field in fields.iter().filter(|field| field.is_plain()) {
		let ty = &field.ty;
		where_clause
			.predicates
			.push(parse_quote!(#ty: ::json_plan::Encode));
	}

	generics_for_impl
}

fn get_named_fields(fields: FieldsNamed) -> Vec<TaggedField> {
	fields
		.named
		.into_iter()
		.filter_map(|field| {
			let field_name = field.ident.clone().expect("Missing field name");
			let name = field_name.to_string();
			get_tagged_field(quote! {#field_name}, name, field)
		})
		.collect()
}

fn get_unnamed_fields(fields: FieldsUnnamed) -> Vec<TaggedField> {
	fields
		.unnamed
		.into_iter()
		.enumerate()
		.filter_map(|(index, field)| {
			let name = index.to_string();
			let index = Index::from(index);
			get_tagged_field(quote! {#index}, name, field)
		})
		.collect()
}

fn get_tagged_field(member: TokenStream, name: String, field: Field) -> Option<TaggedField> {
	let tag = get_tag(&field)?;
	Some(TaggedField {
		member,
		name,
		tag,
		span: field.span(),
		ty: field.ty,
	})
}

fn get_tag(field: &Field) -> Option<String> {
	let attrs = field
		.attrs
		.iter()
		.filter(|attr| attr.path.is_ident("json"))
		.collect::<Vec<_>>();

	if attrs.is_empty() {
		return None;
	}

	if attrs.len() != 1 {
		panic!("Cannot have more than 1 `#[json]` attribute on a field");
	}

	match attrs[0].parse_args::<LitStr>() {
		Ok(tag) => Some(tag.value()),
		Err(_) => panic!("`#[json]` needs a tag string e.g. `#[json(\"key,omitempty\")]`"),
	}
}

fn get_descriptor(field: &TaggedField) -> TokenStream {
	let TaggedField {
		member,
		name,
		tag,
		ty,
		span,
	} = field;

	if field.is_plain() {
		return quote_spanned! {*span=>
			::json_plan::FieldDescriptor::<Self>::new::<#ty>(
				#name,
				::std::option::Option::Some(#tag),
				|value: &Self| &value.#member,
			)
		};
	}

	// Capabilities of `Option<T>` fields are those of `T`
	let (probed, suffix) = match get_option_inner(ty) {
		Some(inner) => (inner, "_optional"),
		None => (ty, ""),
	};
	let base = format_ident!("base{}", suffix);

	let stringer_stmt = if field.has_directive("stringer") {
		let stringer = format_ident!("stringer{}", suffix);
		quote! { let field = probe.#stringer(field, get); }
	} else {
		quote! {}
	};

	let encoder_stmt = if field.has_directive("encoder") {
		let encoder = format_ident!("encoder{}", suffix);
		quote! { let field = probe.#encoder(field, get); }
	} else {
		quote! {}
	};

	quote_spanned! {*span=>
		{
			#[allow(unused_imports)]
			use ::json_plan::__private::probe::*;
			let probe = &&::json_plan::__private::Probe::<#probed>::new();
			let get: fn(&Self) -> &#ty = |value: &Self| &value.#member;
			let field = probe.#base(#name, ::std::option::Option::Some(#tag), get);
			#stringer_stmt
			#encoder_stmt
			field
		}
	}
}

/// If type is `Option<T>`, get `T`.
fn get_option_inner(ty: &Type) -> Option<&Type> {
	let path = match ty {
		Type::Path(TypePath { qself: None, path }) => path,
		_ => return None,
	};

	let segment = path.segments.last()?;
	if segment.ident != "Option" {
		return None;
	}

	match &segment.arguments {
		PathArguments::AngleBracketed(args) if args.args.len() == 1 => match args.args.first()? {
			GenericArgument::Type(inner) => Some(inner),
			_ => None,
		},
		_ => None,
	}
}
