use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput, Error, Fields, Type};

/// Derive for structs that are read straight out of account data.
///
/// The derive rejects the struct at compile time unless:
/// - it is `#[repr(C, align(8))]`,
/// - no field is (or is an array of) `bool`, since account bytes may hold
///   any value and only `0`/`1` are valid for `bool`,
/// - the struct size equals the sum of its field sizes (no implicit
///   padding) and is a multiple of 8.
///
/// # Example
/// ```rust-ignore
/// #[derive(NoPadding)]
/// #[repr(C, align(8))]
/// struct Record {
///     amount: u64,
///     flags: u32,
///     revoked: u8,
///     _padding: [u8; 3],
/// }
/// ```
#[proc_macro_derive(NoPadding)]
pub fn derive_no_padding(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match impl_no_padding(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn impl_no_padding(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    check_repr(input)?;

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(Error::new(
                input.span(),
                "NoPadding can only be derived for structs",
            ))
        },
    };

    for field in fields.iter() {
        if contains_bool(&field.ty) {
            return Err(Error::new(
                field.ty.span(),
                "NoPadding structs cannot hold `bool`; store a `u8` and expose a bool accessor",
            ));
        }
    }

    let size_assertions = generate_size_assertions(fields, &input.ident);

    Ok(quote! {
        const _: () = {
            #size_assertions
        };
    })
}

fn check_repr(input: &DeriveInput) -> syn::Result<()> {
    let repr_attrs: Vec<_> = input
        .attrs
        .iter()
        .filter(|attr| attr.path().is_ident("repr"))
        .collect();

    if repr_attrs.is_empty() {
        return Err(Error::new(
            input.span(),
            "NoPadding requires #[repr(C, align(8))] to be specified",
        ));
    }

    let mut has_repr_c = false;
    let mut has_align_8 = false;

    for attr in &repr_attrs {
        let meta = attr.meta.require_list()?;
        for nested in meta.parse_args_with(
            syn::punctuated::Punctuated::<syn::Meta, syn::Token![,]>::parse_terminated,
        )? {
            match nested {
                syn::Meta::Path(path) if path.is_ident("C") => has_repr_c = true,
                syn::Meta::List(list) if list.path.is_ident("align") => {
                    let lit = list.parse_args::<syn::LitInt>()?;
                    has_align_8 = lit.base10_parse::<usize>()? == 8;
                },
                _ => {},
            }
        }
    }

    if !has_repr_c || !has_align_8 {
        return Err(Error::new(
            repr_attrs[0].span(),
            "NoPadding requires #[repr(C, align(8))] to be specified",
        ));
    }
    Ok(())
}

fn contains_bool(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path.qself.is_none() && path.path.is_ident("bool"),
        Type::Array(array) => contains_bool(&array.elem),
        Type::Group(group) => contains_bool(&group.elem),
        Type::Paren(paren) => contains_bool(&paren.elem),
        Type::Tuple(tuple) => tuple.elems.iter().any(contains_bool),
        _ => false,
    }
}

fn generate_size_assertions(fields: &Fields, struct_ident: &syn::Ident) -> proc_macro2::TokenStream {
    let field_sizes = fields.iter().map(|field| {
        let ty = &field.ty;
        quote! {
            ::core::mem::size_of::<#ty>()
        }
    });

    quote! {
        const STRUCT_SIZE: usize = ::core::mem::size_of::<#struct_ident>();
        const FIELDS_SIZE: usize = 0 #( + #field_sizes)*;
        assert!(
            STRUCT_SIZE == FIELDS_SIZE,
            concat!(
                "Type has padding - size of struct (",
                ::core::stringify!(#struct_ident),
                ") does not match sum of field sizes"
            )
        );
        assert!(
            STRUCT_SIZE % 8 == 0,
            concat!(
                "Type size is not a multiple of 8 (",
                ::core::stringify!(#struct_ident),
                ")"
            )
        );
    }
}
