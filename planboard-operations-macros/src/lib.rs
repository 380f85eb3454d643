//! Procedural macros for planboard operations
//!
//! `#[operation]` implements `planboard_operations::Operation` for a command
//! struct, reading the parameter list straight off the struct's fields.
//! Aliases come from `#[serde(alias = "...")]`, which the input also
//! deserializes through, or from `#[param(alias = "...")]` for names only the
//! forgiving parser maps. `#[param]` attributes are consumed and removed from
//! the emitted struct.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input,
    punctuated::Punctuated,
    Attribute, DeriveInput, Expr, Field, Fields, GenericArgument, Lit, Meta, MetaNameValue,
    PathArguments, Token, Type,
};

/// Attribute macro for defining an operation
///
/// ```ignore
/// #[operation(verb = "move", noun = "card", description = "Move a card to another board")]
/// #[derive(Debug, Deserialize, Serialize)]
/// pub struct MoveCard {
///     /// The card to move
///     #[param(alias = "card_id")]
///     pub id: CardId,
///     /// Destination board
///     pub board: BoardId,
///     /// Index in the destination board's card list
///     pub position: Option<usize>,
/// }
/// ```
#[proc_macro_attribute]
pub fn operation(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as OperationArgs);
    let mut input = parse_macro_input!(item as DeriveInput);

    let fields = match &mut input.data {
        syn::Data::Struct(data) => match &mut data.fields {
            Fields::Named(named) => named.named.iter_mut().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(unnamed) => {
                return syn::Error::new_spanned(unnamed, "operations need named fields")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(&input.ident, "operations must be structs")
                .to_compile_error()
                .into()
        }
    };

    let mut metas = Vec::with_capacity(fields.len());
    for field in fields {
        metas.push(param_meta(field));
        field.attrs.retain(|a| !a.path().is_ident("param"));
    }
    let count = metas.len();

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let OperationArgs {
        verb,
        noun,
        description,
    } = args;

    let expanded = quote! {
        #input

        impl #impl_generics planboard_operations::Operation for #name #ty_generics #where_clause {
            fn verb(&self) -> &'static str {
                #verb
            }

            fn noun(&self) -> &'static str {
                #noun
            }

            fn description(&self) -> &'static str {
                #description
            }

            fn parameters(&self) -> &'static [planboard_operations::ParamMeta] {
                static PARAMS: [planboard_operations::ParamMeta; #count] = [#(#metas),*];
                &PARAMS
            }
        }
    };

    expanded.into()
}

struct OperationArgs {
    verb: String,
    noun: String,
    description: String,
}

impl Parse for OperationArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let pairs = Punctuated::<MetaNameValue, Token![,]>::parse_terminated(input)?;

        let mut verb = None;
        let mut noun = None;
        let mut description = None;

        for pair in pairs {
            let value = string_literal(&pair.value)
                .ok_or_else(|| syn::Error::new_spanned(&pair.value, "expected string literal"))?;
            let key = pair
                .path
                .get_ident()
                .map(|i| i.to_string())
                .unwrap_or_default();
            let slot = match key.as_str() {
                "verb" => &mut verb,
                "noun" => &mut noun,
                "description" => &mut description,
                _ => {
                    return Err(syn::Error::new_spanned(
                        &pair.path,
                        format!("unknown operation attribute: {key}"),
                    ))
                }
            };
            *slot = Some(value);
        }

        Ok(Self {
            verb: verb.ok_or_else(|| input.error("missing `verb`"))?,
            noun: noun.ok_or_else(|| input.error("missing `noun`"))?,
            description: description.ok_or_else(|| input.error("missing `description`"))?,
        })
    }
}

fn string_literal(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(lit) => match &lit.lit {
            Lit::Str(s) => Some(s.value()),
            _ => None,
        },
        _ => None,
    }
}

fn param_meta(field: &Field) -> proc_macro2::TokenStream {
    let name = field
        .ident
        .as_ref()
        .map(|i| i.to_string())
        .unwrap_or_default();
    let description = doc_comment(&field.attrs);
    let required = !is_option(&field.ty) && !has_serde_default(&field.attrs);
    let json_type = json_type(&field.ty);
    let aliases = param_aliases(&field.attrs);

    let required = required.then(|| quote! { .required() });

    quote! {
        planboard_operations::ParamMeta::new(#name)
            .description(#description)
            .param_type(planboard_operations::ParamType::#json_type)
            #required
            .aliases(&[#(#aliases),*])
    }
}

fn doc_comment(attrs: &[Attribute]) -> String {
    attrs
        .iter()
        .filter(|a| a.path().is_ident("doc"))
        .filter_map(|a| match &a.meta {
            Meta::NameValue(nv) => string_literal(&nv.value),
            _ => None,
        })
        .map(|line| line.trim().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn has_serde_default(attrs: &[Attribute]) -> bool {
    let mut found = false;
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("default") {
                found = true;
            }
            if meta.input.peek(Token![=]) {
                meta.value()?.parse::<Expr>()?;
            }
            Ok(())
        });
    }
    found
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(path) => path.path.segments.last(),
        _ => None,
    }
}

fn is_option(ty: &Type) -> bool {
    last_segment(ty).is_some_and(|s| s.ident == "Option")
}

fn json_type(ty: &Type) -> proc_macro2::Ident {
    let ident = |s: &str| proc_macro2::Ident::new(s, proc_macro2::Span::call_site());

    let Some(segment) = last_segment(ty) else {
        return ident("String");
    };

    match segment.ident.to_string().as_str() {
        "Option" => match &segment.arguments {
            PathArguments::AngleBracketed(args) => match args.args.first() {
                Some(GenericArgument::Type(inner)) => json_type(inner),
                _ => ident("String"),
            },
            _ => ident("String"),
        },
        "Vec" => ident("Array"),
        "bool" => ident("Boolean"),
        "i32" | "i64" | "u32" | "u64" | "usize" | "isize" => ident("Integer"),
        "f32" | "f64" => ident("Number"),
        "HashMap" | "BTreeMap" | "Map" | "Value" => ident("Object"),
        _ => ident("String"),
    }
}

fn param_aliases(attrs: &[Attribute]) -> Vec<String> {
    let mut aliases = Vec::new();
    for attr in attrs
        .iter()
        .filter(|a| a.path().is_ident("param") || a.path().is_ident("serde"))
    {
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("alias") {
                let lit: syn::LitStr = meta.value()?.parse()?;
                aliases.push(lit.value());
            } else if meta.input.peek(Token![=]) {
                meta.value()?.parse::<Expr>()?;
            }
            Ok(())
        });
    }
    aliases
}
