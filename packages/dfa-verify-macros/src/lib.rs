use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Attribute, Expr, GenericArgument, Ident, PathArguments, Token, Type, Visibility,
    parse::{Parse, ParseStream},
    parse_macro_input,
    punctuated::Punctuated,
    token,
};

/// One field of a layered config section.
///
/// ```text
/// /// doc comment
/// name: Type = default
/// name: Type (PartialType = default)
/// ```
///
/// The parenthesized form is used for nested sections, where the partial
/// representation is the nested section's own `Partial*` struct.
struct ConfigField {
    docs: Vec<Attribute>,
    name: Ident,
    ty: Type,
    default_value: Expr,
    partial_ty: Option<Type>,
}

impl Parse for ConfigField {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let docs = input.call(Attribute::parse_outer)?;
        let name: Ident = input.parse()?;
        input.parse::<Token![:]>()?;
        let ty: Type = input.parse()?;

        let (partial_ty, default_value) = if input.peek(token::Paren) {
            let content;
            syn::parenthesized!(content in input);
            let partial_ty: Type = content.parse()?;
            content.parse::<Token![=]>()?;
            (Some(partial_ty), content.parse::<Expr>()?)
        } else {
            input.parse::<Token![=]>()?;
            (None, input.parse::<Expr>()?)
        };

        Ok(ConfigField {
            docs,
            name,
            ty,
            default_value,
            partial_ty,
        })
    }
}

struct ConfigInput {
    docs: Vec<Attribute>,
    vis: Visibility,
    name: Ident,
    fields: Punctuated<ConfigField, Token![,]>,
}

impl Parse for ConfigInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let docs = input.call(Attribute::parse_outer)?;
        let vis: Visibility = input.parse()?;
        input.parse::<Token![struct]>()?;
        let name: Ident = input.parse()?;
        let content;
        syn::braced!(content in input);
        let fields = content.parse_terminated(ConfigField::parse, Token![,])?;
        Ok(ConfigInput {
            docs,
            vis,
            name,
            fields,
        })
    }
}

/// `Option<T>` fields are already optional in the partial struct.
fn is_option(ty: &Type) -> bool {
    if let Type::Path(tp) = ty
        && let Some(seg) = tp.path.segments.last()
        && seg.ident == "Option"
        && let PathArguments::AngleBracketed(args) = &seg.arguments
    {
        return args.args.len() == 1 && matches!(args.args[0], GenericArgument::Type(_));
    }
    false
}

/// Generates a config section together with its `Partial*` twin.
///
/// The partial struct is what gets deserialized from TOML, every field in it
/// may be left out. Missing values are filled in from the declared defaults
/// through `crate::config::IntoOr`, so this macro can only be used inside
/// the library crate that defines that trait.
#[proc_macro]
pub fn config(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as ConfigInput);
    let docs = &input.docs;
    let vis = &input.vis;
    let struct_name = &input.name;
    let partial_struct_name = format_ident!("Partial{}", struct_name);

    let fields = input.fields.iter().map(|f| {
        let docs = &f.docs;
        let name = &f.name;
        let ty = &f.ty;
        quote! {
            #( #docs )*
            #name: #ty
        }
    });

    let partial_fields = input.fields.iter().map(|f| {
        let name = &f.name;
        let ty = &f.ty;
        let partial_ty = match &f.partial_ty {
            Some(pt) => quote! { #pt },
            None if is_option(ty) => quote! { #ty },
            None => quote! { Option<#ty> },
        };
        quote! {
            #[serde(default)]
            #name: #partial_ty
        }
    });

    let from_partial_assignments = input.fields.iter().map(|f| {
        let name = &f.name;
        let default_value = &f.default_value;
        quote! { #name: partial.#name.into_or(#default_value) }
    });

    let methods = input.fields.iter().map(|f| {
        let name = &f.name;
        let ty = &f.ty;
        let with_name = format_ident!("with_{}", name);
        let set_name = format_ident!("set_{}", name);
        let get_name = format_ident!("get_{}", name);
        quote! {
            pub fn #with_name(mut self, #name: #ty) -> Self {
                self.#name = #name;
                self
            }
            pub fn #set_name(&mut self, #name: #ty) {
                self.#name = #name;
            }
            pub fn #get_name(&self) -> &#ty {
                &self.#name
            }
        }
    });

    let default_assignments = input.fields.iter().map(|f| {
        let name = &f.name;
        let default_value = &f.default_value;
        quote! { #name: #default_value }
    });

    let expanded = quote! {
        #( #docs )*
        #[derive(Debug, Clone, PartialEq, serde::Serialize)]
        #vis struct #struct_name {
            #( #fields, )*
        }

        #[derive(Debug, Clone, Default, serde::Deserialize)]
        #[serde(deny_unknown_fields)]
        #vis struct #partial_struct_name {
            #( #partial_fields, )*
        }

        impl #struct_name {
            pub fn from_partial(partial: #partial_struct_name) -> Self {
                use crate::config::IntoOr;
                Self {
                    #( #from_partial_assignments, )*
                }
            }
            pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
                let partial: #partial_struct_name = toml::from_str(content)?;
                Ok(Self::from_partial(partial))
            }
            pub fn from_file<P: AsRef<std::path::Path>>(file_path: P) -> anyhow::Result<Self> {
                use anyhow::Context;
                let file_path = file_path.as_ref();
                let content = std::fs::read_to_string(file_path)
                    .with_context(|| format!("failed to read config file {}", file_path.display()))?;
                Self::from_toml_str(&content)
                    .with_context(|| format!("invalid config file {}", file_path.display()))
            }
            pub fn from_optional_file<P: AsRef<std::path::Path>>(file_path: Option<P>) -> anyhow::Result<Self> {
                match file_path {
                    Some(p) => Self::from_file(p),
                    None => Ok(Self::default()),
                }
            }
            #( #methods )*
        }

        impl Default for #struct_name {
            fn default() -> Self {
                #struct_name {
                    #( #default_assignments, )*
                }
            }
        }

        impl crate::config::IntoOr<#struct_name> for Option<#partial_struct_name> {
            fn into_or(self, base: #struct_name) -> #struct_name {
                match self {
                    Some(partial) => #struct_name::from_partial(partial),
                    None => base,
                }
            }
        }
    };
    TokenStream::from(expanded)
}
