//! # swaggerize_macros
//!
//! `#[derive(Reflect)]` produces the static type descriptor `swaggerize` builds schemas from.
//!
//! ## Shapes
//!
//! - Structs with named fields describe an object with one property per field
//! - Unit structs describe an empty object
//! - Single-field tuple structs take the shape of the wrapped type under their own name
//! - Enums without data describe a string whose legal values are the variant names
//!
//! ## Container Attributes
//!
//! `#[swagger(...)]` on the type:
//!
//! - `rename = "Name"`: definition name
//! - `inline`: anonymous; always described in place, never as a definition
//! - `definition`: schema comes from the type's `SwaggerDefinition` impl
//! - `parameters`: parameters come from the type's `SwaggerParameters` impl
//! - `enumerable`: legal values come from the type's `SwaggerEnum` impl
//! - `text`: the type parses itself from text and is described as a plain string
//!
//! ## Field Attributes
//!
//! `#[swagger(...)]` on a field:
//!
//! - `rename = "name"`, `skip`, `flatten`, `hidden`
//! - `schema_type = "date-time"`: common type name replacing the inferred schema
//! - `default = "42"`: default value, parsed per the field's type
//! - `param`, `param = "name"`: operation parameter
//! - `path`, `path = "name"`: path parameter
//! - `location = "header"`: `query`, `header`, `path`, `formData` or `body`
//! - `required = false`
//! - `description = "..."`: otherwise taken from the doc comment
//!
//! `#[serde(rename, rename_all, skip, flatten)]` are honored as well. Only `pub` fields
//! (any visibility other than private) are part of the described shape.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Expr, ExprLit, Field, Fields, GenericParam,
    Lit, LitBool, LitStr, Meta, Token, Visibility,
};

#[proc_macro_derive(Reflect, attributes(swagger))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[derive(Default)]
struct SerdeAttrs {
    rename: Option<String>,
    rename_all: Option<String>,
    skip: bool,
    flatten: bool,
}

impl SerdeAttrs {
    /// Lenient: serde syntax this crate does not understand is ignored, serde reports it.
    fn collect(&mut self, attr: &Attribute) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") || meta.path.is_ident("rename_all") {
                let target = if meta.path.is_ident("rename") {
                    &mut self.rename
                } else {
                    &mut self.rename_all
                };
                if meta.input.peek(Token![=]) {
                    *target = Some(meta.value()?.parse::<LitStr>()?.value());
                } else {
                    meta.parse_nested_meta(|inner| {
                        let value = inner.value()?.parse::<LitStr>()?.value();
                        if inner.path.is_ident("serialize") {
                            *target = Some(value);
                        }
                        Ok(())
                    })?;
                }
            } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                self.skip = true;
            } else if meta.path.is_ident("flatten") {
                self.flatten = true;
            } else if meta.input.peek(Token![=]) {
                meta.value()?.parse::<Expr>()?;
            } else if !meta.input.is_empty() && !meta.input.peek(Token![,]) {
                meta.input.parse::<proc_macro2::TokenTree>()?;
            }
            Ok(())
        })
        .ok();
    }
}

#[derive(Default)]
struct ContainerAttrs {
    rename: Option<String>,
    inline: bool,
    definition: bool,
    parameters: bool,
    enumerable: bool,
    text: bool,
    serde: SerdeAttrs,
}

impl ContainerAttrs {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = ContainerAttrs::default();
        for attr in attrs {
            if attr.path().is_ident("serde") {
                out.serde.collect(attr);
                continue;
            }
            if !attr.path().is_ident("swagger") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    out.rename = Some(meta.value()?.parse::<LitStr>()?.value());
                } else if meta.path.is_ident("inline") {
                    out.inline = true;
                } else if meta.path.is_ident("definition") {
                    out.definition = true;
                } else if meta.path.is_ident("parameters") {
                    out.parameters = true;
                } else if meta.path.is_ident("enumerable") {
                    out.enumerable = true;
                } else if meta.path.is_ident("text") {
                    out.text = true;
                } else {
                    return Err(meta.error("unknown swagger container attribute"));
                }
                Ok(())
            })?;
        }
        Ok(out)
    }
}

#[derive(Default)]
struct FieldAttrs {
    rename: Option<String>,
    skip: bool,
    flatten: bool,
    hidden: bool,
    schema_type: Option<String>,
    default: Option<String>,
    param: Option<Option<String>>,
    path: Option<Option<String>>,
    location: Option<TokenStream2>,
    required: Option<bool>,
    description: Option<String>,
    docs: Vec<String>,
    serde: SerdeAttrs,
}

impl FieldAttrs {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = FieldAttrs::default();
        for attr in attrs {
            if attr.path().is_ident("doc") {
                if let Some(line) = doc_line(attr) {
                    out.docs.push(line);
                }
                continue;
            }
            if attr.path().is_ident("serde") {
                out.serde.collect(attr);
                continue;
            }
            if !attr.path().is_ident("swagger") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                let key = meta
                    .path
                    .get_ident()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                match key.as_str() {
                    "rename" => out.rename = Some(meta.value()?.parse::<LitStr>()?.value()),
                    "skip" => out.skip = true,
                    "flatten" => out.flatten = true,
                    "hidden" => out.hidden = true,
                    "schema_type" => {
                        out.schema_type = Some(meta.value()?.parse::<LitStr>()?.value())
                    }
                    "default" => out.default = Some(lit_text(&meta.value()?.parse::<Lit>()?)?),
                    "param" | "path" => {
                        let name = if meta.input.peek(Token![=]) {
                            Some(meta.value()?.parse::<LitStr>()?.value())
                        } else {
                            None
                        };
                        if key == "param" {
                            out.param = Some(name);
                        } else {
                            out.path = Some(name);
                        }
                    }
                    "location" => {
                        let lit = meta.value()?.parse::<LitStr>()?;
                        out.location = Some(location_variant(&lit)?);
                    }
                    "required" => {
                        out.required = Some(if meta.input.peek(Token![=]) {
                            meta.value()?.parse::<LitBool>()?.value
                        } else {
                            true
                        })
                    }
                    "description" => {
                        out.description = Some(meta.value()?.parse::<LitStr>()?.value())
                    }
                    _ => return Err(meta.error("unknown swagger field attribute")),
                }
                Ok(())
            })?;
        }
        Ok(out)
    }

    fn description(&self) -> Option<String> {
        self.description.clone().or_else(|| {
            let text = self
                .docs
                .iter()
                .filter(|line| !line.is_empty())
                .cloned()
                .collect::<Vec<_>>()
                .join(" ");
            (!text.is_empty()).then_some(text)
        })
    }
}

fn doc_line(attr: &Attribute) -> Option<String> {
    match &attr.meta {
        Meta::NameValue(nv) => match &nv.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(s), ..
            }) => Some(s.value().trim().to_string()),
            _ => None,
        },
        _ => None,
    }
}

fn lit_text(lit: &Lit) -> syn::Result<String> {
    match lit {
        Lit::Str(s) => Ok(s.value()),
        Lit::Int(i) => Ok(i.base10_digits().to_string()),
        Lit::Float(f) => Ok(f.base10_digits().to_string()),
        Lit::Bool(b) => Ok(b.value.to_string()),
        other => Err(syn::Error::new(
            other.span(),
            "default must be a string, integer, float or boolean literal",
        )),
    }
}

fn location_variant(lit: &LitStr) -> syn::Result<TokenStream2> {
    let variant = match lit.value().as_str() {
        "query" => quote!(Query),
        "header" => quote!(Header),
        "path" => quote!(Path),
        "formData" | "form_data" => quote!(FormData),
        "body" => quote!(Body),
        other => {
            return Err(syn::Error::new(
                lit.span(),
                format!("unknown parameter location `{other}`"),
            ))
        }
    };
    Ok(quote!(::swaggerize::model::ParamLocation::#variant))
}

/// Apply a serde `rename_all` rule to a field (`snake_case`) or variant (`PascalCase`) name.
fn rename_case(name: &str, rule: &str, is_variant: bool) -> String {
    let words: Vec<String> = if is_variant {
        let mut words = Vec::new();
        let mut current = String::new();
        for ch in name.chars() {
            if ch.is_uppercase() && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            current.extend(ch.to_lowercase());
        }
        if !current.is_empty() {
            words.push(current);
        }
        words
    } else {
        name.split('_').map(str::to_string).collect()
    };

    let capitalize = |w: &String| {
        let mut chars = w.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        }
    };

    match rule {
        // Field names are already lowercase; serde leaves them as they are.
        "lowercase" if !is_variant => name.to_string(),
        "UPPERCASE" if !is_variant => name.to_ascii_uppercase(),
        "lowercase" => words.concat(),
        "UPPERCASE" => words.concat().to_uppercase(),
        "PascalCase" => words.iter().map(capitalize).collect(),
        "camelCase" => {
            let pascal: String = words.iter().map(capitalize).collect();
            let mut chars = pascal.chars();
            match chars.next() {
                Some(first) => first.to_lowercase().chain(chars).collect(),
                None => pascal,
            }
        }
        "snake_case" => words.join("_"),
        "SCREAMING_SNAKE_CASE" => words.join("_").to_uppercase(),
        "kebab-case" => words.join("-"),
        "SCREAMING-KEBAB-CASE" => words.join("-").to_uppercase(),
        _ => name.to_string(),
    }
}

fn opt_str(value: Option<String>) -> TokenStream2 {
    match value {
        Some(s) => quote!(::core::option::Option::Some(#s)),
        None => quote!(::core::option::Option::None),
    }
}

fn field_descriptor(field: &Field, rename_all: Option<&str>) -> syn::Result<Option<TokenStream2>> {
    let Some(ident) = &field.ident else {
        return Err(syn::Error::new(field.span(), "expected a named field"));
    };
    let attrs = FieldAttrs::parse(&field.attrs)?;
    if attrs.skip {
        return Ok(None);
    }
    // A serde-skipped field only matters when it binds a parameter.
    if attrs.serde.skip && attrs.param.is_none() && attrs.path.is_none() {
        return Ok(None);
    }

    let rust_name = ident.unraw().to_string();
    let serialized = attrs
        .rename
        .clone()
        .or_else(|| attrs.serde.rename.clone())
        .or_else(|| rename_all.map(|rule| rename_case(&rust_name, rule, false)))
        .unwrap_or_else(|| rust_name.clone());
    let json_name = (!attrs.serde.skip).then(|| serialized.clone());

    let param_name = attrs
        .param
        .clone()
        .map(|name| name.unwrap_or_else(|| serialized.clone()));
    let path_name = attrs
        .path
        .clone()
        .map(|name| name.unwrap_or_else(|| serialized.clone()));

    let exported = !matches!(field.vis, Visibility::Inherited) && !attrs.hidden;
    let embedded = attrs.flatten || attrs.serde.flatten;
    let ty = &field.ty;

    let json_name = opt_str(json_name);
    let schema_type = opt_str(attrs.schema_type.clone());
    let default = opt_str(attrs.default.clone());
    let param_name = opt_str(param_name);
    let path_name = opt_str(path_name);
    let description = opt_str(attrs.description());
    let location = match &attrs.location {
        Some(variant) => quote!(::core::option::Option::Some(#variant)),
        None => quote!(::core::option::Option::None),
    };
    let required = match attrs.required {
        Some(value) => quote!(::core::option::Option::Some(#value)),
        None => quote!(::core::option::Option::None),
    };

    Ok(Some(quote! {
        ::swaggerize::reflect::FieldDescriptor {
            name: #rust_name,
            json_name: #json_name,
            exported: #exported,
            embedded: #embedded,
            ty: <#ty as ::swaggerize::Reflect>::descriptor,
            config: ::swaggerize::reflect::FieldConfig {
                schema_type: #schema_type,
                default: #default,
                param_name: #param_name,
                path_name: #path_name,
                location: #location,
                required: #required,
                description: #description,
            },
        }
    }))
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    let attrs = ContainerAttrs::parse(&input.attrs)?;
    let ident = &input.ident;
    let name = attrs
        .rename
        .clone()
        .unwrap_or_else(|| ident.unraw().to_string());
    let rename_all = attrs.serde.rename_all.as_deref();

    let mut enum_hook = TokenStream2::new();
    let kind = match &input.data {
        _ if attrs.text => quote!(::swaggerize::reflect::Kind::Text),
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => {
                let mut fields = Vec::new();
                for field in &named.named {
                    if let Some(tokens) = field_descriptor(field, rename_all)? {
                        fields.push(tokens);
                    }
                }
                quote!(::swaggerize::reflect::Kind::Struct(::std::vec![#(#fields),*]))
            }
            Fields::Unit => quote!(::swaggerize::reflect::Kind::Struct(::std::vec::Vec::new())),
            Fields::Unnamed(unnamed) if unnamed.unnamed.len() == 1 => {
                let inner = &unnamed.unnamed[0].ty;
                quote!(<#inner as ::swaggerize::Reflect>::descriptor().kind)
            }
            Fields::Unnamed(_) => quote!(::swaggerize::reflect::Kind::Unsupported("tuple struct")),
        },
        Data::Enum(data) if data.variants.iter().all(|v| matches!(v.fields, Fields::Unit)) => {
            if !attrs.enumerable {
                let mut pairs = Vec::new();
                for variant in &data.variants {
                    let variant_attrs = FieldAttrs::parse(&variant.attrs)?;
                    if variant_attrs.skip || variant_attrs.serde.skip {
                        continue;
                    }
                    let label = variant.ident.unraw().to_string();
                    let value = variant_attrs
                        .rename
                        .or(variant_attrs.serde.rename)
                        .or_else(|| rename_all.map(|rule| rename_case(&label, rule, true)))
                        .unwrap_or_else(|| label.clone());
                    pairs.push(quote!((#value, #label)));
                }
                enum_hook = quote! {
                    fn enum_values() -> ::swaggerize::model::EnumValues {
                        ::swaggerize::model::EnumValues::from_strings([#(#pairs),*])
                    }
                    descriptor.enum_values = ::core::option::Option::Some(enum_values);
                };
            }
            quote!(::swaggerize::reflect::Kind::String)
        }
        Data::Enum(_) => quote!(::swaggerize::reflect::Kind::Unsupported("enum")),
        Data::Union(_) => quote!(::swaggerize::reflect::Kind::Unsupported("union")),
    };

    let base = if attrs.inline {
        quote!(::swaggerize::TypeDescriptor::anonymous::<Self>(#kind))
    } else {
        quote!(::swaggerize::TypeDescriptor::named::<Self>(#name, #kind))
    };

    let mut hooks = Vec::new();
    if attrs.definition {
        hooks.push(quote!(descriptor = descriptor.with_definition::<Self>();));
    }
    if attrs.parameters {
        hooks.push(quote!(descriptor = descriptor.with_parameters::<Self>();));
    }
    if attrs.enumerable {
        hooks.push(quote!(descriptor = descriptor.with_enum::<Self>();));
    }

    let mut generics = input.generics.clone();
    if let Some(GenericParam::Lifetime(lifetime)) = generics
        .params
        .iter()
        .find(|p| matches!(p, GenericParam::Lifetime(_)))
    {
        return Err(syn::Error::new(
            lifetime.span(),
            "Reflect cannot be derived for types with lifetime parameters",
        ));
    }
    let type_params: Vec<_> = generics.type_params().map(|p| p.ident.clone()).collect();
    let where_clause = generics.make_where_clause();
    for param in type_params {
        where_clause
            .predicates
            .push(syn::parse_quote!(#param: ::swaggerize::Reflect));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::swaggerize::Reflect for #ident #ty_generics #where_clause {
            fn descriptor() -> ::swaggerize::TypeDescriptor {
                #[allow(unused_mut)]
                let mut descriptor = #base;
                #enum_hook
                #(#hooks)*
                descriptor
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_case_fields() {
        assert_eq!(rename_case("created_at", "camelCase", false), "createdAt");
        assert_eq!(rename_case("created_at", "PascalCase", false), "CreatedAt");
        assert_eq!(rename_case("created_at", "kebab-case", false), "created-at");
        assert_eq!(rename_case("created_at", "lowercase", false), "created_at");
        assert_eq!(rename_case("created_at", "UPPERCASE", false), "CREATED_AT");
        assert_eq!(
            rename_case("created_at", "SCREAMING_SNAKE_CASE", false),
            "CREATED_AT"
        );
    }

    #[test]
    fn test_rename_case_variants() {
        assert_eq!(rename_case("InProgress", "snake_case", true), "in_progress");
        assert_eq!(rename_case("InProgress", "lowercase", true), "inprogress");
        assert_eq!(rename_case("InProgress", "camelCase", true), "inProgress");
        assert_eq!(
            rename_case("InProgress", "SCREAMING-KEBAB-CASE", true),
            "IN-PROGRESS"
        );
    }

    #[test]
    fn test_expand_rejects_lifetimes() {
        let input: DeriveInput = syn::parse_quote! {
            struct Borrowed<'a> { pub name: &'a str }
        };
        assert!(expand(input).is_err());
    }

    #[test]
    fn test_unknown_location_rejected() {
        let input: DeriveInput = syn::parse_quote! {
            struct Params {
                #[swagger(param, location = "cookie")]
                pub session: String,
            }
        };
        let err = expand(input).err().map(|e| e.to_string()).unwrap_or_default();
        assert!(err.contains("unknown parameter location"));
    }
}
