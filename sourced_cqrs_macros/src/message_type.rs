use proc_macro::TokenStream;
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr, Token};

pub fn derive_message_type(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Extract #[message(name = "...")] from struct-level attributes
    let name = match extract_name(&input) {
        Ok(name) => name,
        Err(err) => return err.to_compile_error().into(),
    };

    let fields = match extract_fields(&input) {
        Ok(fields) => fields,
        Err(err) => return err.to_compile_error().into(),
    };

    let expanded = quote! {
        impl #impl_generics sourced_cqrs::MessageType for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name;
            const FIELDS: &'static [&'static str] = &[#(#fields),*];
        }
    };

    TokenStream::from(expanded)
}

fn extract_name(input: &DeriveInput) -> syn::Result<String> {
    for attr in &input.attrs {
        if !attr.path().is_ident("message") {
            continue;
        }

        let mut name = None;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                name = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `name = \"...\"`"))
            }
        })?;

        if let Some(name) = name {
            return Ok(name);
        }
    }

    // Default: the struct name
    Ok(input.ident.to_string())
}

/// Field keys as serde writes them, in declaration order.
fn extract_fields(input: &DeriveInput) -> syn::Result<Vec<String>> {
    let data = match &input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "MessageType can only be derived for structs",
            ))
        }
    };

    let named = match &data.fields {
        Fields::Named(fields) => &fields.named,
        Fields::Unit => return Ok(Vec::new()),
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "MessageType needs named fields",
            ))
        }
    };

    let rule = container_rename_rule(&input.attrs)?;

    let mut keys = Vec::new();
    for field in named {
        let ident = match &field.ident {
            Some(ident) => ident,
            None => continue,
        };
        let serde = field_serde(&field.attrs)?;
        if serde.skip {
            continue;
        }
        let key = match serde.rename {
            Some(rename) => rename,
            None => {
                let raw = ident.to_string();
                rule.apply(raw.trim_start_matches("r#"))
            }
        };
        keys.push(key);
    }
    Ok(keys)
}

#[derive(Clone, Copy)]
enum RenameRule {
    None,
    Lower,
    Upper,
    Pascal,
    Camel,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    fn parse(lit: &LitStr) -> syn::Result<Self> {
        Ok(match lit.value().as_str() {
            "lowercase" | "snake_case" => RenameRule::Lower,
            "UPPERCASE" => RenameRule::Upper,
            "PascalCase" => RenameRule::Pascal,
            "camelCase" => RenameRule::Camel,
            "SCREAMING_SNAKE_CASE" => RenameRule::ScreamingSnake,
            "kebab-case" => RenameRule::Kebab,
            "SCREAMING-KEBAB-CASE" => RenameRule::ScreamingKebab,
            other => {
                return Err(syn::Error::new(
                    lit.span(),
                    format!("unknown rename rule `{}`", other),
                ))
            }
        })
    }

    /// Rename a snake_case field the way serde does.
    fn apply(self, field: &str) -> String {
        match self {
            RenameRule::None | RenameRule::Lower => field.to_string(),
            RenameRule::Upper | RenameRule::ScreamingSnake => field.to_ascii_uppercase(),
            RenameRule::Pascal => pascal(field),
            RenameRule::Camel => {
                let pascal = pascal(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                    None => pascal,
                }
            }
            RenameRule::Kebab => field.replace('_', "-"),
            RenameRule::ScreamingKebab => field.to_ascii_uppercase().replace('_', "-"),
        }
    }
}

fn pascal(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut capitalize = true;
    for ch in field.chars() {
        if ch == '_' {
            capitalize = true;
        } else if capitalize {
            out.push(ch.to_ascii_uppercase());
            capitalize = false;
        } else {
            out.push(ch);
        }
    }
    out
}

fn container_rename_rule(attrs: &[Attribute]) -> syn::Result<RenameRule> {
    let mut rule = RenameRule::None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                if !meta.input.peek(Token![=]) {
                    return Err(meta.error(
                        "MessageType needs one `rename_all = \"...\"` for both directions",
                    ));
                }
                let lit: LitStr = meta.value()?.parse()?;
                rule = RenameRule::parse(&lit)?;
                Ok(())
            } else {
                skip_meta(&meta)
            }
        })?;
    }
    Ok(rule)
}

#[derive(Default)]
struct FieldSerde {
    rename: Option<String>,
    skip: bool,
}

fn field_serde(attrs: &[Attribute]) -> syn::Result<FieldSerde> {
    let mut serde = FieldSerde::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                if !meta.input.peek(Token![=]) {
                    return Err(meta.error(
                        "MessageType needs one `rename = \"...\"` for both directions",
                    ));
                }
                let lit: LitStr = meta.value()?.parse()?;
                serde.rename = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("skip") {
                serde.skip = true;
                Ok(())
            } else if meta.path.is_ident("skip_serializing")
                || meta.path.is_ident("skip_deserializing")
                || meta.path.is_ident("flatten")
            {
                Err(meta.error("MessageType fields must serialize and deserialize the same key"))
            } else {
                skip_meta(&meta)
            }
        })?;
    }
    Ok(serde)
}

/// Consume a serde option this derive does not care about.
fn skip_meta(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|nested| skip_meta(&nested))?;
    }
    Ok(())
}
