mod message_type;

use std::collections::HashSet;

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    braced,
    parse::{Parse, ParseStream},
    parse_macro_input, Ident, LitStr, Token,
};

// ============================================================================
// handlers! proc-macro
// ============================================================================

/// Generates the `HandlerHost` impl for a handler-bearing struct.
///
/// # Usage
///
/// ```ignore
/// sourced_cqrs::handlers!(Account, bindings {
///     "OpenAccount" => open,
///     "Deposit" => deposit,
///     "AccountOpened" => on_opened,
/// });
/// ```
///
/// `bindings` is the struct's `HandlerBindings` field. Each entry maps a
/// message name to a method `fn(&self) -> Handler`; `handler(name)` calls it
/// and unknown names return `None`.
#[proc_macro]
pub fn handlers(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as HandlersInput);

    let host = &input.host;
    let bindings_field = &input.bindings_field;

    let arms = input.entries.iter().map(|entry| {
        let message_name = &entry.message_name;
        let method = &entry.method;
        quote! {
            #message_name => ::core::option::Option::Some(self.#method()),
        }
    });

    let expanded = quote! {
        impl sourced_cqrs::HandlerHost for #host {
            fn bindings(&self) -> &sourced_cqrs::HandlerBindings {
                &self.#bindings_field
            }

            fn bindings_mut(&mut self) -> &mut sourced_cqrs::HandlerBindings {
                &mut self.#bindings_field
            }

            fn handler(&self, name: &str) -> ::core::option::Option<sourced_cqrs::Handler> {
                match name {
                    #(#arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    };

    TokenStream::from(expanded)
}

struct HandlersInput {
    host: Ident,
    bindings_field: Ident,
    entries: Vec<HandlerEntry>,
}

struct HandlerEntry {
    message_name: LitStr,
    method: Ident,
}

impl Parse for HandlersInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let host: Ident = input.parse()?;
        input.parse::<Token![,]>()?;
        let bindings_field: Ident = input.parse()?;

        let content;
        braced!(content in input);

        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        while !content.is_empty() {
            let message_name: LitStr = content.parse()?;
            if !seen.insert(message_name.value()) {
                return Err(syn::Error::new(
                    message_name.span(),
                    format!("duplicate handler for `{}`", message_name.value()),
                ));
            }

            content.parse::<Token![=>]>()?;
            let method: Ident = content.parse()?;

            entries.push(HandlerEntry {
                message_name,
                method,
            });

            // Optional trailing comma
            if content.peek(Token![,]) {
                content.parse::<Token![,]>()?;
            }
        }

        Ok(HandlersInput {
            host,
            bindings_field,
            entries,
        })
    }
}

// ============================================================================
// #[derive(MessageType)] derive macro
// ============================================================================

/// Derive macro for the `MessageType` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Serialize, Deserialize, MessageType)]
/// #[message(name = "OpenAccount")]
/// struct OpenAccount {
///     pub id: String,
///     pub owner: String,
/// }
/// ```
///
/// - `#[message(name = "...")]` sets the registered name. Defaults to the
///   struct name.
/// - `FIELDS` lists the named fields in declaration order, keyed the way
///   serde writes them: `#[serde(rename_all)]` and `#[serde(rename)]` apply
///   and `#[serde(skip)]` fields are left out. One-directional renames,
///   `skip_serializing`, `skip_deserializing` and `flatten` are rejected.
/// - Unit structs have no fields; tuple structs are rejected.
#[proc_macro_derive(MessageType, attributes(message))]
pub fn derive_message_type(input: TokenStream) -> TokenStream {
    message_type::derive_message_type(input)
}
