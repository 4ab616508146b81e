//! Derive macro for `replica::Node`
//!
//! Generates the record accessor that lets the replica walker look up struct
//! fields by selector name.
extern crate proc_macro;

mod record;

use proc_macro2::Span;
use quote::{ToTokens, TokenStreamExt};

//--------------------------------------------------------------------------------------------------
struct CrateName;
const CRATE: CrateName = CrateName;

impl ToTokens for CrateName {
    fn to_tokens(&self, tokens: &mut proc_macro2::TokenStream) {
        tokens.append(syn::Ident::new("replica", Span::call_site()))
    }
}

//--------------------------------------------------------------------------------------------------

/// Derives `replica::Node` for a struct.
///
/// The struct must also implement `Clone`, `PartialEq`, `Default` and `Debug`,
/// and every exposed field must implement `Node`.
///
/// Field attributes:
/// - `#[replica(rename = "name")]`: select the field under another name
/// - `#[replica(skip)]`: hide the field from selectors
///
/// # Examples
///```ignore
/// #[derive(Debug, Clone, Default, PartialEq, Node)]
/// struct Port {
///     #[replica(rename = "Name")]
///     name: String,
///     host_port: u16,
///     #[replica(skip)]
///     cache: Cache,
/// }
///```
#[proc_macro_derive(Node, attributes(replica))]
pub fn derive_node(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    record::derive_node_impl(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
