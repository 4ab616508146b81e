use crate::CRATE;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Error, Member};

const REPLICA_ATTR_PATH: &str = "replica";
const RENAME_ATTR_PATH: &str = "rename";
const SKIP_ATTR_PATH: &str = "skip";

/// A struct field as seen by the walker.
struct Field {
    member: Member,
    /// Name used in selector paths.
    selector: String,
    skip: bool,
}

impl Field {
    fn parse_ast(field: &syn::Field, index: usize) -> Result<Self, Error> {
        let member = match field.ident.as_ref() {
            Some(ident) => Member::Named(ident.clone()),
            None => Member::Unnamed(index.into()),
        };

        let mut rename: Option<String> = None;
        let mut skip = false;

        for attr in field.attrs.iter() {
            if !attr.path().is_ident(REPLICA_ATTR_PATH) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident(SKIP_ATTR_PATH) {
                    if skip {
                        return Err(meta.error("Duplicate attribute"));
                    }
                    skip = true;
                    Ok(())
                } else if meta.path.is_ident(RENAME_ATTR_PATH) {
                    if rename.is_some() {
                        return Err(meta.error("Duplicate attribute"));
                    }
                    let lit: syn::LitStr = meta.value()?.parse()?;
                    let value = lit.value();
                    if value.is_empty() || value.contains('.') {
                        return Err(Error::new(
                            lit.span(),
                            "selector name must be non-empty and contain no '.'",
                        ));
                    }
                    rename = Some(value);
                    Ok(())
                } else {
                    Err(meta.error("Unknown attribute, expected `rename = \"...\"` or `skip`"))
                }
            })?;
        }

        let selector = rename.unwrap_or_else(|| match &member {
            Member::Named(ident) => ident.to_string().trim_start_matches("r#").to_owned(),
            Member::Unnamed(index) => index.index.to_string(),
        });

        Ok(Field { member, selector, skip })
    }
}

pub(crate) fn derive_node_impl(input: DeriveInput) -> Result<TokenStream, Error> {
    let fields = match &input.data {
        Data::Struct(s) => s
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| Field::parse_ast(field, i))
            .collect::<Result<Vec<_>, _>>()?,
        Data::Enum(e) => {
            return Err(Error::new(
                e.enum_token.span(),
                "Node can only be derived for structs",
            ))
        }
        Data::Union(u) => {
            return Err(Error::new(
                u.union_token.span(),
                "Node can only be derived for structs",
            ))
        }
    };

    let exposed: Vec<&Field> = fields.iter().filter(|f| !f.skip).collect();
    for (i, field) in exposed.iter().enumerate() {
        if exposed[..i].iter().any(|prev| prev.selector == field.selector) {
            return Err(Error::new(
                input.ident.span(),
                format!("duplicate selector name `{}`", field.selector),
            ));
        }
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let names: Vec<&str> = exposed.iter().map(|f| f.selector.as_str()).collect();
    let members: Vec<&Member> = exposed.iter().map(|f| &f.member).collect();

    Ok(quote! {
        impl #impl_generics ::#CRATE::RecordNode for #ident #ty_generics #where_clause {
            fn field(&self, name: &str) -> ::core::option::Option<&dyn ::#CRATE::Node> {
                match name {
                    #( #names => ::core::option::Option::Some(&self.#members), )*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_mut(&mut self, name: &str) -> ::core::option::Option<&mut dyn ::#CRATE::Node> {
                match name {
                    #( #names => ::core::option::Option::Some(&mut self.#members), )*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl #impl_generics ::#CRATE::Node for #ident #ty_generics #where_clause {
            fn shape(&self) -> ::#CRATE::Shape<'_> {
                ::#CRATE::Shape::Record(self)
            }

            fn shape_mut(&mut self) -> ::#CRATE::ShapeMut<'_> {
                ::#CRATE::ShapeMut::Record(self)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn error_text(input: DeriveInput) -> String {
        match derive_node_impl(input) {
            Ok(_) => panic!("expected derive to fail"),
            Err(err) => err.to_string(),
        }
    }

    #[test]
    fn rejects_enum() {
        let text = error_text(parse_quote! {
            enum Phase { Pending, Running }
        });
        assert_eq!(text, "Node can only be derived for structs");
    }

    #[test]
    fn rejects_union() {
        let text = error_text(parse_quote! {
            union Bits { a: u32, b: f32 }
        });
        assert_eq!(text, "Node can only be derived for structs");
    }

    #[test]
    fn rejects_duplicate_selector_name() {
        let text = error_text(parse_quote! {
            struct Port {
                #[replica(rename = "host_port")]
                port: u16,
                host_port: u16,
            }
        });
        assert_eq!(text, "duplicate selector name `host_port`");
    }

    #[test]
    fn skipped_field_frees_its_name() {
        let result = derive_node_impl(parse_quote! {
            struct Port {
                #[replica(rename = "host_port")]
                port: u16,
                #[replica(skip)]
                host_port: u16,
            }
        });
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_dotted_rename() {
        let text = error_text(parse_quote! {
            struct Meta {
                #[replica(rename = "meta.name")]
                name: String,
            }
        });
        assert_eq!(text, "selector name must be non-empty and contain no '.'");
    }

    #[test]
    fn rejects_empty_rename() {
        let text = error_text(parse_quote! {
            struct Meta {
                #[replica(rename = "")]
                name: String,
            }
        });
        assert_eq!(text, "selector name must be non-empty and contain no '.'");
    }

    #[test]
    fn rejects_unknown_attribute() {
        let text = error_text(parse_quote! {
            struct Meta {
                #[replica(flatten)]
                name: String,
            }
        });
        assert_eq!(text, "Unknown attribute, expected `rename = \"...\"` or `skip`");
    }

    #[test]
    fn rejects_duplicate_skip() {
        let text = error_text(parse_quote! {
            struct Meta {
                #[replica(skip, skip)]
                name: String,
            }
        });
        assert_eq!(text, "Duplicate attribute");
    }

    #[test]
    fn generates_record_and_node_impls() {
        let tokens = derive_node_impl(parse_quote! {
            struct Meta {
                #[replica(rename = "Name")]
                name: String,
                labels: Vec<String>,
            }
        })
        .map(|tokens| tokens.to_string());

        let Ok(tokens) = tokens else {
            panic!("expected derive to succeed");
        };
        assert!(tokens.contains("RecordNode for Meta"));
        assert!(tokens.contains("\"Name\" =>"));
        assert!(tokens.contains("\"labels\" =>"));
        assert!(tokens.contains("Shape :: Record"));
    }
}
