use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use std::collections::HashSet;
use syn::{
    Expr, ExprLit, Field, Fields, FieldsNamed, Ident, ItemStruct, Lit, Meta, Path, Token,
    parse_macro_input, parse_quote, parse_str, punctuated::Punctuated,
};

/// Column names and trait location used by `#[base_entity]`.
struct EntityColumns {
    traits_path: Path,
    active_model: Ident,
    id: Ident,
    created_at: Ident,
    updated_at: Ident,
}

impl Default for EntityColumns {
    fn default() -> Self {
        Self {
            traits_path: parse_str("crate::db::dao::base_traits")
                .expect("default traits path should parse"),
            active_model: Ident::new("ActiveModel", Span::call_site()),
            id: Ident::new("id", Span::call_site()),
            created_at: Ident::new("created_at", Span::call_site()),
            updated_at: Ident::new("updated_at", Span::call_site()),
        }
    }
}

/// Prepends a UUID primary key plus `created_at`/`updated_at` columns to a
/// sea-orm model and implements the DAO traits that stamp them.
///
/// Fields already declared on the struct are left untouched, so a model can
/// override the generated column attributes by declaring the field itself.
#[proc_macro_attribute]
pub fn base_entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr with Punctuated<Meta, Token![,]>::parse_terminated);
    let mut columns = EntityColumns::default();
    if let Err(err) = apply_args(&mut columns, args) {
        return err.to_compile_error().into();
    }

    let mut input = parse_macro_input!(item as ItemStruct);
    match &mut input.fields {
        Fields::Named(fields) => inject_fields(fields, &columns),
        _ => {
            return syn::Error::new_spanned(input, "base_entity requires a struct with named fields")
                .to_compile_error()
                .into();
        }
    }

    let impls = trait_impls(&columns);
    quote! {
        #input

        #impls
    }
    .into()
}

fn inject_fields(fields: &mut FieldsNamed, columns: &EntityColumns) {
    let declared: HashSet<String> = fields
        .named
        .iter()
        .filter_map(|field| field.ident.as_ref().map(ToString::to_string))
        .collect();

    let id = &columns.id;
    let created_at = &columns.created_at;
    let updated_at = &columns.updated_at;
    let generated: [(&Ident, Field); 3] = [
        (
            id,
            parse_quote! {
                #[sea_orm(primary_key, auto_increment = false)]
                pub #id: uuid::Uuid
            },
        ),
        (
            created_at,
            parse_quote! {
                #[sea_orm(default_expr = "Expr::current_timestamp()")]
                pub #created_at: sea_orm::entity::prelude::DateTimeWithTimeZone
            },
        ),
        (
            updated_at,
            parse_quote! {
                #[sea_orm(default_expr = "Expr::current_timestamp()")]
                pub #updated_at: sea_orm::entity::prelude::DateTimeWithTimeZone
            },
        ),
    ];

    let mut named = Punctuated::new();
    for (ident, field) in generated {
        if !declared.contains(&ident.to_string()) {
            named.push(field);
        }
    }
    for field in fields.named.iter().cloned() {
        named.push(field);
    }
    fields.named = named;
}

fn trait_impls(columns: &EntityColumns) -> TokenStream2 {
    let EntityColumns {
        traits_path,
        active_model,
        id,
        created_at,
        updated_at,
    } = columns;

    quote! {
        impl #traits_path::HasIdActiveModel for #active_model {
            fn set_id(&mut self, id: uuid::Uuid) {
                self.#id = sea_orm::ActiveValue::Set(id);
            }
        }

        impl #traits_path::TimestampedActiveModel for #active_model {
            fn set_created_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.#created_at = sea_orm::ActiveValue::Set(ts);
            }

            fn set_updated_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.#updated_at = sea_orm::ActiveValue::Set(ts);
            }

            fn updated_at(&self) -> Option<sea_orm::entity::prelude::DateTimeWithTimeZone> {
                match &self.#updated_at {
                    sea_orm::ActiveValue::Set(ts) | sea_orm::ActiveValue::Unchanged(ts) => {
                        Some(*ts)
                    }
                    sea_orm::ActiveValue::NotSet => None,
                }
            }
        }
    }
}

fn apply_args(
    columns: &mut EntityColumns,
    args: Punctuated<Meta, Token![,]>,
) -> Result<(), syn::Error> {
    for meta in args {
        let Meta::NameValue(name_value) = meta else {
            return Err(syn::Error::new_spanned(
                meta,
                "expected name-value pair, e.g. traits = \"path::to::traits\"",
            ));
        };

        let Some(key) = name_value.path.get_ident().map(ToString::to_string) else {
            return Err(syn::Error::new_spanned(
                name_value.path,
                "expected simple identifier for attribute key",
            ));
        };

        let value = match &name_value.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(lit_str),
                ..
            }) => lit_str.clone(),
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "expected string literal for attribute value",
                ));
            }
        };

        let ident = || Ident::new(&value.value(), value.span());
        match key.as_str() {
            "traits" => {
                columns.traits_path = value.parse::<Path>().map_err(|err| {
                    syn::Error::new(value.span(), format!("invalid traits path: {err}"))
                })?;
            }
            "active_model" => columns.active_model = ident(),
            "id" => columns.id = ident(),
            "created_at" => columns.created_at = ident(),
            "updated_at" => columns.updated_at = ident(),
            _ => {
                return Err(syn::Error::new_spanned(
                    name_value.path,
                    "unknown base_entity attribute key",
                ));
            }
        }
    }

    Ok(())
}
