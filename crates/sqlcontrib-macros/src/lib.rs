//! Procedural macros for sqlcontrib.
//!
//! `sqlcontrib-macros` turns a plain struct into an entity: it generates the
//! accessor table the proxy layer wraps and the name-based property access
//! the insert adapters bind parameters from. Everything is generated at
//! compile time; nothing is emitted or reflected at runtime.
//!
//! This macro is used by application crates via the `sqlcontrib` facade.

use proc_macro::TokenStream;
use quote::{ToTokens, quote};

mod parse;
mod validate;

use parse::{EntityDef, FieldDef, parse_entity};

/// Derive macro for the `Entity` and `PropertyAccess` traits.
///
/// The struct must have named fields and implement `Default`. Each field
/// type must be `Clone`, convertible into `Value`, and implement
/// `FromValue`.
///
/// # Attributes
///
/// - `#[contrib(table = "name")]` - Override the table name (defaults to the
///   pluralized snake_case struct name)
/// - `#[contrib(key)]` - Database-generated key column
/// - `#[contrib(explicit_key)]` - Key column assigned by the caller
/// - `#[contrib(write = false)]` - Never written on insert or update
/// - `#[contrib(computed)]` - Computed by the database, never written
/// - `#[contrib(column = "name")]` - Override the column name
///
/// Without any `key` or `explicit_key`, a field named `id` is the key.
///
/// # Example
///
/// ```ignore
/// use sqlcontrib::Entity;
///
/// #[derive(Entity, Default, Clone)]
/// #[contrib(table = "heroes")]
/// struct Hero {
///     #[contrib(key)]
///     id: Option<i64>,
///
///     name: String,
///
///     #[contrib(column = "secret")]
///     secret_name: String,
///
///     #[contrib(computed)]
///     power_level: Option<i32>,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(contrib))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    let entity = match parse_entity(&input) {
        Ok(e) => e,
        Err(e) => return e.to_compile_error().into(),
    };

    if let Err(e) = validate::validate_entity(&entity) {
        return e.to_compile_error().into();
    }

    let entity_impl = generate_entity_impl(&entity);
    let access_impl = generate_property_access_impl(&entity);
    quote! {
        #entity_impl
        #access_impl
    }
    .into()
}

/// Generate the `Entity` implementation: table name plus accessor table.
fn generate_entity_impl(entity: &EntityDef) -> proc_macro2::TokenStream {
    let name = &entity.name;
    let table_name = &entity.table_name;
    let (impl_generics, ty_generics, where_clause) = entity.generics.split_for_impl();

    let accessors = entity.fields.iter().map(|field| {
        let ident = &field.name;
        let info = generate_property_info(field);
        quote! {
            ::sqlcontrib_core::Accessor::new(
                #info,
                |e: &Self| ::sqlcontrib_core::Value::from(::std::clone::Clone::clone(&e.#ident)),
                |e: &mut Self, v: ::sqlcontrib_core::Value| {
                    e.#ident = ::sqlcontrib_core::FromValue::from_value(&v)?;
                    ::std::result::Result::Ok(())
                },
            )
        }
    });

    quote! {
        impl #impl_generics ::sqlcontrib_core::Entity for #name #ty_generics #where_clause {
            const TABLE_NAME: &'static str = #table_name;

            fn accessors() -> ::std::vec::Vec<::sqlcontrib_core::Accessor<Self>> {
                ::std::vec![#(#accessors),*]
            }
        }
    }
}

/// Generate the `PropertyInfo` builder chain for one field.
fn generate_property_info(field: &FieldDef) -> proc_macro2::TokenStream {
    let property = &field.property;
    let rust_type = field.ty.to_token_stream().to_string().replace(' ', "");

    let mut info = quote! { ::sqlcontrib_core::PropertyInfo::new(#property, #rust_type) };
    if field.column_name != field.property {
        let column = &field.column_name;
        info = quote! { #info.column(#column) };
    }
    if field.key {
        info = quote! { #info.key() };
    }
    if field.explicit_key {
        info = quote! { #info.explicit_key() };
    }
    if !field.write {
        info = quote! { #info.write(false) };
    }
    if field.computed {
        info = quote! { #info.computed() };
    }
    info
}

/// Generate the `PropertyAccess` implementation: match-based lookup by name.
fn generate_property_access_impl(entity: &EntityDef) -> proc_macro2::TokenStream {
    let name = &entity.name;
    let (impl_generics, ty_generics, where_clause) = entity.generics.split_for_impl();

    let properties: Vec<&String> = entity.fields.iter().map(|f| &f.property).collect();
    let idents: Vec<_> = entity.fields.iter().map(|f| &f.name).collect();

    quote! {
        impl #impl_generics ::sqlcontrib_core::PropertyAccess for #name #ty_generics #where_clause {
            fn get_value(
                &self,
                property: &str,
            ) -> ::sqlcontrib_core::Result<::sqlcontrib_core::Value> {
                match property {
                    #(
                        #properties => ::std::result::Result::Ok(
                            ::sqlcontrib_core::Value::from(::std::clone::Clone::clone(&self.#idents)),
                        ),
                    )*
                    other => ::std::result::Result::Err(::sqlcontrib_core::Error::Shape(
                        ::sqlcontrib_core::ShapeError::unknown_property(
                            ::std::any::type_name::<Self>(),
                            other,
                        ),
                    )),
                }
            }

            fn set_value(
                &mut self,
                property: &str,
                value: ::sqlcontrib_core::Value,
            ) -> ::sqlcontrib_core::Result<()> {
                match property {
                    #(
                        #properties => {
                            self.#idents = ::sqlcontrib_core::FromValue::from_value(&value)?;
                        }
                    )*
                    other => {
                        return ::std::result::Result::Err(::sqlcontrib_core::Error::Shape(
                            ::sqlcontrib_core::ShapeError::unknown_property(
                                ::std::any::type_name::<Self>(),
                                other,
                            ),
                        ));
                    }
                }
                ::std::result::Result::Ok(())
            }

            fn parameters(&self) -> ::std::vec::Vec<(&'static str, ::sqlcontrib_core::Value)> {
                ::std::vec![
                    #(
                        (#properties, ::sqlcontrib_core::Value::from(::std::clone::Clone::clone(&self.#idents))),
                    )*
                ]
            }
        }
    }
}
