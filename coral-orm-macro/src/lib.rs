//! # coral-orm-macro
//!
//! Procedural macros for coral-orm. `#[derive(Entity)]` turns a struct with
//! named fields into an entity: it declares one field descriptor per struct
//! field and generates by-name attribute access and row hydration.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod derive_entity;
mod types;

/// Derives `coral_orm::Entity`.
///
/// Struct attribute: `#[orm(table = "users")]`.
///
/// Field attributes:
/// * `primary_key`
/// * `column = "name"` - column name when it differs from the field name
/// * `size = 50` - varchar width of string fields
/// * `text` - store a string field in a `text` column
/// * `default = "path::to::producer"` - zero-argument function producing the default
/// * `default_value = <expr>` - literal default
#[proc_macro_derive(Entity, attributes(orm))]
pub fn entity_derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    derive_entity::expand(ast).unwrap_or_else(syn::Error::into_compile_error).into()
}
