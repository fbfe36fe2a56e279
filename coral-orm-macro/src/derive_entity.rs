use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Expr, Fields, LitInt, LitStr, Path};

use crate::types::{is_option, rust_type_to_kind, Kind};

/// Options collected from the `#[orm(...)]` attributes of one field.
#[derive(Default)]
struct FieldOptions {
    primary_key: bool,
    column: Option<String>,
    size: Option<u32>,
    text: bool,
    default_fn: Option<Path>,
    default_value: Option<Expr>,
}

impl FieldOptions {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut options = Self::default();

        for attr in attrs {
            if !attr.path().is_ident("orm") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("primary_key") {
                    options.primary_key = true;
                } else if meta.path.is_ident("column") {
                    let value: LitStr = meta.value()?.parse()?;
                    options.column = Some(value.value());
                } else if meta.path.is_ident("size") {
                    let value: LitInt = meta.value()?.parse()?;
                    options.size = Some(value.base10_parse::<u32>()?);
                } else if meta.path.is_ident("text") {
                    options.text = true;
                } else if meta.path.is_ident("default") {
                    let value: LitStr = meta.value()?.parse()?;
                    options.default_fn = Some(value.parse()?);
                } else if meta.path.is_ident("default_value") {
                    options.default_value = Some(meta.value()?.parse()?);
                } else {
                    return Err(meta.error("unsupported orm attribute"));
                }
                Ok(())
            })?;
        }

        if options.default_fn.is_some() && options.default_value.is_some() {
            return Err(syn::Error::new(
                proc_macro2::Span::call_site(),
                "`default` and `default_value` cannot be combined",
            ));
        }
        Ok(options)
    }
}

fn parse_table(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut table = None;
    for attr in attrs {
        if attr.path().is_ident("orm") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("table") {
                    let value: LitStr = meta.value()?.parse()?;
                    table = Some(value.value());
                    Ok(())
                } else {
                    Err(meta.error("unsupported orm attribute, expected `table`"))
                }
            })?;
        }
    }
    Ok(table)
}

/// Expands the `#[derive(Entity)]` macro.
///
/// Generates the `impl Entity` block: the field descriptors in declaration
/// order, the cached metadata, by-name getters and setters, and `from_row`.
pub fn expand(ast: DeriveInput) -> syn::Result<TokenStream> {
    let struct_name = &ast.ident;

    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(&ast.generics, "Entity cannot be derived for generic structs"));
    }

    let fields = match &ast.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => return Err(syn::Error::new_spanned(struct_name, "Entity must have named fields")),
        },
        _ => return Err(syn::Error::new_spanned(struct_name, "Entity must be a struct")),
    };

    let table = parse_table(&ast.attrs)?.map(|t| quote! { .table(#t) });
    let entity_name = struct_name.to_string();

    let mut descriptors = Vec::new();
    let mut getters = Vec::new();
    let mut setters = Vec::new();
    let mut hydrate = Vec::new();

    for f in fields {
        let Some(ident) = &f.ident else { continue };
        let raw_name = ident.to_string();
        let name = raw_name.strip_prefix("r#").unwrap_or(&raw_name).to_string();
        let options = FieldOptions::parse(&f.attrs)?;

        let kind = rust_type_to_kind(&f.ty)
            .ok_or_else(|| syn::Error::new_spanned(&f.ty, "unsupported entity field type"))?;
        if options.text && kind != Kind::String {
            return Err(syn::Error::new_spanned(&f.ty, "`text` requires a String field"));
        }
        if options.primary_key && (kind == Kind::Boolean || options.text) {
            return Err(syn::Error::new_spanned(&f.ty, "boolean and text fields cannot be the primary key"));
        }
        if (options.default_fn.is_some() || options.default_value.is_some()) && !is_option(&f.ty) {
            return Err(syn::Error::new_spanned(&f.ty, "`default` requires an Option<T> field"));
        }

        let mut descriptor = match kind {
            Kind::String if options.text => quote! { coral_orm::Field::text(#name) },
            Kind::String => quote! { coral_orm::Field::string(#name) },
            Kind::Boolean => quote! { coral_orm::Field::boolean(#name) },
            Kind::Integer => quote! { coral_orm::Field::integer(#name) },
            Kind::Float => quote! { coral_orm::Field::float(#name) },
        };
        if let Some(size) = options.size {
            descriptor = quote! { #descriptor.width(#size) };
        }
        if let Some(column) = &options.column {
            descriptor = quote! { #descriptor.column(#column) };
        }
        if options.primary_key {
            descriptor = quote! { #descriptor.primary_key() };
        }
        if let Some(path) = &options.default_fn {
            descriptor = quote! { #descriptor.default_with(#path) };
        }
        if let Some(expr) = &options.default_value {
            descriptor = quote! { #descriptor.default_value(#expr) };
        }
        descriptors.push(descriptor);

        let column = options.column.unwrap_or_else(|| name.clone());
        getters.push(quote! {
            #name => Ok(coral_orm::ToValue::to_value(&self.#ident)),
        });
        setters.push(quote! {
            #name => {
                self.#ident = value.decode(#name)?;
                Ok(())
            }
        });
        hydrate.push(quote! {
            #ident: row.decode(#column)?,
        });
    }

    Ok(quote! {
        impl coral_orm::Entity for #struct_name {
            fn schema() -> coral_orm::EntitySchema {
                coral_orm::EntitySchema::new(#entity_name)
                    #table
                    #(.field(#descriptors))*
            }

            fn meta() -> Result<&'static coral_orm::EntityMeta, coral_orm::SchemaError> {
                static META: std::sync::OnceLock<Result<coral_orm::EntityMeta, coral_orm::SchemaError>> =
                    std::sync::OnceLock::new();
                META.get_or_init(|| <Self as coral_orm::Entity>::schema().build()).as_ref().map_err(Clone::clone)
            }

            fn value(&self, key: &str) -> Result<coral_orm::Value, coral_orm::Error> {
                match key {
                    #(#getters)*
                    _ => Err(coral_orm::Error::AttributeNotFound(key.to_string())),
                }
            }

            fn set_value(&mut self, key: &str, value: coral_orm::Value) -> Result<(), coral_orm::Error> {
                match key {
                    #(#setters)*
                    _ => Err(coral_orm::Error::AttributeNotFound(key.to_string())),
                }
            }

            fn from_row(row: &coral_orm::Row) -> Result<Self, coral_orm::Error> {
                Ok(Self {
                    #(#hydrate)*
                })
            }
        }
    })
}
