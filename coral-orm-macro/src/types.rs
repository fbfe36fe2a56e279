use syn::{GenericArgument, PathArguments, Type};

/// Column kinds a Rust field type can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    Boolean,
    Integer,
    Float,
}

/// Whether the field type is `Option<T>`, the only shape that can be unset.
pub fn is_option(ty: &Type) -> bool {
    let Type::Path(type_path) = ty else {
        return false;
    };
    type_path.path.segments.last().is_some_and(|segment| segment.ident == "Option")
}

/// Maps a Rust type to its column kind, looking through `Option<T>`.
///
/// Returns `None` for types coral-orm cannot store.
pub fn rust_type_to_kind(ty: &Type) -> Option<Kind> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    let type_name = segment.ident.to_string();

    if type_name == "Option" {
        if let PathArguments::AngleBracketed(args) = &segment.arguments {
            if let Some(GenericArgument::Type(inner_ty)) = args.args.first() {
                return rust_type_to_kind(inner_ty);
            }
        }
        return None;
    }

    match type_name.as_str() {
        "String" => Some(Kind::String),
        "bool" => Some(Kind::Boolean),
        "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" => Some(Kind::Integer),
        "f32" | "f64" => Some(Kind::Float),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    #[test]
    fn maps_primitives_and_looks_through_option() {
        assert_eq!(rust_type_to_kind(&parse_quote!(String)), Some(Kind::String));
        assert_eq!(rust_type_to_kind(&parse_quote!(Option<bool>)), Some(Kind::Boolean));
        assert_eq!(rust_type_to_kind(&parse_quote!(std::option::Option<i32>)), Some(Kind::Integer));
        assert_eq!(rust_type_to_kind(&parse_quote!(f32)), Some(Kind::Float));
        assert_eq!(rust_type_to_kind(&parse_quote!(Vec<u8>)), None);
        assert_eq!(rust_type_to_kind(&parse_quote!(&str)), None);
    }

    #[test]
    fn detects_option() {
        assert!(is_option(&parse_quote!(Option<String>)));
        assert!(is_option(&parse_quote!(std::option::Option<f64>)));
        assert!(!is_option(&parse_quote!(String)));
        assert!(!is_option(&parse_quote!(i64)));
    }
}
