//! type references
//!
//! a graphql type reference is a named type wrapped in list and non-null
//! combinators. [`resolve_type`] walks that structure once and flattens it
//! into the attributes emitters care about.

use graphql_parser::schema::Type;
use serde::Serialize;
use std::fmt;

/// graphql type expression, e.g. `[String!]!`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    /// name of the named type after stripping every wrapper
    pub fn name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.name(),
        }
    }

    /// parse bracket/bang notation such as `[[String!]!]!`
    ///
    /// returns `None` for malformed input.
    pub fn parse(input: &str) -> Option<TypeRef> {
        let input = input.trim();
        if let Some(inner) = input.strip_suffix('!') {
            let inner = TypeRef::parse(inner)?;
            if matches!(inner, TypeRef::NonNull(_)) {
                return None;
            }
            return Some(TypeRef::non_null(inner));
        }
        if let Some(rest) = input.strip_prefix('[') {
            let inner = rest.strip_suffix(']')?;
            return TypeRef::parse(inner).map(TypeRef::list);
        }
        let valid = !input.is_empty()
            && input
                .chars()
                .all(|ch| ch == '_' || ch.is_ascii_alphanumeric())
            && !input.starts_with(|ch: char| ch.is_ascii_digit());
        valid.then(|| TypeRef::named(input))
    }

    fn list_dimension(&self) -> i32 {
        match self {
            TypeRef::Named(_) => 0,
            TypeRef::NonNull(inner) => inner.list_dimension(),
            TypeRef::List(inner) => 1 + inner.list_dimension(),
        }
    }

    /// true if some list wrapper holds a non-null element
    fn has_required_element(&self) -> bool {
        match self {
            TypeRef::Named(_) => false,
            TypeRef::NonNull(inner) => inner.has_required_element(),
            TypeRef::List(inner) => {
                matches!(**inner, TypeRef::NonNull(_)) || inner.has_required_element()
            }
        }
    }
}

impl<'a> From<&Type<'a, String>> for TypeRef {
    fn from(ty: &Type<'a, String>) -> Self {
        match ty {
            Type::NamedType(name) => TypeRef::Named(name.clone()),
            Type::ListType(inner) => TypeRef::list(TypeRef::from(inner.as_ref())),
            Type::NonNullType(inner) => TypeRef::non_null(TypeRef::from(inner.as_ref())),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// flat view of a type reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeReference {
    /// named type, or the synthesized model name once flattened
    #[serde(rename = "type")]
    pub name: String,
    /// full bracket/bang notation
    pub raw: String,
    pub is_required: bool,
    pub is_array: bool,
    pub is_nullable_array: bool,
    /// number of list wrappers, `-1` when not a list
    pub dimension_of_array: i32,
}

/// resolve a type reference into its flat attributes
pub fn resolve_type(ty: &TypeRef) -> TypeReference {
    let dimension = ty.list_dimension();
    let is_array = dimension > 0;

    TypeReference {
        name: ty.name().to_string(),
        raw: ty.to_string(),
        is_required: matches!(ty, TypeRef::NonNull(_)),
        is_array,
        is_nullable_array: is_array && !ty.has_required_element(),
        dimension_of_array: if is_array { dimension } else { -1 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(raw: &str) -> TypeReference {
        resolve_type(&TypeRef::parse(raw).unwrap())
    }

    #[test]
    fn test_nested_required_list() {
        let result = resolve("[[String!]!]!");
        assert_eq!(result.name, "String");
        assert_eq!(result.raw, "[[String!]!]!");
        assert!(result.is_required);
        assert!(result.is_array);
        assert_eq!(result.dimension_of_array, 2);
        assert!(!result.is_nullable_array);
    }

    #[test]
    fn test_nullable_list() {
        let result = resolve("[String]");
        assert!(result.is_array);
        assert!(!result.is_required);
        assert!(result.is_nullable_array);
        assert_eq!(result.dimension_of_array, 1);
    }

    #[test]
    fn test_required_scalar() {
        let result = resolve("String!");
        assert!(!result.is_array);
        assert!(result.is_required);
        assert!(!result.is_nullable_array);
        assert_eq!(result.dimension_of_array, -1);
    }

    #[test]
    fn test_optional_scalar() {
        let result = resolve("String");
        assert_eq!(result.raw, "String");
        assert!(!result.is_array);
        assert!(!result.is_required);
        assert!(!result.is_nullable_array);
    }

    #[test]
    fn test_required_list_of_nullable() {
        let result = resolve("[String]!");
        assert!(result.is_array);
        assert!(result.is_required);
        assert!(result.is_nullable_array);
    }

    #[test]
    fn test_nullable_array_matches_textual_rule() {
        for raw in [
            "[String]",
            "[String!]",
            "[[String]!]",
            "[[String!]]",
            "[[String]]!",
            "[[[Int!]]]",
            "Int",
        ] {
            let result = resolve(raw);
            let textual = raw.contains('[') && !raw.contains("!]");
            assert_eq!(result.is_nullable_array, textual, "{raw}");
            let leading = raw.chars().take_while(|ch| *ch == '[').count() as i32;
            let expected = if result.is_array { leading } else { -1 };
            assert_eq!(result.dimension_of_array, expected, "{raw}");
            assert_eq!(result.is_required, raw.ends_with('!'), "{raw}");
        }
    }

    #[test]
    fn test_parse_and_display() {
        let ty = TypeRef::parse("[[String!]!]!").unwrap();
        assert_eq!(
            ty,
            TypeRef::non_null(TypeRef::list(TypeRef::non_null(TypeRef::list(
                TypeRef::non_null(TypeRef::named("String"))
            ))))
        );
        assert_eq!(ty.to_string(), "[[String!]!]!");
        assert_eq!(ty.name(), "String");

        assert!(TypeRef::parse("").is_none());
        assert!(TypeRef::parse("[String").is_none());
        assert!(TypeRef::parse("String!!").is_none());
    }

    #[test]
    fn test_from_parser_type() {
        let ty: Type<'static, String> = Type::NonNullType(Box::new(Type::ListType(Box::new(
            Type::NamedType("Entry".to_string()),
        ))));
        let converted = TypeRef::from(&ty);
        assert_eq!(converted.to_string(), "[Entry]!");
    }
}
