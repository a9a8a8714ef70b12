//! type categories
//!
//! every named type falls into exactly one of six categories. the category is
//! decided once from the type's capabilities and carried as [`TypeKind`].

use crate::error::{Error, Result};
use crate::schema::{Schema, TypeDef};
use serde::{Serialize, Serializer};

/// closed set of graphql type categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Scalar,
    Enum,
    Object,
    InputObject,
    Interface,
    Union,
}

/// boolean view of a [`TypeKind`], exactly one flag is set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeIndicators {
    pub is_scalar: bool,
    pub is_enum: bool,
    pub is_type: bool,
    pub is_input_type: bool,
    pub is_interface: bool,
    pub is_union: bool,
}

impl TypeKind {
    pub fn indicators(self) -> TypeIndicators {
        TypeIndicators {
            is_scalar: self == TypeKind::Scalar,
            is_enum: self == TypeKind::Enum,
            is_type: self == TypeKind::Object,
            is_input_type: self == TypeKind::InputObject,
            is_interface: self == TypeKind::Interface,
            is_union: self == TypeKind::Union,
        }
    }
}

impl Serialize for TypeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.indicators().serialize(serializer)
    }
}

/// classify a named type by what it can do
///
/// precedence keeps the categories exclusive: enums before other leaves,
/// abstract types before plain field holders.
pub fn classify(ty: &TypeDef) -> Result<TypeKind> {
    if ty.has_enum_values() {
        Ok(TypeKind::Enum)
    } else if ty.is_leaf() {
        Ok(TypeKind::Scalar)
    } else if ty.is_abstract() && ty.has_fields() {
        Ok(TypeKind::Interface)
    } else if ty.is_abstract() && ty.has_members() {
        Ok(TypeKind::Union)
    } else if ty.has_fields() && !ty.has_interfaces() {
        Ok(TypeKind::InputObject)
    } else if ty.has_fields() && ty.has_interfaces() {
        Ok(TypeKind::Object)
    } else {
        Err(Error::Classification(ty.name.clone()))
    }
}

/// look up a named type and classify it
pub fn classify_named(schema: &Schema, name: &str) -> Result<TypeKind> {
    let ty = schema
        .get_type(name)
        .ok_or_else(|| Error::UnknownType(name.to_string()))?;
    classify(ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SDL: &str = r#"
        type Query { test: Int }
        interface A { f: String }
        scalar B
        enum C { V1, V2 }
        input D { f: String }
        type E implements A { f: String }
        type F { f: String }
        union G = E | F
    "#;

    fn kind(name: &str) -> TypeKind {
        let schema = Schema::parse(SDL).unwrap();
        classify_named(&schema, name).unwrap()
    }

    #[test]
    fn test_each_category() {
        assert_eq!(kind("A"), TypeKind::Interface);
        assert_eq!(kind("B"), TypeKind::Scalar);
        assert_eq!(kind("C"), TypeKind::Enum);
        assert_eq!(kind("D"), TypeKind::InputObject);
        assert_eq!(kind("E"), TypeKind::Object);
        assert_eq!(kind("F"), TypeKind::Object);
        assert_eq!(kind("G"), TypeKind::Union);
        assert_eq!(kind("String"), TypeKind::Scalar);
    }

    #[test]
    fn test_exactly_one_indicator() {
        let schema = Schema::parse(SDL).unwrap();
        for ty in schema.type_map().values() {
            let indicators = classify(ty).unwrap().indicators();
            let set = [
                indicators.is_scalar,
                indicators.is_enum,
                indicators.is_type,
                indicators.is_input_type,
                indicators.is_interface,
                indicators.is_union,
            ]
            .iter()
            .filter(|flag| **flag)
            .count();
            assert_eq!(set, 1, "{}", ty.name);
        }
    }

    #[test]
    fn test_unknown_type() {
        let schema = Schema::parse(SDL).unwrap();
        let err = classify_named(&schema, "Nope").unwrap_err();
        assert!(matches!(err, Error::UnknownType(_)));
    }

    #[test]
    fn test_serializes_as_indicators() {
        let json = serde_json::to_value(TypeKind::InputObject).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "isScalar": false,
                "isEnum": false,
                "isType": false,
                "isInputType": true,
                "isInterface": false,
                "isUnion": false,
            })
        );
    }
}
