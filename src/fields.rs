//! fields and arguments
//!
//! resolves schema fields, input fields, and arguments into records carrying
//! their flattened type reference, category, and directive uses.

use crate::directives::{deprecation, directive_uses, DirectiveUseMap};
use crate::error::Result;
use crate::kind::{classify_named, TypeKind};
use crate::schema::{FieldDef, InputValueDef, Schema};
use crate::type_ref::{resolve_type, TypeReference};
use serde::Serialize;

/// argument of a field or directive
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Argument {
    pub name: String,
    pub description: String,
    #[serde(flatten)]
    pub type_ref: TypeReference,
    #[serde(flatten)]
    pub kind: TypeKind,
    pub directives: DirectiveUseMap,
    pub uses_directives: bool,
    pub default_value: Option<serde_json::Value>,
    pub has_default_value: bool,
}

/// output field or input object field
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    pub description: String,
    #[serde(flatten)]
    pub type_ref: TypeReference,
    #[serde(flatten)]
    pub kind: TypeKind,
    pub arguments: Vec<Argument>,
    pub has_arguments: bool,
    pub directives: DirectiveUseMap,
    pub uses_directives: bool,
    /// input fields only
    pub default_value: Option<serde_json::Value>,
    pub has_default_value: bool,
    pub is_deprecated: bool,
    pub deprecation_reason: Option<String>,
}

pub fn resolve_argument(schema: &Schema, arg: &InputValueDef) -> Result<Argument> {
    let type_ref = resolve_type(&arg.ty);
    let kind = classify_named(schema, &type_ref.name)?;
    let directives = directive_uses(schema, &arg.directives);

    Ok(Argument {
        name: arg.name.clone(),
        description: arg.description.clone().unwrap_or_default(),
        type_ref,
        kind,
        uses_directives: !directives.is_empty(),
        directives,
        has_default_value: arg.default_value.is_some(),
        default_value: arg.default_value.clone(),
    })
}

pub fn resolve_arguments(schema: &Schema, args: &[InputValueDef]) -> Result<Vec<Argument>> {
    args.iter().map(|arg| resolve_argument(schema, arg)).collect()
}

pub fn resolve_field(schema: &Schema, field: &FieldDef) -> Result<Field> {
    let type_ref = resolve_type(&field.ty);
    let kind = classify_named(schema, &type_ref.name)?;
    let arguments = resolve_arguments(schema, &field.arguments)?;
    let directives = directive_uses(schema, &field.directives);
    let (is_deprecated, deprecation_reason) = deprecation(&directives);

    Ok(Field {
        name: field.name.clone(),
        description: field.description.clone().unwrap_or_default(),
        type_ref,
        kind,
        has_arguments: !arguments.is_empty(),
        arguments,
        uses_directives: !directives.is_empty(),
        directives,
        default_value: None,
        has_default_value: false,
        is_deprecated,
        deprecation_reason,
    })
}

pub fn resolve_fields(schema: &Schema, fields: &[FieldDef]) -> Result<Vec<Field>> {
    fields.iter().map(|field| resolve_field(schema, field)).collect()
}

pub fn resolve_input_field(schema: &Schema, field: &InputValueDef) -> Result<Field> {
    let arg = resolve_argument(schema, field)?;
    let (is_deprecated, deprecation_reason) = deprecation(&arg.directives);

    Ok(Field {
        name: arg.name,
        description: arg.description,
        type_ref: arg.type_ref,
        kind: arg.kind,
        arguments: Vec::new(),
        has_arguments: false,
        directives: arg.directives,
        uses_directives: arg.uses_directives,
        default_value: arg.default_value,
        has_default_value: arg.has_default_value,
        is_deprecated,
        deprecation_reason,
    })
}

pub fn resolve_input_fields(schema: &Schema, fields: &[InputValueDef]) -> Result<Vec<Field>> {
    fields
        .iter()
        .map(|field| resolve_input_field(schema, field))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    const SDL: &str = r#"
        directive @upper on FIELD_DEFINITION | ARGUMENT_DEFINITION

        type Query { test: Int }

        type B { f: String }
        enum Sort { ASC, DESC }

        type A {
          "first field"
          f1: String
          f2(t: String, limit: Int = 10 @upper): [B!]!
          f3: B @upper
          f4: Sort @deprecated(reason: "use f5")
          f5(sort: [Sort]!): Int
        }

        input Filter {
          term: String = "all"
          tags: [String!]
        }

        type Broken { f: Missing }
    "#;

    fn schema() -> Schema {
        Schema::parse(SDL).unwrap()
    }

    fn fields(name: &str) -> Vec<Field> {
        let schema = schema();
        let ty = schema.get_type(name).unwrap();
        resolve_fields(&schema, ty.fields()).unwrap()
    }

    #[test]
    fn test_primitive_field() {
        let result = fields("A");
        assert_eq!(result.len(), 5);
        let f1 = &result[0];
        assert_eq!(f1.name, "f1");
        assert_eq!(f1.description, "first field");
        assert_eq!(f1.type_ref.name, "String");
        assert!(!f1.type_ref.is_required);
        assert!(!f1.type_ref.is_array);
        assert!(f1.arguments.is_empty());
        assert!(!f1.has_arguments);
        assert_eq!(f1.kind, TypeKind::Scalar);
    }

    #[test]
    fn test_field_with_arguments() {
        let result = fields("A");
        let f2 = &result[1];
        assert!(f2.has_arguments);
        assert_eq!(f2.arguments.len(), 2);
        assert_eq!(f2.type_ref.name, "B");
        assert!(f2.type_ref.is_array);
        assert!(f2.type_ref.is_required);
        assert!(!f2.type_ref.is_nullable_array);
        assert_eq!(f2.kind, TypeKind::Object);

        let t = &f2.arguments[0];
        assert_eq!(t.name, "t");
        assert_eq!(t.description, "");
        assert!(!t.has_default_value);
        assert!(!t.uses_directives);

        let limit = &f2.arguments[1];
        assert!(limit.has_default_value);
        assert_eq!(limit.default_value, Some(json!(10)));
        assert!(limit.uses_directives);
        assert_eq!(limit.directives.get("upper"), Some(&json!({})));
    }

    #[test]
    fn test_field_directives_and_deprecation() {
        let result = fields("A");
        assert!(result[2].uses_directives);
        assert!(!result[2].is_deprecated);

        let f4 = &result[3];
        assert_eq!(f4.kind, TypeKind::Enum);
        assert!(f4.is_deprecated);
        assert_eq!(f4.deprecation_reason.as_deref(), Some("use f5"));
    }

    #[test]
    fn test_enum_list_argument() {
        let result = fields("A");
        let sort = &result[4].arguments[0];
        assert_eq!(sort.kind, TypeKind::Enum);
        assert!(sort.type_ref.is_array);
        assert!(sort.type_ref.is_required);
        assert!(sort.type_ref.is_nullable_array);
    }

    #[test]
    fn test_input_fields() {
        let schema = schema();
        let filter = schema.get_type("Filter").unwrap();
        let result = resolve_input_fields(&schema, filter.input_fields()).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result[0].has_default_value);
        assert_eq!(result[0].default_value, Some(json!("all")));
        assert!(!result[0].has_arguments);
        assert_eq!(result[1].type_ref.raw, "[String!]");
    }

    #[test]
    fn test_unknown_field_type() {
        let schema = schema();
        let broken = schema.get_type("Broken").unwrap();
        let err = resolve_fields(&schema, broken.fields()).unwrap_err();
        assert!(matches!(err, Error::UnknownType(name) if name == "Missing"));
    }

    #[test]
    fn test_serialized_shape() {
        let result = fields("A");
        let json = serde_json::to_value(&result[1]).unwrap();
        assert_eq!(json["name"], "f2");
        assert_eq!(json["type"], "B");
        assert_eq!(json["raw"], "[B!]!");
        assert_eq!(json["isArray"], true);
        assert_eq!(json["dimensionOfArray"], 1);
        assert_eq!(json["isType"], true);
        assert_eq!(json["hasArguments"], true);
        assert_eq!(json["arguments"][1]["defaultValue"], 10);
    }
}
