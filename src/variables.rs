//! operation variables

use crate::error::Result;
use crate::kind::{classify_named, TypeKind};
use crate::schema::{value_to_json, Schema};
use crate::type_ref::{resolve_type, TypeRef, TypeReference};
use graphql_parser::query::VariableDefinition;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub name: String,
    /// variables carry no description in executable documents
    pub description: String,
    #[serde(flatten)]
    pub type_ref: TypeReference,
    #[serde(flatten)]
    pub kind: TypeKind,
    pub default_value: Option<serde_json::Value>,
    pub has_default_value: bool,
}

pub fn resolve_variable(schema: &Schema, def: &VariableDefinition<'_, String>) -> Result<Variable> {
    let type_ref = resolve_type(&TypeRef::from(&def.var_type));
    let kind = classify_named(schema, &type_ref.name)?;
    let default_value = def.default_value.as_ref().map(value_to_json);

    Ok(Variable {
        name: def.name.clone(),
        description: String::new(),
        type_ref,
        kind,
        has_default_value: default_value.is_some(),
        default_value,
    })
}

pub fn resolve_variables(
    schema: &Schema,
    defs: &[VariableDefinition<'_, String>],
) -> Result<Vec<Variable>> {
    defs.iter().map(|def| resolve_variable(schema, def)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testing::githunt_schema;
    use graphql_parser::query::{parse_query, Definition, OperationDefinition};

    fn variables(query: &'static str) -> Result<Vec<Variable>> {
        let schema = githunt_schema();
        let document = parse_query::<String>(query).unwrap();
        let defs = match &document.definitions[0] {
            Definition::Operation(OperationDefinition::Query(query)) => &query.variable_definitions,
            Definition::Operation(OperationDefinition::Mutation(mutation)) => {
                &mutation.variable_definitions
            }
            _ => panic!("expected an operation with variables"),
        };
        resolve_variables(&schema, defs)
    }

    #[test]
    fn test_scalar_and_enum_variables() {
        let result = variables(
            "query Feed($type: FeedType!, $offset: Int = 0, $ids: [Int!]) { feed(type: $type) { id } }",
        )
        .unwrap();
        assert_eq!(result.len(), 3);

        assert_eq!(result[0].name, "type");
        assert_eq!(result[0].kind, TypeKind::Enum);
        assert!(result[0].type_ref.is_required);
        assert!(!result[0].has_default_value);

        assert_eq!(result[1].kind, TypeKind::Scalar);
        assert!(result[1].has_default_value);
        assert_eq!(result[1].default_value, Some(serde_json::json!(0)));

        assert!(result[2].type_ref.is_array);
        assert!(!result[2].type_ref.is_nullable_array);
        assert_eq!(result[2].type_ref.dimension_of_array, 1);
    }

    #[test]
    fn test_no_variables() {
        let result = variables("query Me { currentUser { login } }").unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_unknown_variable_type() {
        let err = variables("mutation M($input: Missing) { submitRepository(repoFullName: \"a\") { id } }")
            .unwrap_err();
        assert!(matches!(err, Error::UnknownType(name) if name == "Missing"));
    }
}
