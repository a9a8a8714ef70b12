//! shared fixtures for unit tests

use crate::schema::{Schema, TypeDef};
use graphql_parser::query::{parse_query, Definition, OperationDefinition, SelectionSet};

pub(crate) const GITHUNT_SDL: &str = include_str!("../tests/fixtures/githunt.graphql");

pub(crate) fn githunt_schema() -> Schema {
    Schema::parse(GITHUNT_SDL).expect("githunt schema")
}

/// parse a single query operation and return the query root with its selection set
pub(crate) fn root_selection<'s>(
    schema: &'s Schema,
    query: &'static str,
) -> (&'s TypeDef, SelectionSet<'static, String>) {
    let document = parse_query::<String>(query).expect("query");
    let set = match document.definitions.into_iter().next() {
        Some(Definition::Operation(OperationDefinition::SelectionSet(set))) => set,
        Some(Definition::Operation(OperationDefinition::Query(query))) => query.selection_set,
        other => panic!("expected a query, got {other:?}"),
    };
    let root = schema.get_type("Query").expect("query root");
    (root, set)
}
