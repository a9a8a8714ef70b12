//! selection set flattening
//!
//! every nested object shape in a selection tree (a field with a sub-selection,
//! or an inline fragment) is hoisted into a named [`FlattenModel`]. the returned
//! tree points at the model names instead of the schema type names.
//!
//! names are unique within one run only. flattening is single-shot: running it
//! again over a flattened tree renames again.

use crate::document::{Document, Fragment, Operation};
use crate::selection::{SelectionNode, SelectionSet};
use heck::ToPascalCase;
use serde::Serialize;
use std::collections::HashSet;

const INLINE_FRAGMENT_SUFFIX: &str = "InlineFragment";

/// model names that would shadow a root operation type
const RESERVED_MODEL_NAMES: [&str; 3] = ["Query", "Mutation", "Subscription"];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenModel {
    /// type the shape was selected on, before renaming
    pub schema_base_type: String,
    pub model_type: String,
    #[serde(flatten)]
    pub selection_set: SelectionSet,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenOperation {
    #[serde(flatten)]
    pub operation: Operation,
    pub inner_models: Vec<FlattenModel>,
    pub is_flatten: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenFragment {
    #[serde(flatten)]
    pub fragment: Fragment,
    pub inner_models: Vec<FlattenModel>,
    pub is_flatten: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenDocument {
    pub operations: Vec<FlattenOperation>,
    pub fragments: Vec<FlattenFragment>,
    pub has_operations: bool,
    pub has_fragments: bool,
}

/// state of one flattening run
struct Flattener {
    taken: HashSet<String>,
    models: Vec<FlattenModel>,
}

impl Flattener {
    fn new() -> Self {
        Self {
            taken: RESERVED_MODEL_NAMES.iter().map(|name| name.to_string()).collect(),
            models: Vec::new(),
        }
    }

    fn unique_name(&mut self, candidate: String) -> String {
        let mut name = candidate;
        while self.taken.contains(&name) {
            name.insert(0, '_');
        }
        self.taken.insert(name.clone());
        name
    }

    /// name the shape, reserve its slot, then flatten the children into it
    ///
    /// the slot is reserved before recursing so models come out in pre-order.
    fn hoist(&mut self, candidate: String, base_type: &str, set: &SelectionSet) -> (String, SelectionSet) {
        let model_type = self.unique_name(candidate);
        let slot = self.models.len();
        self.models.push(FlattenModel {
            schema_base_type: base_type.to_string(),
            model_type: model_type.clone(),
            selection_set: SelectionSet::default(),
        });

        let children = self.flatten(set);
        self.models[slot].selection_set = children.clone();
        (model_type, children)
    }

    fn flatten(&mut self, set: &SelectionSet) -> SelectionSet {
        let mut items = Vec::with_capacity(set.items.len());

        for node in &set.items {
            let node = match node {
                SelectionNode::Field(field) if !field.selection_set.is_empty() => {
                    let mut field = field.clone();
                    let (model_type, children) =
                        self.hoist(field.name.to_pascal_case(), &field.type_ref.name, &field.selection_set);
                    field.type_ref.name = model_type;
                    field.selection_set = children;
                    SelectionNode::Field(field)
                }
                SelectionNode::InlineFragment(fragment) => {
                    let mut fragment = fragment.clone();
                    let candidate = format!("{}{INLINE_FRAGMENT_SUFFIX}", fragment.on_type.to_pascal_case());
                    let (model_type, children) =
                        self.hoist(candidate, &fragment.on_type, &fragment.selection_set);
                    fragment.on_type = model_type;
                    fragment.selection_set = children;
                    SelectionNode::InlineFragment(fragment)
                }
                other => other.clone(),
            };
            items.push(node);
        }

        SelectionSet {
            items,
            has_typename: set.has_typename,
        }
    }
}

/// flatten one selection tree, returning the rewritten tree and its models
pub fn flatten_selection_set(set: &SelectionSet) -> (SelectionSet, Vec<FlattenModel>) {
    let mut flattener = Flattener::new();
    let tree = flattener.flatten(set);
    (tree, flattener.models)
}

pub fn flatten_operation(operation: &Operation) -> FlattenOperation {
    let (selection_set, inner_models) = flatten_selection_set(&operation.selection_set);
    FlattenOperation {
        operation: Operation {
            selection_set,
            ..operation.clone()
        },
        inner_models,
        is_flatten: true,
    }
}

pub fn flatten_fragment(fragment: &Fragment) -> FlattenFragment {
    let (selection_set, inner_models) = flatten_selection_set(&fragment.selection_set);
    FlattenFragment {
        fragment: Fragment {
            selection_set,
            ..fragment.clone()
        },
        inner_models,
        is_flatten: true,
    }
}

/// flatten every operation and fragment, each in its own naming scope
pub fn flatten_document(document: &Document) -> FlattenDocument {
    let operations: Vec<_> = document.operations.iter().map(flatten_operation).collect();
    let fragments: Vec<_> = document.fragments.iter().map(flatten_fragment).collect();
    FlattenDocument {
        has_operations: !operations.is_empty(),
        has_fragments: !fragments.is_empty(),
        operations,
        fragments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentSource, DocumentTransformer};
    use crate::selection::FieldSelection;
    use crate::testing::githunt_schema;

    fn document(content: &str) -> Document {
        let schema = githunt_schema();
        DocumentTransformer::new(&schema)
            .transform_source(&DocumentSource::new(content))
            .unwrap()
    }

    fn field(node: &SelectionNode) -> &FieldSelection {
        match node {
            SelectionNode::Field(field) => field,
            other => panic!("expected field, got {other:?}"),
        }
    }

    fn model_types(models: &[FlattenModel]) -> Vec<&str> {
        models.iter().map(|model| model.model_type.as_str()).collect()
    }

    #[test]
    fn test_colliding_names_get_underscore() {
        let doc = document(
            r#"query Q {
              test: currentUser { login }
              test2: entry(repoFullName: "a") { id }
              entry(repoFullName: "b") { postedBy { login } test: repository { name } }
            }"#,
        );
        let flat = flatten_operation(&doc.operations[0]);
        assert_eq!(
            model_types(&flat.inner_models),
            vec!["Test", "Test2", "Entry", "PostedBy", "_Test"]
        );
    }

    #[test]
    fn test_sibling_fields_with_same_name() {
        let doc = document(
            r#"query Q {
              entry(repoFullName: "a") {
                test: postedBy { login }
                test: repository { name }
              }
            }"#,
        );
        let flat = flatten_operation(&doc.operations[0]);
        assert_eq!(model_types(&flat.inner_models), vec!["Entry", "Test", "_Test"]);
        assert_eq!(flat.inner_models[1].schema_base_type, "User");
        assert_eq!(flat.inner_models[2].schema_base_type, "Repository");
    }

    #[test]
    fn test_each_operation_has_its_own_scope() {
        let doc = document(
            r#"
            query A { item: currentUser { login } }
            query B { item: entry(repoFullName: "a") { id } }
            "#,
        );
        let flat = flatten_document(&doc);
        assert_eq!(flat.operations[0].inner_models[0].model_type, "Item");
        assert_eq!(flat.operations[1].inner_models[0].model_type, "Item");
        assert!(flat.has_operations);
        assert!(!flat.has_fragments);
    }

    #[test]
    fn test_tree_points_at_models() {
        let doc = document(r#"query Q { entry(repoFullName: "a") { id score } }"#);
        let original = field(&doc.operations[0].selection_set.items[0]);
        assert_eq!(original.type_ref.name, "Entry");

        let flat = flatten_operation(&doc.operations[0]);
        let entry = field(&flat.operation.selection_set.items[0]);
        let model = &flat.inner_models[0];
        assert_eq!(entry.type_ref.name, model.model_type);
        assert_eq!(model.schema_base_type, "Entry");
        assert_eq!(model.selection_set.len(), 2);

        // input record is left as it was
        assert_eq!(field(&doc.operations[0].selection_set.items[0]).type_ref.name, "Entry");
    }

    #[test]
    fn test_inline_fragments_become_models() {
        let doc = document(
            r#"query Q {
              currentUser { ... on User { login } }
              entry(repoFullName: "a") { postedBy { ... on User { html_url } } }
            }"#,
        );
        let flat = flatten_operation(&doc.operations[0]);
        assert_eq!(
            model_types(&flat.inner_models),
            vec!["CurrentUser", "UserInlineFragment", "Entry", "PostedBy", "_UserInlineFragment"]
        );
        let user = field(&flat.operation.selection_set.items[0]);
        let SelectionNode::InlineFragment(on_user) = &user.selection_set.items[0] else {
            panic!("expected inline fragment");
        };
        assert_eq!(on_user.on_type, "UserInlineFragment");
        assert_eq!(flat.inner_models[1].schema_base_type, "User");
    }

    #[test]
    fn test_nested_models_see_rewritten_children() {
        let doc = document(r#"query Q { entry(repoFullName: "a") { repository { owner { login } } } }"#);
        let flat = flatten_operation(&doc.operations[0]);
        let entry = &flat.inner_models[0];
        let repository = field(&entry.selection_set.items[0]);
        assert_eq!(repository.type_ref.name, "Repository");
        assert_eq!(repository.type_ref.name, flat.inner_models[1].model_type);
        let owner = field(&flat.inner_models[1].selection_set.items[0]);
        assert_eq!(owner.type_ref.name, "Owner");
        assert_eq!(flat.inner_models[2].schema_base_type, "User");
    }

    #[test]
    fn test_root_type_names_are_reserved() {
        let doc = document("fragment F on Query { currentUser { ... on User { login } } }");
        let mut query = doc.fragments[0].selection_set.clone();
        if let SelectionNode::Field(field) = &mut query.items[0] {
            field.name = "query".to_string();
        }
        let (_, models) = flatten_selection_set(&query);
        assert_eq!(models[0].model_type, "_Query");
    }

    #[test]
    fn test_leaves_and_spreads_are_untouched() {
        let doc = document("fragment F on Entry { id ...Other postedBy { login } }");
        let flat = flatten_fragment(&doc.fragments[0]);
        assert_eq!(flat.inner_models.len(), 1);
        assert_eq!(flat.fragment.on_type, "Entry");
        let set = &flat.fragment.selection_set;
        assert_eq!(field(&set.items[0]).type_ref.name, "Int");
        assert!(matches!(&set.items[1], SelectionNode::FragmentSpread(spread) if spread.fragment_name == "Other"));
    }

    #[test]
    fn test_flattening_twice_renames_again() {
        let doc = document(r#"query Q { currentUser { ... on User { login } } }"#);
        let once = flatten_operation(&doc.operations[0]);
        let twice = flatten_operation(&once.operation);

        assert_eq!(model_types(&once.inner_models), vec!["CurrentUser", "UserInlineFragment"]);
        assert_eq!(
            model_types(&twice.inner_models),
            vec!["CurrentUser", "UserInlineFragmentInlineFragment"]
        );
        assert_eq!(once.inner_models[0].schema_base_type, "User");
        assert_eq!(twice.inner_models[0].schema_base_type, "CurrentUser");
    }

    #[test]
    fn test_serialized_flatten_document() {
        let doc = document(r#"query Q { currentUser { login } }"#);
        let json = serde_json::to_value(flatten_document(&doc)).unwrap();
        let operation = &json["operations"][0];
        assert_eq!(operation["isFlatten"], true);
        assert_eq!(operation["name"], "Q");
        assert_eq!(operation["fields"][0]["type"], "CurrentUser");
        let model = &operation["innerModels"][0];
        assert_eq!(model["schemaBaseType"], "User");
        assert_eq!(model["modelType"], "CurrentUser");
        assert_eq!(model["hasFields"], true);
        assert_eq!(model["fields"][0]["name"], "login");
    }
}
