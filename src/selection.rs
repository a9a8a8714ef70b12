//! selection sets
//!
//! resolves an executable selection set against the schema. fields, inline
//! fragments, and fragment spreads are all first-class nodes and are handled
//! the same way at every depth.

use crate::directives::{directive_uses, DirectiveUseMap};
use crate::error::{Error, Result};
use crate::fields::{resolve_arguments, Argument};
use crate::kind::{classify, TypeKind};
use crate::schema::{convert_directives, Schema, TypeDef};
use crate::type_ref::{resolve_type, TypeReference};
use graphql_parser::query::{
    Field as AstField, FragmentSpread as AstFragmentSpread, InlineFragment as AstInlineFragment,
    Selection, SelectionSet as AstSelectionSet, TypeCondition,
};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// meta field reported through `hasTypename` instead of a field node
pub const TYPENAME_FIELD: &str = "__typename";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind")]
pub enum SelectionNode {
    Field(FieldSelection),
    InlineFragment(InlineFragmentSelection),
    FragmentSpread(FragmentSpreadSelection),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSelection {
    /// response key: the alias when present, otherwise the field name
    pub name: String,
    pub field_name: String,
    pub alias: Option<String>,
    #[serde(flatten)]
    pub type_ref: TypeReference,
    #[serde(flatten)]
    pub kind: TypeKind,
    /// arguments declared by the schema field
    pub arguments: Vec<Argument>,
    pub has_arguments: bool,
    /// directives applied in the document
    pub directives: DirectiveUseMap,
    pub uses_directives: bool,
    #[serde(flatten)]
    pub selection_set: SelectionSet,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineFragmentSelection {
    pub on_type: String,
    pub directives: DirectiveUseMap,
    pub uses_directives: bool,
    #[serde(flatten)]
    pub selection_set: SelectionSet,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentSpreadSelection {
    pub fragment_name: String,
    pub directives: DirectiveUseMap,
    pub uses_directives: bool,
}

/// ordered selection nodes of one level
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    pub items: Vec<SelectionNode>,
    /// `__typename` was requested at this level
    pub has_typename: bool,
}

/// one level of a selection set bucketed by node kind
#[derive(Debug, Clone, Default)]
pub struct SeparatedSelection<'a> {
    pub fields: Vec<&'a FieldSelection>,
    pub fragments_spread: Vec<&'a FragmentSpreadSelection>,
    pub inline_fragments: Vec<&'a InlineFragmentSelection>,
}

impl SeparatedSelection<'_> {
    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }

    pub fn has_fragments_spread(&self) -> bool {
        !self.fragments_spread.is_empty()
    }

    pub fn has_inline_fragments(&self) -> bool {
        !self.inline_fragments.is_empty()
    }
}

impl SelectionSet {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// bucket the direct children in a single pass
    pub fn separate(&self) -> SeparatedSelection<'_> {
        let mut separated = SeparatedSelection::default();
        for item in &self.items {
            match item {
                SelectionNode::Field(field) => separated.fields.push(field),
                SelectionNode::InlineFragment(fragment) => separated.inline_fragments.push(fragment),
                SelectionNode::FragmentSpread(spread) => separated.fragments_spread.push(spread),
            }
        }
        separated
    }
}

impl Serialize for SelectionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let separated = self.separate();
        let mut map = serializer.serialize_map(Some(8))?;
        map.serialize_entry("selectionSet", &self.items)?;
        map.serialize_entry("fields", &separated.fields)?;
        map.serialize_entry("fragmentsSpread", &separated.fragments_spread)?;
        map.serialize_entry("inlineFragments", &separated.inline_fragments)?;
        map.serialize_entry("hasFields", &separated.has_fields())?;
        map.serialize_entry("hasFragmentsSpread", &separated.has_fragments_spread())?;
        map.serialize_entry("hasInlineFragments", &separated.has_inline_fragments())?;
        map.serialize_entry("hasTypename", &self.has_typename)?;
        map.end()
    }
}

/// resolve `set` as a selection on `parent`
pub fn build_selection_set(
    schema: &Schema,
    parent: &TypeDef,
    set: &AstSelectionSet<'_, String>,
) -> Result<SelectionSet> {
    let mut result = SelectionSet::default();

    for selection in &set.items {
        match selection {
            Selection::Field(field) if field.name == TYPENAME_FIELD => {
                result.has_typename = true;
            }
            Selection::Field(field) => {
                let field = build_field(schema, parent, field)?;
                result.items.push(SelectionNode::Field(field));
            }
            Selection::InlineFragment(fragment) => {
                let fragment = build_inline_fragment(schema, parent, fragment)?;
                result.items.push(SelectionNode::InlineFragment(fragment));
            }
            Selection::FragmentSpread(spread) => {
                result
                    .items
                    .push(SelectionNode::FragmentSpread(build_fragment_spread(schema, spread)));
            }
        }
    }

    Ok(result)
}

fn build_field(
    schema: &Schema,
    parent: &TypeDef,
    field: &AstField<'_, String>,
) -> Result<FieldSelection> {
    let def = parent.field(&field.name).ok_or_else(|| Error::UnknownField {
        parent: parent.name.clone(),
        field: field.name.clone(),
    })?;

    let type_ref = resolve_type(&def.ty);
    let field_type = schema
        .get_type(&type_ref.name)
        .ok_or_else(|| Error::UnknownType(type_ref.name.clone()))?;
    let kind = classify(field_type)?;

    let selection_set = if field.selection_set.items.is_empty() {
        SelectionSet::default()
    } else {
        build_selection_set(schema, field_type, &field.selection_set)?
    };

    let arguments = resolve_arguments(schema, &def.arguments)?;
    let directives = directive_uses(schema, &convert_directives(&field.directives));

    Ok(FieldSelection {
        name: field.alias.clone().unwrap_or_else(|| field.name.clone()),
        field_name: field.name.clone(),
        alias: field.alias.clone(),
        type_ref,
        kind,
        has_arguments: !arguments.is_empty(),
        arguments,
        uses_directives: !directives.is_empty(),
        directives,
        selection_set,
    })
}

fn build_inline_fragment(
    schema: &Schema,
    parent: &TypeDef,
    fragment: &AstInlineFragment<'_, String>,
) -> Result<InlineFragmentSelection> {
    let on_type = match &fragment.type_condition {
        Some(TypeCondition::On(name)) => schema
            .get_type(name)
            .ok_or_else(|| Error::UnknownType(name.clone()))?,
        None => parent,
    };

    let selection_set = build_selection_set(schema, on_type, &fragment.selection_set)?;
    let directives = directive_uses(schema, &convert_directives(&fragment.directives));

    Ok(InlineFragmentSelection {
        on_type: on_type.name.clone(),
        uses_directives: !directives.is_empty(),
        directives,
        selection_set,
    })
}

fn build_fragment_spread(
    schema: &Schema,
    spread: &AstFragmentSpread<'_, String>,
) -> FragmentSpreadSelection {
    let directives = directive_uses(schema, &convert_directives(&spread.directives));

    FragmentSpreadSelection {
        fragment_name: spread.fragment_name.clone(),
        uses_directives: !directives.is_empty(),
        directives,
    }
}
