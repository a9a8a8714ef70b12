//! directive uses and definitions
//!
//! [`directive_uses`] answers "which directives are applied here, with which
//! arguments" for any schema or query element. [`transform_directives`] turns
//! the schema's directive definitions into emitter records.

use crate::error::Result;
use crate::fields::{resolve_arguments, Argument};
use crate::schema::{DirectiveDef, DirectiveLocation, DirectiveUse, Schema};
use indexmap::IndexMap;
use serde::Serialize;

/// directive name to coerced argument object; missing key means not applied
pub type DirectiveUseMap = IndexMap<String, serde_json::Value>;

/// coerce the directives applied to one element
///
/// iterates the schema's directive definitions in order. an applied directive
/// gets its supplied arguments, then defaults for the rest; arguments with
/// neither are left out. directives the schema does not define are ignored.
pub fn directive_uses(schema: &Schema, applied: &[DirectiveUse]) -> DirectiveUseMap {
    let mut uses = DirectiveUseMap::new();

    for def in schema.directives() {
        let Some(directive) = applied.iter().find(|d| d.name == def.name) else {
            continue;
        };
        uses.insert(def.name.clone(), coerce_arguments(def, directive));
    }

    uses
}

fn coerce_arguments(def: &DirectiveDef, directive: &DirectiveUse) -> serde_json::Value {
    let mut args = serde_json::Map::new();
    for arg in &def.arguments {
        let supplied = directive
            .arguments
            .iter()
            .find(|(name, _)| *name == arg.name)
            .map(|(_, value)| value);
        if let Some(value) = supplied.or(arg.default_value.as_ref()) {
            args.insert(arg.name.clone(), value.clone());
        }
    }
    serde_json::Value::Object(args)
}

/// `(isDeprecated, deprecationReason)` from a use map
pub(crate) fn deprecation(uses: &DirectiveUseMap) -> (bool, Option<String>) {
    match uses.get("deprecated") {
        Some(args) => (
            true,
            args.get("reason")
                .and_then(|reason| reason.as_str())
                .map(str::to_string),
        ),
        None => (false, None),
    }
}

/// directive definition record
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Directive {
    pub name: String,
    pub description: String,
    pub arguments: Vec<Argument>,
    pub has_arguments: bool,
    pub locations: Vec<&'static str>,
    pub on_query: bool,
    pub on_mutation: bool,
    pub on_subscription: bool,
    pub on_fragment: bool,
    pub on_fragment_spread: bool,
    pub on_inline_fragment: bool,
    pub on_field: bool,
    pub on_variable_definition: bool,
    pub on_schema: bool,
    pub on_scalar: bool,
    pub on_object: bool,
    pub on_field_definition: bool,
    pub on_argument: bool,
    pub on_interface: bool,
    pub on_union: bool,
    pub on_enum: bool,
    pub on_enum_value: bool,
    pub on_input_object: bool,
    pub on_input_field: bool,
}

/// build records for every directive the schema defines
pub fn transform_directives(schema: &Schema) -> Result<Vec<Directive>> {
    schema
        .directives()
        .iter()
        .map(|def| transform_directive(schema, def))
        .collect()
}

fn transform_directive(schema: &Schema, def: &DirectiveDef) -> Result<Directive> {
    let arguments = resolve_arguments(schema, &def.arguments)?;
    let on = |location: DirectiveLocation| def.locations.contains(&location);

    Ok(Directive {
        name: def.name.clone(),
        description: def.description.clone().unwrap_or_default(),
        has_arguments: !arguments.is_empty(),
        arguments,
        locations: def.locations.iter().map(DirectiveLocation::as_str).collect(),
        on_query: on(DirectiveLocation::Query),
        on_mutation: on(DirectiveLocation::Mutation),
        on_subscription: on(DirectiveLocation::Subscription),
        on_fragment: on(DirectiveLocation::FragmentDefinition),
        on_fragment_spread: on(DirectiveLocation::FragmentSpread),
        on_inline_fragment: on(DirectiveLocation::InlineFragment),
        on_field: on(DirectiveLocation::Field),
        on_variable_definition: on(DirectiveLocation::VariableDefinition),
        on_schema: on(DirectiveLocation::Schema),
        on_scalar: on(DirectiveLocation::Scalar),
        on_object: on(DirectiveLocation::Object),
        on_field_definition: on(DirectiveLocation::FieldDefinition),
        on_argument: on(DirectiveLocation::ArgumentDefinition),
        on_interface: on(DirectiveLocation::Interface),
        on_union: on(DirectiveLocation::Union),
        on_enum: on(DirectiveLocation::Enum),
        on_enum_value: on(DirectiveLocation::EnumValue),
        on_input_object: on(DirectiveLocation::InputObject),
        on_input_field: on(DirectiveLocation::InputFieldDefinition),
    })
}
