//! schema catalog
//!
//! walks the schema's type map once and routes every user-defined type into
//! one of six lists, each entry fully resolved for emitters.

use crate::directives::{deprecation, directive_uses, transform_directives, Directive, DirectiveUseMap};
use crate::error::Result;
use crate::fields::{resolve_fields, resolve_input_fields, Field};
use crate::kind::{classify, TypeKind};
use crate::log::DebugLog;
use crate::schema::{Schema, TypeDef, BUILTIN_SCALARS};
use serde::Serialize;

/// prefix reserved for introspection types
const INTROSPECTION_PREFIX: &str = "__";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectType {
    pub name: String,
    pub description: String,
    pub fields: Vec<Field>,
    pub has_fields: bool,
    pub interfaces: Vec<String>,
    pub has_interfaces: bool,
    pub directives: DirectiveUseMap,
    pub uses_directives: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputType {
    pub name: String,
    pub description: String,
    pub fields: Vec<Field>,
    pub has_fields: bool,
    pub directives: DirectiveUseMap,
    pub uses_directives: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValue {
    pub name: String,
    pub value: String,
    pub description: String,
    pub directives: DirectiveUseMap,
    pub uses_directives: bool,
    pub is_deprecated: bool,
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Enum {
    pub name: String,
    pub description: String,
    pub values: Vec<EnumValue>,
    pub directives: DirectiveUseMap,
    pub uses_directives: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Union {
    pub name: String,
    pub description: String,
    pub possible_types: Vec<String>,
    pub has_possible_types: bool,
    pub directives: DirectiveUseMap,
    pub uses_directives: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interface {
    pub name: String,
    pub description: String,
    pub fields: Vec<Field>,
    pub has_fields: bool,
    pub implementing_types: Vec<String>,
    pub has_implementing_types: bool,
    pub directives: DirectiveUseMap,
    pub uses_directives: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scalar {
    pub name: String,
    pub description: String,
    pub directives: DirectiveUseMap,
    pub uses_directives: bool,
}

/// everything an emitter needs to know about the schema
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaCatalog {
    pub types: Vec<ObjectType>,
    pub input_types: Vec<InputType>,
    pub enums: Vec<Enum>,
    pub unions: Vec<Union>,
    pub interfaces: Vec<Interface>,
    pub scalars: Vec<Scalar>,
    pub defined_directives: Vec<Directive>,
    pub has_types: bool,
    pub has_input_types: bool,
    pub has_enums: bool,
    pub has_unions: bool,
    pub has_interfaces: bool,
    pub has_scalars: bool,
    pub has_defined_directives: bool,
    /// directives applied to the schema definition
    pub directives: DirectiveUseMap,
    pub uses_directives: bool,
}

impl SchemaCatalog {
    pub fn object_type(&self, name: &str) -> Option<&ObjectType> {
        self.types.iter().find(|ty| ty.name == name)
    }

    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|ty| ty.name == name)
    }
}

fn is_user_type(name: &str) -> bool {
    !BUILTIN_SCALARS.contains(&name) && !name.starts_with(INTROSPECTION_PREFIX)
}

/// build the catalog for a schema
pub fn build_catalog(schema: &Schema, log: &dyn DebugLog) -> Result<SchemaCatalog> {
    log.debug("[build_catalog] started...", None);

    let directives = directive_uses(schema, schema.schema_directives());
    let mut catalog = SchemaCatalog {
        uses_directives: !directives.is_empty(),
        directives,
        ..SchemaCatalog::default()
    };

    let types: Vec<&TypeDef> = schema
        .type_map()
        .values()
        .filter(|ty| is_user_type(&ty.name))
        .collect();

    log.debug(
        &format!("[build_catalog] got total of {} types in the schema", types.len()),
        None,
    );

    for ty in types {
        match classify(ty)? {
            TypeKind::Object => catalog.types.push(transform_object(schema, ty)?),
            TypeKind::InputObject => catalog.input_types.push(transform_input(schema, ty)?),
            TypeKind::Enum => catalog.enums.push(transform_enum(schema, ty)),
            TypeKind::Union => catalog.unions.push(transform_union(schema, ty)),
            TypeKind::Interface => catalog.interfaces.push(transform_interface(schema, ty)?),
            TypeKind::Scalar => catalog.scalars.push(transform_scalar(schema, ty)),
        }
    }

    catalog.defined_directives = transform_directives(schema)?;

    catalog.has_types = !catalog.types.is_empty();
    catalog.has_input_types = !catalog.input_types.is_empty();
    catalog.has_enums = !catalog.enums.is_empty();
    catalog.has_unions = !catalog.unions.is_empty();
    catalog.has_interfaces = !catalog.interfaces.is_empty();
    catalog.has_scalars = !catalog.scalars.is_empty();
    catalog.has_defined_directives = !catalog.defined_directives.is_empty();

    if log.enabled() {
        let payload = serde_json::to_value(&catalog)?;
        log.debug("[build_catalog] done, result is:", Some(&payload));
    }

    Ok(catalog)
}

fn transform_object(schema: &Schema, ty: &TypeDef) -> Result<ObjectType> {
    let fields = resolve_fields(schema, ty.fields())?;
    let directives = directive_uses(schema, &ty.directives);

    Ok(ObjectType {
        name: ty.name.clone(),
        description: ty.description.clone().unwrap_or_default(),
        has_fields: !fields.is_empty(),
        fields,
        has_interfaces: !ty.interfaces().is_empty(),
        interfaces: ty.interfaces().to_vec(),
        uses_directives: !directives.is_empty(),
        directives,
    })
}

fn transform_input(schema: &Schema, ty: &TypeDef) -> Result<InputType> {
    let fields = resolve_input_fields(schema, ty.input_fields())?;
    let directives = directive_uses(schema, &ty.directives);

    Ok(InputType {
        name: ty.name.clone(),
        description: ty.description.clone().unwrap_or_default(),
        has_fields: !fields.is_empty(),
        fields,
        uses_directives: !directives.is_empty(),
        directives,
    })
}

fn transform_enum(schema: &Schema, ty: &TypeDef) -> Enum {
    let values = ty
        .enum_values()
        .iter()
        .map(|value| {
            let directives = directive_uses(schema, &value.directives);
            let (is_deprecated, deprecation_reason) = deprecation(&directives);
            EnumValue {
                name: value.name.clone(),
                value: value.name.clone(),
                description: value.description.clone().unwrap_or_default(),
                uses_directives: !directives.is_empty(),
                directives,
                is_deprecated,
                deprecation_reason,
            }
        })
        .collect();
    let directives = directive_uses(schema, &ty.directives);

    Enum {
        name: ty.name.clone(),
        description: ty.description.clone().unwrap_or_default(),
        values,
        uses_directives: !directives.is_empty(),
        directives,
    }
}

fn transform_union(schema: &Schema, ty: &TypeDef) -> Union {
    let directives = directive_uses(schema, &ty.directives);

    Union {
        name: ty.name.clone(),
        description: ty.description.clone().unwrap_or_default(),
        has_possible_types: !ty.members().is_empty(),
        possible_types: ty.members().to_vec(),
        uses_directives: !directives.is_empty(),
        directives,
    }
}

fn transform_interface(schema: &Schema, ty: &TypeDef) -> Result<Interface> {
    let fields = resolve_fields(schema, ty.fields())?;
    let implementing_types: Vec<String> = schema
        .implementations(&ty.name)
        .into_iter()
        .map(str::to_string)
        .collect();
    let directives = directive_uses(schema, &ty.directives);

    Ok(Interface {
        name: ty.name.clone(),
        description: ty.description.clone().unwrap_or_default(),
        has_fields: !fields.is_empty(),
        fields,
        has_implementing_types: !implementing_types.is_empty(),
        implementing_types,
        uses_directives: !directives.is_empty(),
        directives,
    })
}

fn transform_scalar(schema: &Schema, ty: &TypeDef) -> Scalar {
    let directives = directive_uses(schema, &ty.directives);

    Scalar {
        name: ty.name.clone(),
        description: ty.description.clone().unwrap_or_default(),
        uses_directives: !directives.is_empty(),
        directives,
    }
}
