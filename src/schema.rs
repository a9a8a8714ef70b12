//! schema object
//!
//! owned, queryable view over a parsed sdl document. types keep their
//! definition order, builtin scalars and directives are added the way a
//! graphql server would, and type extensions are merged into the types they
//! extend.

use crate::document::OperationKind;
use crate::error::{Error, Result};
use crate::type_ref::TypeRef;
use graphql_parser::schema::{
    parse_schema, Definition, Directive as AstDirective, DirectiveDefinition, Document, EnumValue,
    Field, InputValue, TypeDefinition, TypeExtension, Value,
};
use indexmap::IndexMap;

/// builtin scalar names
pub const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

const BUILTIN_DIRECTIVES: &str = r#"
directive @skip(if: Boolean!) on FIELD | FRAGMENT_SPREAD | INLINE_FRAGMENT
directive @include(if: Boolean!) on FIELD | FRAGMENT_SPREAD | INLINE_FRAGMENT
directive @deprecated(reason: String = "No longer supported") on FIELD_DEFINITION | ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION | ENUM_VALUE
directive @specifiedBy(url: String!) on SCALAR
"#;

/// a directive applied to a schema or query element
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveUse {
    pub name: String,
    pub arguments: Vec<(String, serde_json::Value)>,
}

/// argument or input field declaration
#[derive(Debug, Clone, PartialEq)]
pub struct InputValueDef {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeRef,
    pub default_value: Option<serde_json::Value>,
    pub directives: Vec<DirectiveUse>,
}

/// output field declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeRef,
    pub arguments: Vec<InputValueDef>,
    pub directives: Vec<DirectiveUse>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValueDef {
    pub name: String,
    pub description: Option<String>,
    pub directives: Vec<DirectiveUse>,
}

/// valid directive locations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveLocation {
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    VariableDefinition,
    Schema,
    Scalar,
    Object,
    FieldDefinition,
    ArgumentDefinition,
    Interface,
    Union,
    Enum,
    EnumValue,
    InputObject,
    InputFieldDefinition,
}

impl DirectiveLocation {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "QUERY" => DirectiveLocation::Query,
            "MUTATION" => DirectiveLocation::Mutation,
            "SUBSCRIPTION" => DirectiveLocation::Subscription,
            "FIELD" => DirectiveLocation::Field,
            "FRAGMENT_DEFINITION" => DirectiveLocation::FragmentDefinition,
            "FRAGMENT_SPREAD" => DirectiveLocation::FragmentSpread,
            "INLINE_FRAGMENT" => DirectiveLocation::InlineFragment,
            "VARIABLE_DEFINITION" => DirectiveLocation::VariableDefinition,
            "SCHEMA" => DirectiveLocation::Schema,
            "SCALAR" => DirectiveLocation::Scalar,
            "OBJECT" => DirectiveLocation::Object,
            "FIELD_DEFINITION" => DirectiveLocation::FieldDefinition,
            "ARGUMENT_DEFINITION" => DirectiveLocation::ArgumentDefinition,
            "INTERFACE" => DirectiveLocation::Interface,
            "UNION" => DirectiveLocation::Union,
            "ENUM" => DirectiveLocation::Enum,
            "ENUM_VALUE" => DirectiveLocation::EnumValue,
            "INPUT_OBJECT" => DirectiveLocation::InputObject,
            "INPUT_FIELD_DEFINITION" => DirectiveLocation::InputFieldDefinition,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveLocation::Query => "QUERY",
            DirectiveLocation::Mutation => "MUTATION",
            DirectiveLocation::Subscription => "SUBSCRIPTION",
            DirectiveLocation::Field => "FIELD",
            DirectiveLocation::FragmentDefinition => "FRAGMENT_DEFINITION",
            DirectiveLocation::FragmentSpread => "FRAGMENT_SPREAD",
            DirectiveLocation::InlineFragment => "INLINE_FRAGMENT",
            DirectiveLocation::VariableDefinition => "VARIABLE_DEFINITION",
            DirectiveLocation::Schema => "SCHEMA",
            DirectiveLocation::Scalar => "SCALAR",
            DirectiveLocation::Object => "OBJECT",
            DirectiveLocation::FieldDefinition => "FIELD_DEFINITION",
            DirectiveLocation::ArgumentDefinition => "ARGUMENT_DEFINITION",
            DirectiveLocation::Interface => "INTERFACE",
            DirectiveLocation::Union => "UNION",
            DirectiveLocation::Enum => "ENUM",
            DirectiveLocation::EnumValue => "ENUM_VALUE",
            DirectiveLocation::InputObject => "INPUT_OBJECT",
            DirectiveLocation::InputFieldDefinition => "INPUT_FIELD_DEFINITION",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveDef {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<InputValueDef>,
    pub locations: Vec<DirectiveLocation>,
}

/// per-kind payload of a named type
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
    Scalar,
    Object {
        interfaces: Vec<String>,
        fields: Vec<FieldDef>,
    },
    Interface {
        fields: Vec<FieldDef>,
    },
    Union {
        members: Vec<String>,
    },
    Enum {
        values: Vec<EnumValueDef>,
    },
    InputObject {
        fields: Vec<InputValueDef>,
    },
}

/// named type with its reflective capabilities
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDef {
    pub name: String,
    pub description: Option<String>,
    pub directives: Vec<DirectiveUse>,
    pub shape: TypeShape,
}

impl TypeDef {
    /// output fields of objects and interfaces
    pub fn fields(&self) -> &[FieldDef] {
        match &self.shape {
            TypeShape::Object { fields, .. } | TypeShape::Interface { fields, .. } => fields,
            _ => &[],
        }
    }

    pub fn input_fields(&self) -> &[InputValueDef] {
        match &self.shape {
            TypeShape::InputObject { fields } => fields,
            _ => &[],
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields().iter().find(|field| field.name == name)
    }

    /// interfaces declared by an object type
    pub fn interfaces(&self) -> &[String] {
        match &self.shape {
            TypeShape::Object { interfaces, .. } => interfaces,
            _ => &[],
        }
    }

    pub fn enum_values(&self) -> &[EnumValueDef] {
        match &self.shape {
            TypeShape::Enum { values } => values,
            _ => &[],
        }
    }

    /// union member names
    pub fn members(&self) -> &[String] {
        match &self.shape {
            TypeShape::Union { members } => members,
            _ => &[],
        }
    }

    /// exposes a field map (objects, interfaces, input objects)
    pub fn has_fields(&self) -> bool {
        matches!(
            self.shape,
            TypeShape::Object { .. } | TypeShape::Interface { .. } | TypeShape::InputObject { .. }
        )
    }

    /// can declare implemented interfaces
    pub fn has_interfaces(&self) -> bool {
        matches!(self.shape, TypeShape::Object { .. })
    }

    pub fn has_enum_values(&self) -> bool {
        matches!(self.shape, TypeShape::Enum { .. })
    }

    pub fn has_members(&self) -> bool {
        matches!(self.shape, TypeShape::Union { .. })
    }

    /// scalars and enums
    pub fn is_leaf(&self) -> bool {
        matches!(self.shape, TypeShape::Scalar | TypeShape::Enum { .. })
    }

    /// resolves to a concrete type at runtime (interfaces and unions)
    pub fn is_abstract(&self) -> bool {
        matches!(
            self.shape,
            TypeShape::Interface { .. } | TypeShape::Union { .. }
        )
    }
}

/// parsed, merged schema
#[derive(Debug, Clone)]
pub struct Schema {
    types: IndexMap<String, TypeDef>,
    directives: Vec<DirectiveDef>,
    schema_directives: Vec<DirectiveUse>,
    query_type: Option<String>,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
}

impl Schema {
    /// parse sdl text into a schema
    pub fn parse(sdl: &str) -> Result<Self> {
        let document = parse_schema::<String>(sdl).map_err(|err| Error::parse("schema", err))?;
        Self::from_document(&document)
    }

    /// build a schema from an already parsed sdl document
    pub fn from_document(document: &Document<'_, String>) -> Result<Self> {
        let mut types = IndexMap::new();
        let mut directives = Vec::new();
        let mut schema_directives = Vec::new();
        let mut roots = None;
        let mut extensions = Vec::new();

        for def in &document.definitions {
            match def {
                Definition::SchemaDefinition(schema) => {
                    roots = Some((
                        schema.query.clone(),
                        schema.mutation.clone(),
                        schema.subscription.clone(),
                    ));
                    schema_directives.extend(convert_directives(&schema.directives));
                }
                Definition::TypeDefinition(ty) => {
                    let ty = convert_type(ty);
                    types.insert(ty.name.clone(), ty);
                }
                Definition::TypeExtension(ext) => extensions.push(ext),
                Definition::DirectiveDefinition(directive) => {
                    directives.push(convert_directive_definition(directive));
                }
            }
        }

        for name in BUILTIN_SCALARS {
            types.entry(name.to_string()).or_insert_with(|| TypeDef {
                name: name.to_string(),
                description: None,
                directives: Vec::new(),
                shape: TypeShape::Scalar,
            });
        }

        for ext in extensions {
            apply_extension(&mut types, ext)?;
        }

        let builtins = parse_schema::<String>(BUILTIN_DIRECTIVES)
            .map_err(|err| Error::parse("builtin directives", err))?;
        for def in &builtins.definitions {
            if let Definition::DirectiveDefinition(directive) = def {
                if !directives.iter().any(|d: &DirectiveDef| d.name == directive.name) {
                    directives.push(convert_directive_definition(directive));
                }
            }
        }

        // conventional root names only count without a schema definition
        let default_root = |name: &str| types.contains_key(name).then(|| name.to_string());
        let (query_type, mutation_type, subscription_type) = roots.unwrap_or_else(|| {
            (
                default_root("Query"),
                default_root("Mutation"),
                default_root("Subscription"),
            )
        });

        Ok(Self {
            types,
            directives,
            schema_directives,
            query_type,
            mutation_type,
            subscription_type,
        })
    }

    /// every named type, in definition order
    pub fn type_map(&self) -> &IndexMap<String, TypeDef> {
        &self.types
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    /// directive definitions, user-defined first
    pub fn directives(&self) -> &[DirectiveDef] {
        &self.directives
    }

    pub fn directive(&self, name: &str) -> Option<&DirectiveDef> {
        self.directives.iter().find(|d| d.name == name)
    }

    /// directives applied to the schema definition itself
    pub fn schema_directives(&self) -> &[DirectiveUse] {
        &self.schema_directives
    }

    pub fn root_type_name(&self, kind: OperationKind) -> Option<&str> {
        match kind {
            OperationKind::Query => self.query_type.as_deref(),
            OperationKind::Mutation => self.mutation_type.as_deref(),
            OperationKind::Subscription => self.subscription_type.as_deref(),
        }
    }

    pub fn root_type(&self, kind: OperationKind) -> Option<&TypeDef> {
        self.root_type_name(kind).and_then(|name| self.get_type(name))
    }

    /// object types declaring `interface`, in definition order
    pub fn implementations(&self, interface: &str) -> Vec<&str> {
        self.types
            .values()
            .filter(|ty| ty.has_interfaces() && ty.interfaces().iter().any(|i| i == interface))
            .map(|ty| ty.name.as_str())
            .collect()
    }
}

fn apply_extension(
    types: &mut IndexMap<String, TypeDef>,
    ext: &TypeExtension<'_, String>,
) -> Result<()> {
    let name = match ext {
        TypeExtension::Scalar(ext) => &ext.name,
        TypeExtension::Object(ext) => &ext.name,
        TypeExtension::Interface(ext) => &ext.name,
        TypeExtension::Union(ext) => &ext.name,
        TypeExtension::Enum(ext) => &ext.name,
        TypeExtension::InputObject(ext) => &ext.name,
    };
    let target = types
        .get_mut(name)
        .ok_or_else(|| Error::UnknownType(name.clone()))?;

    match (ext, &mut target.shape) {
        (TypeExtension::Scalar(ext), TypeShape::Scalar) => {
            target.directives.extend(convert_directives(&ext.directives));
        }
        (TypeExtension::Object(ext), TypeShape::Object { interfaces, fields }) => {
            interfaces.extend(ext.implements_interfaces.iter().cloned());
            fields.extend(ext.fields.iter().map(convert_field));
            target.directives.extend(convert_directives(&ext.directives));
        }
        (TypeExtension::Interface(ext), TypeShape::Interface { fields, .. }) => {
            fields.extend(ext.fields.iter().map(convert_field));
            target.directives.extend(convert_directives(&ext.directives));
        }
        (TypeExtension::Union(ext), TypeShape::Union { members }) => {
            members.extend(ext.types.iter().cloned());
            target.directives.extend(convert_directives(&ext.directives));
        }
        (TypeExtension::Enum(ext), TypeShape::Enum { values }) => {
            values.extend(ext.values.iter().map(convert_enum_value));
            target.directives.extend(convert_directives(&ext.directives));
        }
        (TypeExtension::InputObject(ext), TypeShape::InputObject { fields }) => {
            fields.extend(ext.fields.iter().map(convert_input_value));
            target.directives.extend(convert_directives(&ext.directives));
        }
        _ => return Err(Error::Classification(name.clone())),
    }

    Ok(())
}

fn convert_type(ty: &TypeDefinition<'_, String>) -> TypeDef {
    match ty {
        TypeDefinition::Scalar(scalar) => TypeDef {
            name: scalar.name.clone(),
            description: scalar.description.clone(),
            directives: convert_directives(&scalar.directives),
            shape: TypeShape::Scalar,
        },
        TypeDefinition::Object(obj) => TypeDef {
            name: obj.name.clone(),
            description: obj.description.clone(),
            directives: convert_directives(&obj.directives),
            shape: TypeShape::Object {
                interfaces: obj.implements_interfaces.clone(),
                fields: obj.fields.iter().map(convert_field).collect(),
            },
        },
        TypeDefinition::Interface(iface) => TypeDef {
            name: iface.name.clone(),
            description: iface.description.clone(),
            directives: convert_directives(&iface.directives),
            shape: TypeShape::Interface {
                fields: iface.fields.iter().map(convert_field).collect(),
            },
        },
        TypeDefinition::Union(union_ty) => TypeDef {
            name: union_ty.name.clone(),
            description: union_ty.description.clone(),
            directives: convert_directives(&union_ty.directives),
            shape: TypeShape::Union {
                members: union_ty.types.clone(),
            },
        },
        TypeDefinition::Enum(enum_ty) => TypeDef {
            name: enum_ty.name.clone(),
            description: enum_ty.description.clone(),
            directives: convert_directives(&enum_ty.directives),
            shape: TypeShape::Enum {
                values: enum_ty.values.iter().map(convert_enum_value).collect(),
            },
        },
        TypeDefinition::InputObject(input_ty) => TypeDef {
            name: input_ty.name.clone(),
            description: input_ty.description.clone(),
            directives: convert_directives(&input_ty.directives),
            shape: TypeShape::InputObject {
                fields: input_ty.fields.iter().map(convert_input_value).collect(),
            },
        },
    }
}

fn convert_field(field: &Field<'_, String>) -> FieldDef {
    FieldDef {
        name: field.name.clone(),
        description: field.description.clone(),
        ty: TypeRef::from(&field.field_type),
        arguments: field.arguments.iter().map(convert_input_value).collect(),
        directives: convert_directives(&field.directives),
    }
}

fn convert_input_value(value: &InputValue<'_, String>) -> InputValueDef {
    InputValueDef {
        name: value.name.clone(),
        description: value.description.clone(),
        ty: TypeRef::from(&value.value_type),
        default_value: value.default_value.as_ref().map(value_to_json),
        directives: convert_directives(&value.directives),
    }
}

fn convert_enum_value(value: &EnumValue<'_, String>) -> EnumValueDef {
    EnumValueDef {
        name: value.name.clone(),
        description: value.description.clone(),
        directives: convert_directives(&value.directives),
    }
}

fn convert_directive_definition(directive: &DirectiveDefinition<'_, String>) -> DirectiveDef {
    DirectiveDef {
        name: directive.name.clone(),
        description: directive.description.clone(),
        arguments: directive.arguments.iter().map(convert_input_value).collect(),
        locations: directive
            .locations
            .iter()
            .filter_map(|loc| DirectiveLocation::from_name(loc.as_str()))
            .collect(),
    }
}

/// convert applied directives from the ast
pub(crate) fn convert_directives(directives: &[AstDirective<'_, String>]) -> Vec<DirectiveUse> {
    directives
        .iter()
        .map(|directive| DirectiveUse {
            name: directive.name.clone(),
            arguments: directive
                .arguments
                .iter()
                .map(|(name, value)| (name.clone(), value_to_json(value)))
                .collect(),
        })
        .collect()
}

/// convert an ast value literal into json
pub(crate) fn value_to_json(value: &Value<'_, String>) -> serde_json::Value {
    match value {
        Value::Variable(name) => serde_json::Value::String(format!("${name}")),
        Value::Int(number) => number
            .as_i64()
            .map(serde_json::Value::from)
            .unwrap_or(serde_json::Value::Null),
        Value::Float(float) => serde_json::Number::from_f64(*float)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(text) => serde_json::Value::String(text.clone()),
        Value::Boolean(flag) => serde_json::Value::Bool(*flag),
        Value::Null => serde_json::Value::Null,
        Value::Enum(name) => serde_json::Value::String(name.clone()),
        Value::List(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
        Value::Object(entries) => serde_json::Value::Object(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), value_to_json(value)))
                .collect(),
        ),
    }
}
