//! graphql codegen semantic model
//!
//! this crate turns a graphql schema and executable documents into the
//! language-neutral records that code emitters render: a [`SchemaCatalog`] of
//! classified types and [`Document`] records with resolved selection trees.
//! [`flatten_document`] optionally hoists every nested selection shape into a
//! named model.
//!
//! ## quick start
//!
//! ```
//! use gql_codegen_core::{build_catalog, flatten_document, DocumentSource, DocumentTransformer, NoopLog, Schema};
//!
//! # fn example() -> gql_codegen_core::Result<()> {
//! let schema = Schema::parse("type Query { me: User } type User { login: String! }")?;
//! let catalog = build_catalog(&schema, &NoopLog)?;
//! assert_eq!(catalog.types.len(), 2);
//!
//! let document = DocumentTransformer::new(&schema)
//!     .transform_source(&DocumentSource::new("query Me { me { login } }"))?;
//! let flat = flatten_document(&document);
//! assert_eq!(flat.operations[0].inner_models[0].model_type, "Me");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## loading
//!
//! use [`SourceConfig`] with [`load_schema`] to read sdl from a file or an
//! http(s) endpoint, and [`load_documents`] for document files.

mod catalog;
mod config;
mod definitions;
mod directives;
mod document;
mod error;
mod fields;
mod flatten;
mod kind;
mod log;
mod schema;
mod selection;
mod source;
mod type_ref;
mod variables;

#[cfg(test)]
mod testing;

pub use catalog::{
    build_catalog, Enum, EnumValue, InputType, Interface, ObjectType, Scalar, SchemaCatalog, Union,
};
pub use config::{SchemaSource, SourceConfig};
pub use directives::{directive_uses, transform_directives, Directive, DirectiveUseMap};
pub use document::{
    Document, DocumentSource, DocumentTransformer, Fragment, Operation, OperationKind,
};
pub use error::{Error, Result};
pub use fields::{
    resolve_argument, resolve_arguments, resolve_field, resolve_fields, resolve_input_field,
    resolve_input_fields, Argument, Field,
};
pub use flatten::{
    flatten_document, flatten_fragment, flatten_operation, flatten_selection_set, FlattenDocument,
    FlattenFragment, FlattenModel, FlattenOperation,
};
pub use kind::{classify, classify_named, TypeIndicators, TypeKind};
pub use log::{DebugLog, NoopLog, TracingLog, DEBUG_ENV};
pub use schema::{
    DirectiveDef, DirectiveLocation, DirectiveUse, EnumValueDef, FieldDef, InputValueDef, Schema,
    TypeDef, TypeShape, BUILTIN_SCALARS,
};
pub use selection::{
    build_selection_set, FieldSelection, FragmentSpreadSelection, InlineFragmentSelection,
    SelectionNode, SelectionSet, SeparatedSelection, TYPENAME_FIELD,
};
pub use source::{load_documents, load_schema, load_schema_sdl};
pub use type_ref::{resolve_type, TypeRef, TypeReference};
pub use variables::{resolve_variable, resolve_variables, Variable};
