//! operations and fragments
//!
//! turns executable documents into [`Operation`] and [`Fragment`] records with
//! resolved selection trees and variables.

use crate::definitions::split_definitions;
use crate::directives::{directive_uses, DirectiveUseMap};
use crate::error::{Error, Result};
use crate::log::{DebugLog, NoopLog};
use crate::schema::{convert_directives, Schema};
use crate::selection::{build_selection_set, SelectionSet};
use crate::variables::{resolve_variables, Variable};
use graphql_parser::query::{
    parse_query, Definition, Directive as AstDirective, Document as AstDocument,
    FragmentDefinition, OperationDefinition, SelectionSet as AstSelectionSet, TypeCondition,
    VariableDefinition,
};
use graphql_parser::schema::parse_schema;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub name: String,
    pub operation_type: OperationKind,
    #[serde(flatten)]
    pub selection_set: SelectionSet,
    pub variables: Vec<Variable>,
    pub has_variables: bool,
    pub directives: DirectiveUseMap,
    pub uses_directives: bool,
    pub original_file: Option<String>,
    /// printed operation source
    pub document: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    pub name: String,
    pub on_type: String,
    #[serde(flatten)]
    pub selection_set: SelectionSet,
    pub directives: DirectiveUseMap,
    pub uses_directives: bool,
    pub original_file: Option<String>,
    pub document: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub operations: Vec<Operation>,
    pub fragments: Vec<Fragment>,
    pub has_operations: bool,
    pub has_fragments: bool,
}

impl Document {
    fn merge(&mut self, other: Document) {
        self.operations.extend(other.operations);
        self.fragments.extend(other.fragments);
        self.refresh_flags();
    }

    fn refresh_flags(&mut self) {
        self.has_operations = !self.operations.is_empty();
        self.has_fragments = !self.fragments.is_empty();
    }

    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.name == name)
    }

    pub fn fragment(&self, name: &str) -> Option<&Fragment> {
        self.fragments.iter().find(|fragment| fragment.name == name)
    }
}

/// raw executable document text and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSource {
    pub file_path: Option<String>,
    pub content: String,
}

impl DocumentSource {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            file_path: None,
            content: content.into(),
        }
    }

    pub fn with_file_path(mut self, file_path: impl Into<String>) -> Self {
        self.file_path = Some(file_path.into());
        self
    }

    fn label(&self) -> &str {
        self.file_path.as_deref().unwrap_or("document")
    }
}

/// borrowed parts shared by the three operation kinds
struct OperationParts<'d, 'a> {
    kind: OperationKind,
    name: Option<&'d String>,
    variables: &'d [VariableDefinition<'a, String>],
    directives: &'d [AstDirective<'a, String>],
    selection_set: &'d AstSelectionSet<'a, String>,
}

fn operation_parts<'d, 'a>(op: &'d OperationDefinition<'a, String>) -> OperationParts<'d, 'a> {
    match op {
        OperationDefinition::SelectionSet(set) => OperationParts {
            kind: OperationKind::Query,
            name: None,
            variables: &[],
            directives: &[],
            selection_set: set,
        },
        OperationDefinition::Query(query) => OperationParts {
            kind: OperationKind::Query,
            name: query.name.as_ref(),
            variables: &query.variable_definitions,
            directives: &query.directives,
            selection_set: &query.selection_set,
        },
        OperationDefinition::Mutation(mutation) => OperationParts {
            kind: OperationKind::Mutation,
            name: mutation.name.as_ref(),
            variables: &mutation.variable_definitions,
            directives: &mutation.directives,
            selection_set: &mutation.selection_set,
        },
        OperationDefinition::Subscription(subscription) => OperationParts {
            kind: OperationKind::Subscription,
            name: subscription.name.as_ref(),
            variables: &subscription.variable_definitions,
            directives: &subscription.directives,
            selection_set: &subscription.selection_set,
        },
    }
}

/// builds [`Document`] records; anonymous operations are numbered per transformer
pub struct DocumentTransformer<'s> {
    schema: &'s Schema,
    log: &'s dyn DebugLog,
    anonymous_count: usize,
}

impl<'s> DocumentTransformer<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            log: &NoopLog,
            anonymous_count: 0,
        }
    }

    pub fn with_log(mut self, log: &'s dyn DebugLog) -> Self {
        self.log = log;
        self
    }

    /// transform an already parsed executable document
    pub fn transform(
        &mut self,
        document: &AstDocument<'_, String>,
        file_path: Option<&str>,
    ) -> Result<Document> {
        self.log.debug("[transform_document] started...", None);

        let mut result = Document::default();
        self.push_definitions(&mut result, document, file_path)?;
        self.finish(result)
    }

    /// parse and transform one source
    ///
    /// type system definitions found in the source are skipped with one
    /// warning each; the executable definitions around them are kept.
    pub fn transform_source(&mut self, source: &DocumentSource) -> Result<Document> {
        let file_path = source.file_path.as_deref();
        let err = match parse_query::<String>(&source.content) {
            Ok(document) => return self.transform(&document, file_path),
            Err(err) => err,
        };

        self.log.debug("[transform_document] started...", None);

        let mut result = Document::default();
        for chunk in split_definitions(&source.content) {
            if let Ok(document) = parse_query::<String>(chunk) {
                self.push_definitions(&mut result, &document, file_path)?;
            } else if parse_schema::<String>(chunk).is_ok() {
                self.log.warn(&format!(
                    "{}: skipping type system definition `{}`",
                    source.label(),
                    chunk.lines().next().unwrap_or_default()
                ));
            } else {
                return Err(Error::parse(source.label(), err));
            }
        }
        self.finish(result)
    }

    /// transform several sources into one document, keeping source order
    pub fn transform_sources(&mut self, sources: &[DocumentSource]) -> Result<Document> {
        let mut result = Document::default();
        for source in sources {
            result.merge(self.transform_source(source)?);
        }
        Ok(result)
    }

    fn push_definitions(
        &mut self,
        result: &mut Document,
        document: &AstDocument<'_, String>,
        file_path: Option<&str>,
    ) -> Result<()> {
        for def in &document.definitions {
            match def {
                Definition::Operation(op) => {
                    let mut operation = self.transform_operation(op, def.to_string())?;
                    operation.original_file = file_path.map(str::to_string);
                    result.operations.push(operation);
                }
                Definition::Fragment(fragment) => {
                    let mut fragment = self.transform_fragment(fragment, def.to_string())?;
                    fragment.original_file = file_path.map(str::to_string);
                    result.fragments.push(fragment);
                }
            }
        }
        Ok(())
    }

    fn finish(&self, mut result: Document) -> Result<Document> {
        result.refresh_flags();

        if self.log.enabled() {
            let payload = serde_json::to_value(&result)?;
            self.log
                .debug("[transform_document] done, result is:", Some(&payload));
        }

        Ok(result)
    }

    fn transform_operation(
        &mut self,
        op: &OperationDefinition<'_, String>,
        printed: String,
    ) -> Result<Operation> {
        let parts = operation_parts(op);
        let root = self
            .schema
            .root_type(parts.kind)
            .ok_or(Error::MissingRootType(parts.kind))?;

        let name = match parts.name {
            Some(name) => name.clone(),
            None => {
                self.anonymous_count += 1;
                format!("Anonymous_{}_{}", parts.kind, self.anonymous_count)
            }
        };
        self.log
            .debug(&format!("[transform_operation] transforming {name}"), None);

        let selection_set = build_selection_set(self.schema, root, parts.selection_set)?;
        let variables = resolve_variables(self.schema, parts.variables)?;
        let directives = directive_uses(self.schema, &convert_directives(parts.directives));

        Ok(Operation {
            name,
            operation_type: parts.kind,
            selection_set,
            has_variables: !variables.is_empty(),
            variables,
            uses_directives: !directives.is_empty(),
            directives,
            original_file: None,
            document: printed,
        })
    }

    fn transform_fragment(
        &mut self,
        fragment: &FragmentDefinition<'_, String>,
        printed: String,
    ) -> Result<Fragment> {
        let TypeCondition::On(on_type) = &fragment.type_condition;
        let root = self
            .schema
            .get_type(on_type)
            .ok_or_else(|| Error::UnknownType(on_type.clone()))?;
        self.log.debug(
            &format!("[transform_fragment] transforming {}", fragment.name),
            None,
        );

        let selection_set = build_selection_set(self.schema, root, &fragment.selection_set)?;
        let directives = directive_uses(self.schema, &convert_directives(&fragment.directives));

        Ok(Fragment {
            name: fragment.name.clone(),
            on_type: on_type.clone(),
            selection_set,
            uses_directives: !directives.is_empty(),
            directives,
            original_file: None,
            document: printed,
        })
    }
}
