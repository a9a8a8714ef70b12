//! build the semantic model for a schema and its documents
//!
//! prints one json object with the schema catalog and the transformed
//! documents, optionally flattened.
//!
//! command help reference (kept in sync with `gql-model --help`):
#[doc = concat!("```text\n", include_str!("gql-model-help.txt"), "\n```")]
pub const CLI_HELP: &str = include_str!("gql-model-help.txt");

use gql_codegen_core::{
    build_catalog, flatten_document, load_documents, load_schema, DocumentTransformer, SourceConfig,
    TracingLog,
};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Args {
    schema: String,
    headers: Vec<String>,
    documents: Vec<PathBuf>,
    flatten: bool,
    out: Option<PathBuf>,
}

enum ParseArgsError {
    Help,
    Message(String),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(std::env::args().collect()) {
        Ok(args) => args,
        Err(ParseArgsError::Help) => {
            print!("{CLI_HELP}");
            return;
        }
        Err(ParseArgsError::Message(err)) => {
            eprintln!("{err}\n\n{CLI_HELP}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(&args) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn parse_args(args: Vec<String>) -> Result<Args, ParseArgsError> {
    let mut schema = None;
    let mut headers = Vec::new();
    let mut documents = Vec::new();
    let mut flatten = false;
    let mut out = None;

    let mut iter = args.into_iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--schema" => schema = Some(required_value(&arg, iter.next())?),
            "--header" => headers.push(required_value(&arg, iter.next())?),
            "--document" => documents.push(PathBuf::from(required_value(&arg, iter.next())?)),
            "--flatten" => flatten = true,
            "--out" => out = Some(PathBuf::from(required_value(&arg, iter.next())?)),
            "--help" | "-h" => return Err(ParseArgsError::Help),
            _ => return Err(ParseArgsError::Message(format!("unknown argument: {arg}"))),
        }
    }

    let schema = schema.ok_or_else(|| ParseArgsError::Message("--schema is required".to_string()))?;

    Ok(Args {
        schema,
        headers,
        documents,
        flatten,
        out,
    })
}

fn required_value(flag: &str, value: Option<String>) -> Result<String, ParseArgsError> {
    value.ok_or_else(|| ParseArgsError::Message(format!("{flag} requires a value")))
}

fn run(args: &Args) -> gql_codegen_core::Result<()> {
    let mut config = SourceConfig::new(&args.schema);
    for header in &args.headers {
        config = config.with_raw_header(header)?;
    }

    let log = TracingLog::from_env();
    let schema = load_schema(&config)?;
    let catalog = build_catalog(&schema, &log)?;

    let sources = load_documents(&args.documents)?;
    let document = DocumentTransformer::new(&schema)
        .with_log(&log)
        .transform_sources(&sources)?;
    tracing::info!(
        operations = document.operations.len(),
        fragments = document.fragments.len(),
        "transformed documents"
    );

    let documents = if args.flatten {
        serde_json::to_value(flatten_document(&document))?
    } else {
        serde_json::to_value(&document)?
    };
    let output = serde_json::to_string_pretty(&json!({
        "schema": catalog,
        "documents": documents,
    }))?;

    match &args.out {
        Some(path) => fs::write(path, output).map_err(|source| gql_codegen_core::Error::Io {
            path: path.clone(),
            source,
        })?,
        None => println!("{output}"),
    }

    Ok(())
}
