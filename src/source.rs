//! schema and document loading
//!
//! reads sdl from disk or fetches it over http, and reads executable document
//! files into [`DocumentSource`] values.

use crate::config::{SchemaSource, SourceConfig};
use crate::document::DocumentSource;
use crate::error::{Error, Result};
use crate::schema::Schema;
use graphql_parser::schema::parse_schema;
use reqwest::blocking::Client as BlockingClient;
use reqwest::StatusCode;
use std::fs;
use std::path::Path;
use url::Url;

/// load the schema sdl text described by `config`
pub fn load_schema_sdl(config: &SourceConfig) -> Result<String> {
    config.validate()?;

    match config.source() {
        SchemaSource::File(path) => read_file(path),
        SchemaSource::Url(url) => fetch_with(url, |url| {
            let client = BlockingClient::builder()
                .default_headers(config.extra_headers().clone())
                .user_agent(config.user_agent.clone())
                .timeout(config.timeout)
                .danger_accept_invalid_certs(!config.verify_ssl)
                .build()?;
            let response = client.get(url.clone()).send()?;
            let status = response.status();
            let text = response.text()?;
            Ok((status, text))
        }),
    }
}

/// load and parse the schema described by `config`
pub fn load_schema(config: &SourceConfig) -> Result<Schema> {
    let sdl = load_schema_sdl(config)?;
    let document =
        parse_schema::<String>(&sdl).map_err(|err| Error::parse(config.location(), err))?;
    Schema::from_document(&document)
}

/// read executable document files, keeping the given order
pub fn load_documents<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<DocumentSource>> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let content = read_file(path)?;
            Ok(DocumentSource::new(content).with_file_path(path.display().to_string()))
        })
        .collect()
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn fetch_with<F>(url: &Url, send: F) -> Result<String>
where
    F: FnOnce(&Url) -> Result<(StatusCode, String)>,
{
    let (status, text) = send(url)?;
    parse_schema_response(status, text)
}

fn parse_schema_response(status: StatusCode, text: String) -> Result<String> {
    if !status.is_success() {
        return Err(Error::Status {
            status: status.as_u16(),
            body: text,
        });
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/githunt.graphql");

    #[test]
    fn test_load_schema_from_file() {
        let schema = load_schema(&SourceConfig::new(FIXTURE)).unwrap();
        assert!(schema.get_type("Entry").is_some());
        assert_eq!(schema.root_type_name(crate::OperationKind::Mutation), Some("Mutation"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_schema_sdl(&SourceConfig::new("/does/not/exist.graphql")).unwrap_err();
        match err {
            Error::Io { path, .. } => assert_eq!(path, Path::new("/does/not/exist.graphql")),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = load_schema_sdl(&SourceConfig::new("ftp://example.com/schema")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_fetch_success_and_error() {
        let url = Url::parse("http://localhost:1234/schema.graphql").unwrap();

        let sdl = fetch_with(&url, |url| {
            assert_eq!(url.path(), "/schema.graphql");
            Ok((StatusCode::OK, "type Query { a: Int }".to_string()))
        })
        .unwrap();
        assert!(sdl.contains("Query"));

        let err = fetch_with(&url, |_| Ok((StatusCode::NOT_FOUND, "not found".to_string())))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Status {
                status: 404,
                ref body,
            } if body == "not found"
        ));
    }

    #[test]
    fn test_load_documents_records_paths() {
        let sources = load_documents(&[FIXTURE]).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].file_path.as_deref(), Some(FIXTURE));
        assert!(sources[0].content.contains("type Entry"));

        let err = load_documents(&["/does/not/exist.graphql"]).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
