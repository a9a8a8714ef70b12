//! schema source configuration
//!
//! build a [`SourceConfig`] from a file path or an http(s) url, with optional
//! request overrides, and pass it to [`crate::load_schema`].

use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// where the schema sdl is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    File(PathBuf),
    Url(Url),
}

/// configuration for loading a schema
#[derive(Clone)]
pub struct SourceConfig {
    /// original location input
    pub(crate) raw_location: String,

    pub(crate) source: SchemaSource,

    /// request timeout duration
    pub(crate) timeout: Duration,

    /// user agent string
    pub(crate) user_agent: String,

    /// whether to verify ssl certificates
    pub(crate) verify_ssl: bool,

    /// additional headers sent with the schema request
    pub(crate) extra_headers: HeaderMap,
}

impl SourceConfig {
    /// create a configuration for a schema location
    ///
    /// anything with a `scheme://` prefix is treated as a url, everything else
    /// as a file path.
    ///
    /// # example
    ///
    /// ```
    /// use gql_codegen_core::SourceConfig;
    ///
    /// let config = SourceConfig::new("https://api.example.com/graphql");
    /// assert!(config.is_remote());
    /// ```
    pub fn new(location: impl AsRef<str>) -> Self {
        let raw = location.as_ref();

        let source = if raw.contains("://") {
            match Url::parse(raw) {
                Ok(url) => SchemaSource::Url(url),
                Err(_) => SchemaSource::File(PathBuf::from(raw)),
            }
        } else {
            SchemaSource::File(PathBuf::from(raw))
        };

        Self {
            raw_location: raw.to_string(),
            source,
            timeout: Duration::from_secs(30),
            user_agent: format!("gql-codegen-core/{} (Rust)", env!("CARGO_PKG_VERSION")),
            verify_ssl: true,
            extra_headers: HeaderMap::new(),
        }
    }

    /// set the request timeout
    ///
    /// default: 30 seconds
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// set a custom user agent string
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// disable ssl certificate verification (not recommended for production)
    ///
    /// default: enabled
    pub fn with_ssl_verification(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    /// add a header to the schema request
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.extra_headers.insert(name, value);
        self
    }

    /// add a set of headers to the schema request
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.extra_headers.extend(headers);
        self
    }

    /// parse a `name:value` header and add it
    pub fn with_raw_header(self, raw: &str) -> Result<Self> {
        let (name, value) = raw
            .split_once(':')
            .ok_or_else(|| Error::Config(format!("invalid header, expected name:value: {raw}")))?;
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|err| Error::Config(format!("invalid header name {name}: {err}")))?;
        let value = HeaderValue::from_str(value.trim())
            .map_err(|err| Error::Config(format!("invalid header value for {name}: {err}")))?;
        Ok(self.with_header(name, value))
    }

    pub fn extra_headers(&self) -> &HeaderMap {
        &self.extra_headers
    }

    /// location as given
    pub fn location(&self) -> &str {
        &self.raw_location
    }

    pub fn source(&self) -> &SchemaSource {
        &self.source
    }

    pub fn is_remote(&self) -> bool {
        matches!(self.source, SchemaSource::Url(_))
    }

    /// validate the configuration
    pub(crate) fn validate(&self) -> Result<()> {
        if self.raw_location.contains("://") && !self.is_remote() {
            // surfaces the url parse error
            Url::parse(&self.raw_location)?;
        }

        match &self.source {
            SchemaSource::Url(url) if url.scheme() != "http" && url.scheme() != "https" => {
                Err(Error::Config(format!(
                    "invalid url scheme: {}. must be http or https",
                    url.scheme()
                )))
            }
            SchemaSource::File(path) if path.as_os_str().is_empty() => {
                Err(Error::Config("schema location cannot be empty".to_string()))
            }
            _ => Ok(()),
        }
    }
}

impl std::fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceConfig")
            .field("source", &self.source)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("verify_ssl", &self.verify_ssl)
            .field("extra_headers", &self.extra_headers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_location() {
        let config = SourceConfig::new("./schema.graphql");
        assert_eq!(
            config.source(),
            &SchemaSource::File(PathBuf::from("./schema.graphql"))
        );
        assert!(!config.is_remote());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_url_location() {
        let config = SourceConfig::new("https://api.example.com/schema.graphql");
        match config.source() {
            SchemaSource::Url(url) => assert_eq!(url.host_str(), Some("api.example.com")),
            other => panic!("expected url, got {other:?}"),
        }
        assert!(config.is_remote());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_scheme() {
        let config = SourceConfig::new("ftp://example.com/schema.graphql");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_validation_malformed_url() {
        let err = SourceConfig::new("https://").validate().unwrap_err();
        assert!(matches!(err, Error::Url(_)));
    }

    #[test]
    fn test_validation_empty_location() {
        let err = SourceConfig::new("").validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_builder_helpers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-test"),
            HeaderValue::from_static("value"),
        );

        let config = SourceConfig::new("https://api.example.com/graphql")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("codegen-test")
            .with_ssl_verification(false)
            .with_headers(headers)
            .with_header(
                HeaderName::from_static("x-other"),
                HeaderValue::from_static("other"),
            );

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "codegen-test");
        assert!(!config.verify_ssl);
        assert_eq!(config.extra_headers.get("x-test").unwrap(), "value");
        assert_eq!(config.extra_headers.get("x-other").unwrap(), "other");
        assert_eq!(config.extra_headers(), &config.extra_headers);
    }

    #[test]
    fn test_raw_header() {
        let config = SourceConfig::new("https://api.example.com/graphql")
            .with_raw_header("Authorization: Bearer abc")
            .unwrap();
        assert_eq!(config.extra_headers.get("authorization").unwrap(), "Bearer abc");

        let err = SourceConfig::new("schema.graphql")
            .with_raw_header("no-separator")
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_debug_hides_header_values() {
        let config = SourceConfig::new("https://api.example.com/graphql")
            .with_raw_header("authorization: secret")
            .unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("extra_headers: 1"));
        assert!(!debug.contains("secret"));
    }
}
