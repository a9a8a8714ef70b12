//! debug logging
//!
//! components receive a [`DebugLog`] instead of reaching for a global logger.
//! [`NoopLog`] is the default; [`TracingLog`] forwards to `tracing`.

/// environment toggle enabling debug output for [`TracingLog::from_env`]
pub const DEBUG_ENV: &str = "CODEGEN_DEBUG";

/// logging capability threaded through the model builders
pub trait DebugLog {
    /// true if debug messages are recorded; callers skip building payloads otherwise
    fn enabled(&self) -> bool;

    fn debug(&self, message: &str, payload: Option<&serde_json::Value>);

    fn warn(&self, message: &str);
}

/// discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLog;

impl DebugLog for NoopLog {
    fn enabled(&self) -> bool {
        false
    }

    fn debug(&self, _message: &str, _payload: Option<&serde_json::Value>) {}

    fn warn(&self, _message: &str) {}
}

/// forwards to the `tracing` macros
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog {
    debug: bool,
}

impl TracingLog {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    /// debug output enabled when `CODEGEN_DEBUG` is set to anything but `0`/`false`
    pub fn from_env() -> Self {
        let debug = std::env::var(DEBUG_ENV)
            .map(|value| is_truthy(&value))
            .unwrap_or(false);
        Self { debug }
    }
}

impl DebugLog for TracingLog {
    fn enabled(&self) -> bool {
        self.debug
    }

    fn debug(&self, message: &str, payload: Option<&serde_json::Value>) {
        if !self.debug {
            return;
        }
        match payload {
            Some(payload) => tracing::debug!(%payload, "{message}"),
            None => tracing::debug!("{message}"),
        }
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != "0" && !value.eq_ignore_ascii_case("false")
}
