use std::fmt::Display;

use serde_json::Map;
use serde_json::Value;

/// Key/value pairs attached to a log event, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogContext(Map<String, Value>);

impl LogContext {
    pub fn new() -> Self { Self::default() }

    pub fn with(
        mut self,
        key: &str,
        value: impl Into<Value>,
    ) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(
        &self,
        key: &str,
    ) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> { self.0.keys().map(String::as_str) }
}

impl Display for LogContext {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let json = serde_json::to_string(&self.0).map_err(|_| std::fmt::Error)?;
        f.write_str(&json)
    }
}

/// Where the connector reports what happened to a submission. This is the
/// connector's only output: failures are never returned to the caller, so
/// anything worth knowing must go through here.
pub trait ConnectorLog: Send + Sync {
    fn info(
        &self,
        message: &str,
        context: LogContext,
    );

    fn warn(
        &self,
        message: &str,
        context: LogContext,
    );

    fn error(
        &self,
        message: &str,
        context: LogContext,
    );
}

/// Forwards connector events to `tracing`, i.e. whatever subscriber was set up
/// in `telemetry`.
#[derive(Debug, Clone, Default)]
pub struct TracingLog;

impl ConnectorLog for TracingLog {
    fn info(
        &self,
        message: &str,
        context: LogContext,
    ) {
        tracing::info!(connector = "mailchimp", context = %context, "{message}")
    }

    fn warn(
        &self,
        message: &str,
        context: LogContext,
    ) {
        tracing::warn!(connector = "mailchimp", context = %context, "{message}")
    }

    fn error(
        &self,
        message: &str,
        context: LogContext,
    ) {
        tracing::error!(connector = "mailchimp", context = %context, "{message}")
    }
}
