//! Inbound request model.
//!
//! A [`Request`] is the already-parsed view of one inbound call: execution
//! mode, target path, verb, query map, positional command arguments and a
//! [`Body`] that is read from its source at most once, on first access.

mod body;
mod params;

use std::collections::BTreeMap;

pub use self::body::Body;
pub use self::params::Params;

/// How a request entered the system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    /// Request-driven (HTTP-like) traffic.
    #[default]
    Request,
    /// Command-driven (CLI task) traffic.
    Command,
}

impl ExecutionMode {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Command => "command",
        }
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single inbound call awaiting dispatch.
#[derive(Debug)]
pub struct Request {
    mode: ExecutionMode,
    verb: String,
    path: String,
    query: BTreeMap<String, String>,
    arguments: Vec<String>,
    body: Body,
}

impl Request {
    /// Creates a request-mode call with an empty body.
    #[must_use]
    pub fn new(verb: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            mode: ExecutionMode::Request,
            verb: verb.into(),
            path: path.into(),
            query: BTreeMap::new(),
            arguments: Vec::new(),
            body: Body::empty(),
        }
    }

    /// Creates a command-mode call for `task` with positional arguments.
    #[must_use]
    pub fn command<I, S>(task: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: ExecutionMode::Command,
            verb: String::new(),
            path: task.into(),
            query: BTreeMap::new(),
            arguments: arguments.into_iter().map(Into::into).collect(),
            body: Body::empty(),
        }
    }

    /// Replaces the request body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Execution mode of this request.
    #[must_use]
    pub const fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// HTTP-like verb, empty for command requests.
    #[must_use]
    pub fn verb(&self) -> &str {
        &self.verb
    }

    /// Raw target path (or task name in command mode).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters.
    #[must_use]
    pub const fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    /// Positional command arguments.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }
}
