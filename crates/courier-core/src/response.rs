//! Outbound response model.

use std::collections::BTreeMap;

use crate::error::RouteError;
use crate::status;

/// Response headers keyed by canonical header name.
pub type Headers = BTreeMap<String, String>;

/// Name of the header advertising accepted verbs.
pub const ALLOW_HEADER: &str = "Allow";
/// Name of the header describing the body encoding.
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// Wire-level result of dispatching a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    body: String,
    status: u16,
    headers: Headers,
}

impl Response {
    /// Creates a response with the given body and status.
    #[must_use]
    pub fn new(body: impl Into<String>, status: u16) -> Self {
        Self {
            body: body.into(),
            status,
            headers: Headers::new(),
        }
    }

    /// Creates a `200 OK` response.
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(body, status::OK)
    }

    /// Renders an error without any encoder: the body is the bare message.
    ///
    /// Used when no handler was selected and therefore no encoder is known.
    #[must_use]
    pub fn unencoded_error(error: &RouteError) -> Self {
        Self::new(error.to_string(), error.status_code()).with_allow_header(error)
    }

    /// Adds an `Allow` header when the error advertises accepted verbs.
    #[must_use]
    pub fn with_allow_header(mut self, error: &RouteError) -> Self {
        if let Some(allowed) = error.allowed_methods() {
            self.headers
                .insert(ALLOW_HEADER.to_owned(), allowed.join(", "));
        }
        self
    }

    /// Merges headers into the response, overwriting existing names.
    #[must_use]
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Sets a single header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Encoded body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Looks up a header by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Splits the response into body and status.
    #[must_use]
    pub fn into_parts(self) -> (String, u16) {
        (self.body, self.status)
    }
}
