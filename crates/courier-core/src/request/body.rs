//! Lazily-read request body.

use std::fmt;
use std::io::Read;
use std::sync::Mutex;

use once_cell::sync::OnceCell;

use crate::error::RouteError;

type BodySource = Box<dyn Read + Send>;

/// Request payload that is drained from its source on first access.
///
/// Bodies built from bytes are available immediately. Bodies built from a
/// reader are read to the end the first time [`Body::bytes`] is called; the
/// outcome, success or failure, is cached so later callers (including other
/// handlers probing the same request) see the same content or the same error.
pub struct Body {
    source: Mutex<Option<BodySource>>,
    outcome: OnceCell<Result<Vec<u8>, ReadFailure>>,
}

/// Cached reason a body could not be drained.
#[derive(Debug, Clone)]
enum ReadFailure {
    Reader(String),
    Poisoned,
}

impl ReadFailure {
    fn to_error(&self) -> RouteError {
        match self {
            Self::Reader(message) => {
                RouteError::bad_request(format!("failed to read body: {message}"))
            }
            Self::Poisoned => RouteError::internal("request body lock poisoned"),
        }
    }
}

impl Body {
    /// Creates an empty body.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_bytes(Vec::new())
    }

    /// Creates a body from bytes already in memory.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            source: Mutex::new(None),
            outcome: OnceCell::with_value(Ok(bytes.into())),
        }
    }

    /// Creates a body that will be read from `reader` on first access.
    #[must_use]
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: Read + Send + 'static,
    {
        Self {
            source: Mutex::new(Some(Box::new(reader))),
            outcome: OnceCell::new(),
        }
    }

    /// Returns the body bytes, reading the source if needed.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::BadRequest`] if the underlying reader failed and
    /// [`RouteError::Internal`] if the source lock was poisoned, on the first
    /// and every later call.
    pub fn bytes(&self) -> Result<&[u8], RouteError> {
        match self.outcome.get_or_init(|| self.drain_source()) {
            Ok(bytes) => Ok(bytes.as_slice()),
            Err(failure) => Err(failure.to_error()),
        }
    }

    fn drain_source(&self) -> Result<Vec<u8>, ReadFailure> {
        let mut guard = self.source.lock().map_err(|_| ReadFailure::Poisoned)?;
        let mut buffer = Vec::new();
        if let Some(mut reader) = guard.take() {
            reader
                .read_to_end(&mut buffer)
                .map_err(|error| ReadFailure::Reader(error.to_string()))?;
        }
        Ok(buffer)
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field(
                "read",
                &self
                    .outcome
                    .get()
                    .map(|outcome| outcome.as_ref().map(Vec::len)),
            )
            .finish_non_exhaustive()
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<&[u8]> for Body {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::from_bytes(text.into_bytes())
    }
}
