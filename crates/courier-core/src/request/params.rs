//! Operation parameters.

use serde_json::{Map, Value};

/// Arguments passed to an operation.
///
/// JSON-RPC calls supply either a positional list or a named object; command
/// requests always supply positional strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Params {
    /// No parameters were supplied.
    #[default]
    None,
    /// Positional arguments.
    Positional(Vec<Value>),
    /// Named arguments.
    Named(Map<String, Value>),
}

impl Params {
    /// Builds parameters from an optional JSON value.
    ///
    /// Returns `None` when the value is neither an array nor an object.
    #[must_use]
    pub fn from_value(value: Option<Value>) -> Option<Self> {
        match value {
            None => Some(Self::None),
            Some(Value::Array(items)) => Some(Self::Positional(items)),
            Some(Value::Object(fields)) => Some(Self::Named(fields)),
            Some(_) => None,
        }
    }

    /// Looks up a positional argument.
    #[must_use]
    pub fn positional(&self, index: usize) -> Option<&Value> {
        match self {
            Self::Positional(items) => items.get(index),
            _ => None,
        }
    }

    /// Looks up a named argument.
    #[must_use]
    pub fn named(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Named(fields) => fields.get(key),
            _ => None,
        }
    }

    /// Number of supplied arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Positional(items) => items.len(),
            Self::Named(fields) => fields.len(),
        }
    }

    /// Returns `true` when no arguments were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Converts the parameters back into a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::None => Value::Null,
            Self::Positional(items) => Value::Array(items.clone()),
            Self::Named(fields) => Value::Object(fields.clone()),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for Params {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::Positional(iter.into_iter().map(|item| Value::String(item.into())).collect())
    }
}
