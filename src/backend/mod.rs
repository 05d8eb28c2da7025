pub mod http;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A scalar value from a result record, kept as display text.
///
/// The endpoint sends prices both as strings and as numbers, so every JSON
/// scalar is accepted. `null` and missing keys become an empty field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field(Option<String>);

impl Field {
    pub fn new(text: impl Into<String>) -> Self {
        Self(Some(text.into()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_deref().unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::Null => Self(None),
            serde_json::Value::String(s) => Self(Some(s)),
            other => Self(Some(other.to_string())),
        })
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Some(text) => serializer.serialize_str(text),
            None => serializer.serialize_none(),
        }
    }
}

/// One product returned by the search endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SearchResult {
    #[serde(default)]
    pub id: Field,
    #[serde(default)]
    pub name: Field,
    #[serde(default)]
    pub price: Field,
    #[serde(default)]
    pub category: Field,
    #[serde(default)]
    pub brand: Field,
    #[serde(default)]
    pub ean: Field,
}

impl SearchResult {
    pub fn new(name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            name: Field::new(name),
            price: Field::new(price),
            ..Self::default()
        }
    }
}

/// A completion option from the suggestions endpoint
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Suggestion {
    pub text: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source", default)]
    pub source: Option<SearchResult>,
}

/// Failure of a single lookup.
///
/// Errors carry rendered messages rather than the underlying error types so
/// they can be cloned into UI messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("invalid endpoint '{0}'")]
    InvalidEndpoint(String),
    #[error("request failed: {0}")]
    Network(String),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode response: {0}")]
    Decode(String),
}

pub type SearchFuture =
    Pin<Box<dyn Future<Output = Result<Vec<SearchResult>, SearchError>> + Send>>;

/// Something that answers search queries (extensibility point)
pub trait SearchBackend: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Start a lookup for `query`. The returned future owns everything it
    /// needs, so it can outlive the borrow of `self`.
    fn search(&self, query: &str) -> SearchFuture;
}

/// Decode a `/search` response body
pub fn decode_results(body: &[u8]) -> Result<Vec<SearchResult>, SearchError> {
    serde_json::from_slice(body).map_err(|e| SearchError::Decode(e.to_string()))
}

/// Decode a `/suggestions` response body
pub fn decode_suggestions(body: &[u8]) -> Result<Vec<Suggestion>, SearchError> {
    serde_json::from_slice(body).map_err(|e| SearchError::Decode(e.to_string()))
}
