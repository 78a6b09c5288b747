//! Domain types for the KwikDesk API.
//!
//! # Design
//! The platform does not publish a schema for its responses, so the whole
//! envelope stays an untyped JSON object. Only the fields an operation
//! depends on are lifted into typed results, and only after their presence
//! and shape have been checked.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// The decoded top-level JSON object of any response.
pub type Envelope = Map<String, Value>;

/// Request payload for posting a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub content: String,
    /// Time-to-live before the platform deletes the message.
    pub delete: i64,
    /// Private messages are hidden from search but listed in the channel.
    pub private: bool,
}

impl Message {
    pub fn new(content: impl Into<String>, delete: i64, private: bool) -> Self {
        Self {
            content: content.into(),
            delete,
            private,
        }
    }
}

/// Outcome of a successful token request.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenResult {
    pub token: String,
    pub envelope: Envelope,
}

impl TryFrom<Envelope> for TokenResult {
    type Error = ApiError;

    fn try_from(envelope: Envelope) -> Result<Self, Self::Error> {
        match envelope.get("token").and_then(Value::as_str) {
            Some(token) => Ok(Self {
                token: token.to_string(),
                envelope,
            }),
            None => Err(ApiError::UnexpectedShape {
                field: "token",
                expected: "a string",
                payload: envelope,
            }),
        }
    }
}

/// The `results` array returned by channel and search calls.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Results(pub Vec<Value>);

impl Results {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if any result has a `content` field containing `needle`.
    pub fn contains_content(&self, needle: &str) -> bool {
        self.0.iter().any(|item| {
            item.get("content")
                .and_then(Value::as_str)
                .is_some_and(|content| content.contains(needle))
        })
    }

    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }
}

impl TryFrom<Envelope> for Results {
    type Error = ApiError;

    fn try_from(mut envelope: Envelope) -> Result<Self, Self::Error> {
        match envelope.remove("results") {
            Some(Value::Array(items)) => Ok(Results(items)),
            Some(other) => {
                envelope.insert("results".to_string(), other);
                Err(ApiError::UnexpectedShape {
                    field: "results",
                    expected: "an array",
                    payload: envelope,
                })
            }
            None => Err(ApiError::UnexpectedShape {
                field: "results",
                expected: "an array",
                payload: envelope,
            }),
        }
    }
}
