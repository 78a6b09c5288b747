//! Error types for the KwikDesk client.
//!
//! # Design
//! Every failure after a request left the client carries a best-effort
//! `payload`: the response body decoded as a JSON object, or an empty
//! envelope when there was no body or it was not a JSON object. The platform
//! reports problems in that payload, so callers usually want it alongside
//! the error kind.

use crate::types::Envelope;

/// Errors returned by `KwikDeskClient` parse methods and `BlockingClient`.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, TLS, proxy).
    #[error("transport failed: {message}")]
    Transport { message: String, payload: Envelope },

    /// The server answered with a status outside the success allow-list.
    #[error("HTTP response code: {status}")]
    Status { status: u16, payload: Envelope },

    /// The response body could not be read off the wire.
    #[error("reading response body failed: {message}")]
    BodyRead { message: String, payload: Envelope },

    /// The response body is not a JSON object.
    #[error("deserialization failed: {message}")]
    Deserialization { message: String, payload: Envelope },

    /// The envelope decoded but lacks a field the operation needs.
    #[error("unexpected response shape: `{field}` should be {expected}")]
    UnexpectedShape {
        field: &'static str,
        expected: &'static str,
        payload: Envelope,
    },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),
}

impl ApiError {
    /// The best-effort decoded response body, when a request was attempted.
    pub fn payload(&self) -> Option<&Envelope> {
        match self {
            ApiError::Transport { payload, .. }
            | ApiError::Status { payload, .. }
            | ApiError::BodyRead { payload, .. }
            | ApiError::Deserialization { payload, .. }
            | ApiError::UnexpectedShape { payload, .. } => Some(payload),
            ApiError::Serialization(_) | ApiError::InvalidMethod(_) => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_error_exposes_code_and_payload() {
        let mut payload = Envelope::new();
        payload.insert("error".to_string(), json!("bad token"));
        let err = ApiError::Status { status: 401, payload };

        assert_eq!(err.status(), Some(401));
        assert_eq!(err.payload().unwrap()["error"], "bad token");
        assert_eq!(err.to_string(), "HTTP response code: 401");
    }

    #[test]
    fn local_errors_have_no_payload() {
        let err = ApiError::InvalidMethod("FETCH".to_string());
        assert!(err.payload().is_none());
        assert!(err.status().is_none());
        assert_eq!(err.to_string(), "invalid HTTP method: FETCH");
    }

    #[test]
    fn unexpected_shape_names_the_field() {
        let err = ApiError::UnexpectedShape {
            field: "token",
            expected: "a string",
            payload: Envelope::new(),
        };
        assert_eq!(
            err.to_string(),
            "unexpected response shape: `token` should be a string"
        );
    }
}
