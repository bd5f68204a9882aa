//! Error types for the user API client.
//!
//! # Design
//! Callers need to tell four situations apart: the request never completed
//! (`Transport`), the server sent something that is not JSON
//! (`InvalidResponse`), the server answered with a non-2xx status
//! (`Api`), and the server answered 2xx with JSON of the wrong shape
//! (`MalformedPayload`). Shape problems carry a [`PayloadError`] so a bad
//! timestamp can be told apart from a missing field.

use thiserror::Error;

use crate::transport::TransportError;

/// Errors returned by `UsersClient` parse methods and `UserService`.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The transport failed to complete the round-trip.
    #[error("HTTP error: {0}")]
    Transport(#[from] TransportError),

    /// The response body is present but is not valid JSON.
    #[error("Invalid JSON from API (status {status}, {url}): {message}")]
    InvalidResponse {
        status: u16,
        url: String,
        message: String,
    },

    /// The server returned a status outside `[200, 300)`.
    #[error("{message} (status {status})")]
    Api { status: u16, message: String },

    /// A successful JSON payload does not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedPayload(#[from] PayloadError),

    /// The request payload could not be serialized to JSON.
    #[error("failed to serialize request body: {0}")]
    Serialization(String),
}

/// Reasons a decoded payload cannot be mapped into a DTO.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("missing {0}")]
    MissingField(String),

    #[error("field `{field}` has the wrong shape: expected {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    #[error("invalid timestamp `{value}` in `{field}`: {source}")]
    InvalidTimestamp {
        field: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

impl PayloadError {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        PayloadError::MissingField(field.into())
    }

    pub(crate) fn wrong_type(field: impl Into<String>, expected: &'static str) -> Self {
        PayloadError::WrongType {
            field: field.into(),
            expected,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_response_message_names_status_and_url() {
        let err = ClientError::InvalidResponse {
            status: 404,
            url: "https://reqres.in/api/users/9999".to_string(),
            message: "expected value at line 1 column 1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Invalid JSON"));
        assert!(msg.contains("status 404"));
        assert!(msg.contains("https://reqres.in/api/users/9999"));
    }

    #[test]
    fn malformed_payload_wraps_payload_error() {
        let err: ClientError = PayloadError::missing("data").into();
        assert_eq!(err.to_string(), "Malformed response: missing data");
        assert!(matches!(
            err,
            ClientError::MalformedPayload(PayloadError::MissingField(ref f)) if f == "data"
        ));
    }
}
