//! Response classification: decode first, then judge the status code.
//!
//! # Design
//! A body that is not JSON is reported as `InvalidResponse` even when the
//! status is an error, so a plain-text 404 never masquerades as an API
//! error. Only a well-formed JSON body on a non-2xx status yields `Api`,
//! carrying the body's `error` field when there is one.

use serde_json::{Map, Value};

use crate::error::{ClientError, PayloadError};
use crate::http::HttpResponse;

/// Decode and classify a response, returning the JSON object on success.
///
/// An empty body (or a literal `null`) decodes to an empty object. A body of
/// only whitespace is not empty and fails to decode.
pub fn classify(response: &HttpResponse) -> Result<Map<String, Value>, ClientError> {
    let decoded = decode_body(response)?;

    if !(200..300).contains(&response.status) {
        return Err(ClientError::Api {
            status: response.status,
            message: error_message(response.status, &decoded),
        });
    }

    match decoded {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(PayloadError::NotAnObject(json_kind(&other)).into()),
    }
}

fn decode_body(response: &HttpResponse) -> Result<Value, ClientError> {
    if response.body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&response.body).map_err(|e| ClientError::InvalidResponse {
        status: response.status,
        url: response.url.clone(),
        message: e.to_string(),
    })
}

/// `error` from the body when present; strings verbatim, other values as
/// compact JSON.
fn error_message(status: u16, body: &Value) -> String {
    match body.get("error") {
        Some(Value::String(msg)) => msg.clone(),
        Some(Value::Null) | None => format!("Unexpected status code {status}"),
        Some(other) => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Headers;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            url: "https://reqres.in/api/users/9999".to_string(),
            headers: Headers::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn success_returns_object() {
        let map = classify(&response(200, r#"{"data":{"id":2}}"#)).unwrap();
        assert_eq!(map["data"]["id"], 2);
    }

    #[test]
    fn empty_body_is_empty_object() {
        assert!(classify(&response(204, "")).unwrap().is_empty());
    }

    #[test]
    fn whitespace_body_is_invalid_response() {
        let err = classify(&response(200, "  \n")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse { status: 200, .. }));

        let err = classify(&response(500, "  ")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse { status: 500, .. }));
    }

    #[test]
    fn invalid_json_on_success_is_invalid_response() {
        let err = classify(&response(200, "<<<not json>>>")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse { status: 200, .. }));
    }

    // Decode errors outrank status errors.
    #[test]
    fn invalid_json_on_404_is_invalid_response_not_api_error() {
        let err = classify(&response(404, "Not found")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse { status: 404, .. }));
        let msg = err.to_string();
        assert!(msg.contains("Invalid JSON"));
        assert!(msg.contains("/users/9999"));
    }

    #[test]
    fn error_field_becomes_api_message() {
        let err = classify(&response(401, r#"{"error":"Missing API key"}"#)).unwrap_err();
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Missing API key");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn json_without_error_field_gets_generic_message() {
        let err = classify(&response(404, "{}")).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Api { status: 404, ref message } if message == "Unexpected status code 404"
        ));
    }

    #[test]
    fn empty_error_body_gets_generic_message() {
        let err = classify(&response(503, "")).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Api { ref message, .. } if message == "Unexpected status code 503"
        ));
    }

    #[test]
    fn nested_error_field_is_stringified() {
        let err = classify(&response(400, r#"{"error":{"code":"E1","detail":"bad"}}"#)).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Api { ref message, .. } if message == r#"{"code":"E1","detail":"bad"}"#
        ));
    }

    #[test]
    fn redirect_status_is_api_error() {
        let err = classify(&response(302, "{}")).unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 302, .. }));
    }

    #[test]
    fn non_object_success_is_malformed() {
        let err = classify(&response(200, "[1,2]")).unwrap_err();
        assert!(matches!(
            err,
            ClientError::MalformedPayload(PayloadError::NotAnObject("array"))
        ));
    }
}
