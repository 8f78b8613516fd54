//! Most of the structs in `web` module and their implementations live here.
//! Includes the request and response of the intake handler, the signup payload and the email
//! that gets validated out of it.

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::rejection::BytesRejection,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ClientError, Error};

// ###################################
// ->   REQUEST
// ###################################
/// Everything the intake handler looks at in an incoming request.
///
/// The body is kept as the extraction result so that a body that could not be read
/// (too large, connection dropped) still reaches the handler and gets a proper reply.
#[derive(Debug)]
pub struct IntakeRequest {
    pub method: Method,
    pub body: Result<Bytes, BytesRejection>,
}

impl IntakeRequest {
    pub fn new(method: Method, body: impl Into<Bytes>) -> Self {
        IntakeRequest {
            method,
            body: Ok(body.into()),
        }
    }

    pub fn unreadable(method: Method, rejection: BytesRejection) -> Self {
        IntakeRequest {
            method,
            body: Err(rejection),
        }
    }

    pub fn post(body: impl Into<Bytes>) -> Self {
        Self::new(Method::POST, body)
    }

    pub fn is_preflight(&self) -> bool {
        self.method == Method::OPTIONS
    }
}

/// Deserializable signup payload. Fields other than `email` are ignored.
#[derive(Debug, Deserialize)]
pub struct DeserSignup {
    #[serde(default)]
    pub email: String,
}

impl DeserSignup {
    /// Malformed JSON is the caller's fault, well-formed JSON of an unexpected shape
    /// (not an object, `email` that is not a string) is not.
    pub fn from_body(body: &[u8]) -> Result<Self, Error> {
        let value: Value = serde_json::from_slice(body).map_err(Error::InvalidJson)?;
        if !value.is_object() {
            return Err(Error::UnexpectedPayload(format!(
                "expected a json object, got: {}",
                json_kind(&value)
            )));
        }

        serde_json::from_value(value).map_err(|er| Error::UnexpectedPayload(er.to_string()))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Normalized waitlist email: trimmed, lower-cased, non-empty and with a `.` somewhere
/// after the first `@`.
///
/// This is intentionally a loose check, `@example.com` and `user@example.` both pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistEmail(String);

impl AsRef<str> for WaitlistEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl WaitlistEmail {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref().trim().to_lowercase();

        if value.is_empty() {
            return Err(DataParsingError::EmailMissing);
        }

        match value.split_once('@') {
            Some((_, domain)) if domain.contains('.') => Ok(WaitlistEmail(value)),
            _ => Err(DataParsingError::EmailInvalid),
        }
    }
}

// ###################################
// ->   RESPONSE
// ###################################
/// The complete response of the intake handler: status, the fixed CORS headers and the body.
///
/// A failed request keeps its `Error` so that it can be logged further up the stack, it never
/// ends up in the body.
#[derive(Debug)]
pub struct IntakeResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
    pub error: Option<Arc<Error>>,
}

pub const SUCCESS_MESSAGE: &str = "Successfully added to waitlist!";

impl IntakeResponse {
    /// Response to a CORS preflight, headers only.
    pub fn preflight() -> Self {
        IntakeResponse {
            status: StatusCode::OK,
            headers: cors_headers(),
            body: String::new(),
            error: None,
        }
    }

    pub fn success() -> Self {
        IntakeResponse {
            status: StatusCode::OK,
            headers: cors_headers(),
            body: reply_body(true, SUCCESS_MESSAGE),
            error: None,
        }
    }

    pub fn failure(error: Error) -> Self {
        let (status, client_error) = error.status_code_and_client_error();

        IntakeResponse {
            status,
            headers: cors_headers(),
            body: reply_body(false, client_error),
            error: Some(Arc::new(error)),
        }
    }
}

impl IntoResponse for IntakeResponse {
    fn into_response(self) -> Response {
        let mut res = Response::new(Body::from(self.body));
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;

        // Insert the Error into response so that it can be retrieved later.
        if let Some(error) = self.error {
            res.extensions_mut().insert(error);
        }

        res
    }
}

/// The headers every intake response carries, preflight or not.
pub fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(4);
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

fn reply_body(success: bool, message: impl ToString) -> String {
    json!({
        "success": success,
        "message": message.to_string(),
    })
    .to_string()
}

impl From<DataParsingError> for ClientError {
    fn from(value: DataParsingError) -> Self {
        match value {
            DataParsingError::EmailMissing => ClientError::EmailRequired,
            DataParsingError::EmailInvalid => ClientError::InvalidEmailFormat,
        }
    }
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DataParsingError {
    #[error("email missing")]
    EmailMissing,
    #[error("email invalid")]
    EmailInvalid,
}
