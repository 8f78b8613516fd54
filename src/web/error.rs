use axum::{extract::rejection::BytesRejection, http::StatusCode};
use strum_macros::AsRefStr;

use super::types::DataParsingError;
use crate::store::StoreError;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("request body is not valid json: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("data parsing error: {0}")]
    DataParsing(#[from] DataParsingError),

    #[error("unexpected request payload: {0}")]
    UnexpectedPayload(String),
    #[error("request body could not be read: {0}")]
    UnreadableBody(#[from] BytesRejection),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl Error {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        match self {
            Error::InvalidJson(_) => (StatusCode::BAD_REQUEST, ClientError::InvalidJson),
            Error::DataParsing(data_er) => (StatusCode::BAD_REQUEST, (*data_er).into()),
            Error::UnexpectedPayload(_) | Error::UnreadableBody(_) | Error::Store(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ClientError::ServiceError)
            }
        }
    }
}

/// What the caller gets to see. The `Display` impl is the message sent in the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, derive_more::Display)]
pub enum ClientError {
    #[display("Invalid JSON in request body")]
    InvalidJson,
    #[display("Email address is required")]
    EmailRequired,
    #[display("Invalid email address format")]
    InvalidEmailFormat,
    #[display("Internal server error")]
    ServiceError,
}
