use std::sync::Arc;

use axum::{
    http::{Method, Uri},
    response::Response,
};
use uuid::Uuid;

use crate::web::{log, Error, REQUEST_ID_HEADER};

/// Logs a single line per request. Errors are already rendered by the handler, so the response
/// passes through untouched.
pub async fn response_mapper(req_method: Method, uri: Uri, resp: Response) -> Response {
    let uuid = resp
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|id| id.to_str().ok())
        .and_then(|id| Uuid::parse_str(id).ok())
        .unwrap_or_else(Uuid::new_v4);

    let web_error = resp.extensions().get::<Arc<Error>>().map(|er| er.as_ref());

    log::log_request(uuid, req_method, uri, resp.status(), web_error);

    resp
}
