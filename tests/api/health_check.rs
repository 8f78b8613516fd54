//! Tests whether the 'health-check' route returns an appropriate status code

use anyhow::Result;
use reqwest::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn healthcheck_ok() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.http_client.get(app.url("/health-check")).send().await?;

    assert!(res.status() == StatusCode::OK, "Healthcheck FAILED!");
    assert!(app.store.is_empty()?);

    Ok(())
}

#[tokio::test]
async fn every_response_carries_a_request_id() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.http_client.get(app.url("/health-check")).send().await?;
    let request_id = res
        .headers()
        .get("x-request-id")
        .map(|id| id.to_str())
        .transpose()?;

    assert!(
        request_id.is_some_and(|id| uuid::Uuid::parse_str(id).is_ok()),
        "missing or invalid x-request-id: {request_id:?}"
    );

    Ok(())
}

#[tokio::test]
async fn preflight_on_health_check_path_is_answered() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .http_client
        .request(reqwest::Method::OPTIONS, app.url("/health-check"))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get("access-control-allow-methods")
            .and_then(|v| v.to_str().ok()),
        Some("POST, OPTIONS")
    );

    Ok(())
}
