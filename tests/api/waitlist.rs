use std::sync::Arc;

use anyhow::Result;
use reqwest::{header::HeaderMap, Method, Response, StatusCode};
use serde_json::{json, Value};

use crate::helpers::{spawn_with_store, FailingStore, TestApp};

fn assert_cors_headers(headers: &HeaderMap) {
    let expected = [
        ("access-control-allow-origin", "*"),
        ("access-control-allow-headers", "Content-Type"),
        ("access-control-allow-methods", "POST, OPTIONS"),
        ("content-type", "application/json"),
    ];

    for (name, value) in expected {
        assert_eq!(
            headers.get(name).and_then(|v| v.to_str().ok()),
            Some(value),
            "wrong or missing header: {name}"
        );
    }
}

async fn status_and_json(res: Response) -> Result<(StatusCode, Value)> {
    let status = res.status();
    assert_cors_headers(res.headers());
    let body = res.json::<Value>().await?;
    Ok((status, body))
}

#[tokio::test]
async fn waitlist_signup_ok() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .post_waitlist(r#"{"email":"jane@example.com"}"#)
        .await?;
    let (status, body) = status_and_json(res).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "message": "Successfully added to waitlist!"})
    );

    assert_eq!(app.store.len()?, 1);
    let entry = app
        .store
        .get("jane@example.com")?
        .expect("entry for jane@example.com");
    assert_eq!(entry.email(), "jane@example.com");
    assert_eq!(entry.source(), "coming-soon-page");
    assert!(chrono::DateTime::parse_from_rfc3339(entry.timestamp()).is_ok());

    Ok(())
}

#[tokio::test]
async fn waitlist_signup_stores_normalized_email() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .post_waitlist(r#"{"email":"  User@Example.COM  "}"#)
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(app.store.get("user@example.com")?.is_some());
    assert!(app.store.get("  User@Example.COM  ")?.is_none());

    Ok(())
}

#[tokio::test]
async fn waitlist_signup_on_any_path() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .http_client
        .post(app.url("/prod/waitlist"))
        .json(&json!({"email": "user@sub.domain.com"}))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(app.store.get("user@sub.domain.com")?.is_some());

    Ok(())
}

#[tokio::test]
async fn waitlist_preflight_returns_headers_only() -> Result<()> {
    let app = TestApp::spawn().await?;

    for (path, body) in [("/", ""), ("/anything/else", "not json")] {
        let res = app
            .http_client
            .request(Method::OPTIONS, app.url(path))
            .header("Origin", "https://example.com")
            .header("Access-Control-Request-Method", "POST")
            .body(body)
            .send()
            .await?;

        assert_eq!(res.status(), StatusCode::OK, "path: {path}");
        assert_cors_headers(res.headers());
        assert!(res.text().await?.is_empty());
    }
    assert!(app.store.is_empty()?);

    Ok(())
}

#[tokio::test]
async fn waitlist_returns_a_400_for_invalid_requests() -> Result<()> {
    let app = TestApp::spawn().await?;

    let cases = [
        ("not json", "Invalid JSON in request body", "Invalid json"),
        ("", "Invalid JSON in request body", "Empty body"),
        ("{}", "Email address is required", "Empty json"),
        (
            r#"{"email":"   "}"#,
            "Email address is required",
            "Whitespace email",
        ),
        (
            r#"{"name":"Jane"}"#,
            "Email address is required",
            "Missing email",
        ),
        (
            r#"{"email":"not-an-email"}"#,
            "Invalid email address format",
            "Missing @",
        ),
        (
            r#"{"email":"user@domain"}"#,
            "Invalid email address format",
            "No dot after @",
        ),
    ];

    for (body, message, description) in cases {
        let res = app.post_waitlist(body).await?;
        let (status, json_body) = status_and_json(res).await?;

        assert_eq!(
            status,
            StatusCode::BAD_REQUEST,
            "The API did not return a 400 BAD REQUEST, the payload was: {description}."
        );
        assert_eq!(
            json_body,
            json!({"success": false, "message": message}),
            "Wrong body for: {description}"
        );
    }

    assert!(app.store.is_empty()?, "nothing should have been stored");

    Ok(())
}

#[tokio::test]
async fn waitlist_returns_a_500_when_the_store_fails() -> Result<()> {
    let addr = spawn_with_store(Arc::new(FailingStore)).await?;

    let res = reqwest::Client::new()
        .post(format!("http://{addr}/"))
        .body(r#"{"email":"jane@example.com"}"#)
        .send()
        .await?;
    let (status, body) = status_and_json(res).await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"success": false, "message": "Internal server error"})
    );

    Ok(())
}

#[tokio::test]
async fn waitlist_returns_a_500_for_unexpected_payloads() -> Result<()> {
    let app = TestApp::spawn().await?;

    for body in [r#"["jane@example.com"]"#, r#"{"email": null}"#] {
        let res = app.post_waitlist(body).await?;
        let (status, json_body) = status_and_json(res).await?;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "body: {body}");
        assert_eq!(
            json_body,
            json!({"success": false, "message": "Internal server error"})
        );
    }

    assert!(app.store.is_empty()?);

    Ok(())
}

#[tokio::test]
async fn waitlist_repeated_signup_overwrites() -> Result<()> {
    let app = TestApp::spawn().await?;

    for email in ["jane@example.com", "JANE@example.com", "john@example.com"] {
        let res = app
            .http_client
            .post(app.url("/"))
            .json(&json!({ "email": email }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
    }

    assert_eq!(app.store.len()?, 2);

    Ok(())
}

#[tokio::test]
async fn waitlist_returns_a_500_for_an_oversized_body() -> Result<()> {
    let app = TestApp::spawn().await?;

    let padding = "x".repeat(3 * 1024 * 1024);
    let body = json!({"email": "jane@example.com", "pad": padding}).to_string();

    let res = app.post_waitlist(body).await?;
    let (status, json_body) = status_and_json(res).await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body,
        json!({"success": false, "message": "Internal server error"})
    );
    assert!(app.store.is_empty()?);

    Ok(())
}
