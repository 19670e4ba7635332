use axum::body::Body;
use axum::http::{Request, StatusCode};
use httpmock::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use zbenya_site::config::NotificationConfig;
use zbenya_site::{build_notifier, build_router, MemStorage, RouterOptions, SubmissionService};

fn notification_config(endpoint: String) -> NotificationConfig {
    NotificationConfig {
        enabled: true,
        endpoint: Some(endpoint),
        api_key: None,
        sender: "Website <noreply@example.com>".to_string(),
        recipient: "contact@example.com".to_string(),
        timeout_seconds: 5,
    }
}

async fn post_contact(app: axum::Router) -> anyhow::Result<(StatusCode, Value)> {
    let payload = json!({
        "name": "Jo Tan",
        "email": "jo@example.com",
        "subject": "Website redesign",
        "message": "Could you send a quote for a redesign?"
    });
    let request = Request::builder()
        .method("POST")
        .uri("/api/contact")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))?;

    let response = app.oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

#[tokio::test]
async fn test_contact_submission_posts_to_mail_relay() -> anyhow::Result<()> {
    let server = MockServer::start();
    let relay_mock = server.mock(|when, then| {
        when.method(POST).path("/send").json_body_partial(
            r#"{"subject": "New Contact Form Submission: Website redesign", "replyTo": "jo@example.com"}"#,
        );
        then.status(200);
    });

    let notifier = build_notifier(&notification_config(server.url("/send")))?;
    let service = SubmissionService::new(Arc::new(MemStorage::new()), notifier);
    let app = build_router(Arc::new(service), RouterOptions::default());

    let (status, body) = post_contact(app).await?;

    relay_mock.assert();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], 1);
    Ok(())
}

#[tokio::test]
async fn test_relay_failure_still_returns_created() -> anyhow::Result<()> {
    let server = MockServer::start();
    let relay_mock = server.mock(|when, then| {
        when.method(POST).path("/send");
        then.status(503).body("relay overloaded");
    });

    let storage = Arc::new(MemStorage::new());
    let notifier = build_notifier(&notification_config(server.url("/send")))?;
    let service = Arc::new(SubmissionService::new(storage, notifier));
    let app = build_router(service.clone(), RouterOptions::default());

    let (status, body) = post_contact(app).await?;

    // exactly one attempt, no retry
    relay_mock.assert_hits(1);
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Contact message submitted successfully");
    assert_eq!(service.contact_messages().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_relay_still_returns_created() -> anyhow::Result<()> {
    // nothing listens on port 9 (discard) in the test environment
    let notifier = build_notifier(&notification_config("http://127.0.0.1:9/send".to_string()))?;
    let service = SubmissionService::new(Arc::new(MemStorage::new()), notifier);
    let app = build_router(Arc::new(service), RouterOptions::default());

    let (status, _) = post_contact(app).await?;

    assert_eq!(status, StatusCode::CREATED);
    Ok(())
}
