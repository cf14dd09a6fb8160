//! HTTP verification client against an in-process fake service

use axum::extract::{Multipart, Query};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use landmark_bot::catalog::Catalog;
use landmark_bot::dialogue::Dialogue;
use landmark_bot::models::{InboundMessage, UserId, VerificationOutcome};
use landmark_bot::state::{InMemorySessionStore, SessionState};
use landmark_bot::verification::{HttpVerifier, Verifier};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Deserialize)]
struct VerifyQuery {
    target: String,
}

/// Answers according to the requested target:
/// - `dom_voronsova`: 200 with a result describing the upload
/// - `wrong`: 400
/// - `crash`: 500 with an error payload
/// - `silent`: 503 with no body
/// - `empty`: 200 without a result
/// - `slow`: waits before answering
async fn fake_verify(
    Query(query): Query<VerifyQuery>,
    mut multipart: Multipart,
) -> (StatusCode, Json<serde_json::Value>) {
    let mut image = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("image") {
            let described = format!(
                "{}|{}",
                field.file_name().unwrap_or_default(),
                field.content_type().unwrap_or_default()
            );
            let bytes = field.bytes().await.unwrap_or_default();
            image = Some((described, bytes.len()));
        }
    }

    let Some((described, len)) = image else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "error": "no image" })),
        );
    };

    match query.target.as_str() {
        "wrong" => (StatusCode::BAD_REQUEST, Json(serde_json::json!({}))),
        "crash" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "model crashed" })),
        ),
        "silent" => (StatusCode::SERVICE_UNAVAILABLE, Json(serde_json::Value::Null)),
        "empty" => (StatusCode::OK, Json(serde_json::json!({ "status": "ok" }))),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            (StatusCode::OK, Json(serde_json::json!({ "result": "late" })))
        }
        target => (
            StatusCode::OK,
            Json(serde_json::json!({
                "result": format!("{} {} {} bytes", target, described, len)
            })),
        ),
    }
}

async fn spawn_fake_service() -> String {
    let router = Router::new().route("/verify", post(fake_verify));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

fn photo() -> Vec<u8> {
    vec![0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10]
}

#[tokio::test]
async fn test_matched_carries_result_and_upload_shape() {
    let base = spawn_fake_service().await;
    let verifier = HttpVerifier::new(base, Duration::from_secs(5)).unwrap();

    let outcome = verifier.verify("dom_voronsova", photo()).await;

    assert_eq!(
        outcome,
        VerificationOutcome::Matched("dom_voronsova photo.jpg|image/jpeg 6 bytes".to_string())
    );
}

#[tokio::test]
async fn test_bad_request_is_rejected_every_time() {
    let base = spawn_fake_service().await;
    let verifier = HttpVerifier::new(base, Duration::from_secs(5)).unwrap();

    for _ in 0..2 {
        assert_eq!(
            verifier.verify("wrong", photo()).await,
            VerificationOutcome::Rejected
        );
    }
}

#[tokio::test]
async fn test_service_errors_fail_with_detail() {
    let base = spawn_fake_service().await;
    let verifier = HttpVerifier::new(base, Duration::from_secs(5)).unwrap();

    assert_eq!(
        verifier.verify("crash", photo()).await,
        VerificationOutcome::Failed("model crashed".to_string())
    );
    assert_eq!(
        verifier.verify("silent", photo()).await,
        VerificationOutcome::Failed("unknown error (HTTP 503)".to_string())
    );
    assert!(matches!(
        verifier.verify("empty", photo()).await,
        VerificationOutcome::Failed(_)
    ));
}

#[tokio::test]
async fn test_connection_refused_is_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let verifier = HttpVerifier::new(format!("http://{}", addr), Duration::from_secs(2)).unwrap();

    match verifier.verify("dom_voronsova", photo()).await {
        VerificationOutcome::Failed(detail) => {
            assert!(detail.starts_with("could not reach verification service"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_timeout_is_failure() {
    let base = spawn_fake_service().await;
    let verifier = HttpVerifier::new(base, Duration::from_millis(200)).unwrap();

    match verifier.verify("slow", photo()).await {
        VerificationOutcome::Failed(detail) => {
            assert!(detail.starts_with("could not reach verification service"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_dialogue_recovers_when_service_is_down() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let verifier = HttpVerifier::new(format!("http://{}", addr), Duration::from_secs(2)).unwrap();
    let catalog = Arc::new(Catalog::landmarks().unwrap());
    let dialogue = Dialogue::new(
        catalog.clone(),
        Arc::new(InMemorySessionStore::new()),
        Arc::new(verifier),
    );
    let user = UserId::from_external("chat-offline");

    for text in ["/start", "🚀 Start", "Vorontsov House"] {
        dialogue
            .handle(user, InboundMessage::Text(text.to_string()))
            .await;
    }

    let reply = dialogue.handle(user, InboundMessage::Photo(photo())).await;

    assert!(reply.text.contains("Verification failed"));
    assert!(reply.text.contains("could not reach verification service"));
    assert_eq!(reply.options(), catalog.names().as_slice());

    let session = dialogue.sessions().snapshot(user).await.unwrap();
    assert_eq!(session, SessionState::AwaitingSelection);
    assert_eq!(session.selected_item(), None);
}
