//! Verification client for the remote landmark-matching service
//!
//! One request per attempt: `POST /verify?target=<id>` with the photo as a
//! multipart `image` field. Every response, and every transport failure,
//! resolves to a `VerificationOutcome`; nothing escapes as an error.

use crate::models::VerificationOutcome;
use crate::Result;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{info, warn};

const NO_RESULT_FALLBACK: &str = "no result in verification response";

/// Anything that can give a verdict on a photo of a landmark
#[async_trait::async_trait]
pub trait Verifier: Send + Sync {
    async fn verify(&self, target: &str, photo: Vec<u8>) -> VerificationOutcome;
}

/// HTTP client for the verification service
pub struct HttpVerifier {
    client: Client,
    base_url: String,
}

impl HttpVerifier {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/verify", self.base_url)
    }

    async fn send(&self, target: &str, photo: Vec<u8>) -> reqwest::Result<(StatusCode, String)> {
        let part = Part::bytes(photo)
            .file_name("photo.jpg")
            .mime_str("image/jpeg")?;
        let form = Form::new().part("image", part);

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("target", target)])
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}

#[async_trait::async_trait]
impl Verifier for HttpVerifier {
    async fn verify(&self, target: &str, photo: Vec<u8>) -> VerificationOutcome {
        let photo_bytes = photo.len();
        let photo_sha256 = hex::encode(Sha256::digest(&photo));

        info!(
            landmark = %target,
            photo_bytes,
            photo_sha256 = %photo_sha256,
            "Sending photo for verification"
        );

        let outcome = match self.send(target, photo).await {
            Ok((status, body)) => outcome_from_response(status.as_u16(), &body),
            Err(e) => {
                warn!(landmark = %target, error = %e, "Verification service unreachable");
                VerificationOutcome::Failed(format!(
                    "could not reach verification service: {}",
                    e
                ))
            }
        };

        info!(landmark = %target, outcome = outcome.kind(), "Verification finished");
        outcome
    }
}

#[derive(Debug, Default, Deserialize)]
struct VerifyPayload {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Map a service response to an outcome. Total over all inputs.
pub fn outcome_from_response(status: u16, body: &str) -> VerificationOutcome {
    if status == 400 {
        return VerificationOutcome::Rejected;
    }

    let payload: VerifyPayload = serde_json::from_str(body).unwrap_or_default();

    if status == 200 {
        return match payload.result.as_ref().and_then(text_of) {
            Some(result) => VerificationOutcome::Matched(result),
            None => VerificationOutcome::Failed(
                payload
                    .error
                    .as_ref()
                    .and_then(text_of)
                    .unwrap_or_else(|| NO_RESULT_FALLBACK.to_string()),
            ),
        };
    }

    VerificationOutcome::Failed(
        payload
            .error
            .as_ref()
            .and_then(text_of)
            .unwrap_or_else(|| format!("unknown error (HTTP {})", status)),
    )
}

/// Strings are taken as-is; other scalars are rendered, null is absent
fn text_of(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
