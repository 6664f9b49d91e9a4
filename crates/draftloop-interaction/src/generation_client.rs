//! HttpGenerationClient - REST client for the generation service.
//!
//! Talks to `POST /generate` and `POST /update` and normalizes every
//! outcome into [`draftloop_core::service`] types. No retries are performed.

use async_trait::async_trait;
use draftloop_core::config::ClientConfig;
use draftloop_core::draft::{Draft, GenerationInputs, RetrievedContext};
use draftloop_core::error::{DraftloopError, Result};
use draftloop_core::service::{Decision, GeneratedDraft, GenerationService, UpdateOutcome};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const GENERATE_FALLBACK_MESSAGE: &str = "Failed to generate email";
pub const UPDATE_FALLBACK_MESSAGE: &str = "Failed to update email";

/// [`GenerationService`] implementation that talks to the service over HTTP.
#[derive(Clone)]
pub struct HttpGenerationClient {
    client: Client,
    base_url: String,
}

impl HttpGenerationClient {
    /// Creates a client for the given base URL with default transport settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_base_url(base_url.into()),
        }
    }

    /// Builds a client from configuration, applying the optional request timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|err| DraftloopError::config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: normalize_base_url(config.base_url.clone()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn post_json<B, R>(&self, path: &str, body: &B, fallback: &str) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        tracing::debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| DraftloopError::transport(format!("Request to {url} failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body_text, fallback));
        }

        response.json::<R>().await.map_err(|err| DraftloopError::Serialization {
            format: "JSON".to_string(),
            message: format!("Failed to parse response from {url}: {err}"),
        })
    }
}

#[async_trait]
impl GenerationService for HttpGenerationClient {
    async fn generate(&self, inputs: &GenerationInputs) -> Result<GeneratedDraft> {
        let request = GenerateRequest::from(inputs);
        let response: GenerateResponse = self
            .post_json("generate", &request, GENERATE_FALLBACK_MESSAGE)
            .await?;

        Ok(response.into())
    }

    async fn update(
        &self,
        thread_id: &str,
        decision: Decision,
        feedback: Option<&str>,
    ) -> Result<UpdateOutcome> {
        let request = UpdateRequest {
            thread_id,
            decision,
            feedback: match decision {
                Decision::Regenerate => feedback,
                Decision::Approve => None,
            },
        };
        let response: UpdateResponse = self
            .post_json("update", &request, UPDATE_FALLBACK_MESSAGE)
            .await?;

        if let Some(is_done) = response.is_done {
            tracing::debug!(thread_id, is_done, "Update acknowledged");
        }
        Ok(response.into())
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    #[serde(rename = "leadId")]
    lead_id: &'a str,
    #[serde(rename = "userId")]
    user_id: &'a str,
    user_instructions: &'a str,
}

impl<'a> From<&'a GenerationInputs> for GenerateRequest<'a> {
    fn from(inputs: &'a GenerationInputs) -> Self {
        Self {
            lead_id: &inputs.lead_id,
            user_id: &inputs.user_id,
            user_instructions: &inputs.instructions,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    email: Draft,
    thread_id: String,
    #[serde(rename = "retrievedData", default)]
    retrieved_data: Option<RetrievedContext>,
}

impl From<GenerateResponse> for GeneratedDraft {
    fn from(response: GenerateResponse) -> Self {
        Self {
            draft: response.email,
            thread_id: response.thread_id,
            retrieved_context: response.retrieved_data,
        }
    }
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    thread_id: &'a str,
    decision: Decision,
    feedback: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct UpdateResponse {
    #[serde(default)]
    email: Option<Draft>,
    #[serde(default)]
    message: String,
    #[allow(dead_code)]
    #[serde(default)]
    thread_id: Option<String>,
    #[serde(default)]
    is_done: Option<bool>,
}

impl From<UpdateResponse> for UpdateOutcome {
    fn from(response: UpdateResponse) -> Self {
        Self {
            draft: response.email,
            message: response.message,
            is_done: response.is_done,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

// ============================================================================
// Helpers
// ============================================================================

fn normalize_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Pulls the human-readable message out of an error body.
///
/// Only a string `detail` is used; validation errors carry a list there and,
/// like bodies that are not JSON at all, fall back to `fallback`.
pub fn extract_error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|error| match error.detail {
            Some(serde_json::Value::String(detail)) if !detail.is_empty() => Some(detail),
            _ => None,
        })
        .unwrap_or_else(|| fallback.to_string())
}

fn map_http_error(status: StatusCode, body: &str, fallback: &str) -> DraftloopError {
    let message = extract_error_message(body, fallback);
    tracing::warn!(status = status.as_u16(), %message, "Generation service returned an error");
    DraftloopError::remote(Some(status.as_u16()), message)
}
