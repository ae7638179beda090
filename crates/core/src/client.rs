//! Calls to the hosted text-generation endpoint.
//!
//! [`GenerationClient`] is a single attempt. [`generate_with_retry`] wraps any
//! client with a fixed number of attempts and a fixed pause between them, and
//! reports exhaustion as a typed [`GenerationError`] instead of panicking.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{config::Provider, error::Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const TEMPERATURE: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Connection, TLS or timeout problems.
    Transport,
    /// The endpoint answered with a non-success status.
    Api { status: u16 },
    /// The endpoint answered but the payload had no generated text.
    MalformedResponse,
}

/// Why one attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl AttemptFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// All attempts failed; carries the last failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("Error: Unable to generate content after {attempts} attempts. {message}")]
pub struct GenerationError {
    pub kind: FailureKind,
    pub message: String,
    pub attempts: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Pause between consecutive attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// One request/response round trip for a single prompt.
    async fn generate(&self, prompt: &str) -> std::result::Result<String, AttemptFailure>;
}

/// Runs `client` until it succeeds or `policy.max_attempts` attempts were made.
pub async fn generate_with_retry<C: GenerationClient + ?Sized>(
    client: &C,
    prompt: &str,
    policy: &RetryPolicy,
) -> std::result::Result<String, GenerationError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut last_failure = None;

    for attempt in 1..=max_attempts {
        match client.generate(prompt).await {
            Ok(text) => {
                debug!(attempt, chars = text.len(), "generation succeeded");
                return Ok(text.trim().to_string());
            }
            Err(failure) => {
                warn!(attempt, max_attempts, error = %failure, "generation attempt failed");
                last_failure = Some(failure);
                if attempt < max_attempts {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    let AttemptFailure { kind, message } = last_failure
        .unwrap_or_else(|| AttemptFailure::new(FailureKind::Transport, "no attempt was made"));
    Err(GenerationError {
        kind,
        message,
        attempts: max_attempts,
    })
}

/// [`GenerationClient`] for OpenAI-compatible `/chat/completions` endpoints.
#[derive(Clone)]
pub struct HttpGenerationClient {
    api_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl fmt::Debug for HttpGenerationClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpGenerationClient")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl HttpGenerationClient {
    pub fn new(
        api_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            api_url: api_url.into(),
            model: model.into(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Client for `provider`'s endpoint, optionally overriding its default model.
    pub fn for_provider(provider: Provider, api_key: String, model: Option<String>) -> Result<Self> {
        let endpoint = provider.endpoint();
        Self::new(
            endpoint.chat_url,
            model.unwrap_or_else(|| endpoint.default_model.to_string()),
            api_key,
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, AttemptFailure> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({
                "model": self.model,
                "messages": [
                    {
                        "role": "user",
                        "content": prompt,
                    },
                ],
                "temperature": TEMPERATURE,
            }))
            .send()
            .await
            .map_err(|e| AttemptFailure::new(FailureKind::Transport, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AttemptFailure::new(
                FailureKind::Api {
                    status: status.as_u16(),
                },
                format!("API error ({}): {}", status.as_u16(), body.trim()),
            ));
        }

        let body = response.json::<serde_json::Value>().await.map_err(|e| {
            AttemptFailure::new(
                FailureKind::MalformedResponse,
                format!("Invalid API response: {e}"),
            )
        })?;

        body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                AttemptFailure::new(
                    FailureKind::MalformedResponse,
                    format!("Invalid API response: {body}"),
                )
            })
    }
}
