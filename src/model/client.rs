//! Model invocation client with multi-model fallback and bounded retries.

use reqwest::{header, Client, StatusCode};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::config;
use crate::model::extract::{block_reason, extract_text};
use crate::model::retry::Backoff;

/// Default number of attempts per candidate model.
pub const DEFAULT_MAX_ATTEMPTS_PER_MODEL: u32 = 3;

/// Default output length bound sent in the generation config.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8192;

/// Default sampling temperature, kept low for determinism.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Recorded error bodies are truncated to this many bytes.
const BODY_SNIPPET_LIMIT: usize = 1000;

/// How many recorded errors the terminal fault message carries.
const AGGREGATED_ERROR_TAIL: usize = 3;

/// Terminal faults surfaced to the caller. Intermediate per-attempt
/// failures are accumulated as strings and only cross the boundary inside
/// [`GeminiError::AllModelsFailed`].
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("missing API key")]
    MissingApiKey,
    #[error("all candidate models failed; last errors: {0}")]
    AllModelsFailed(String),
}

/// Configuration for the invocation client.
#[derive(Debug, Clone)]
pub struct InvokeConfig {
    /// Base URL of the generation API.
    pub base_url: String,
    /// Candidate models, tried in order.
    pub models: Vec<String>,
    /// Maximum attempts per model before falling through to the next one.
    pub max_attempts_per_model: u32,
    /// Output length bound sent with every request.
    pub max_output_tokens: u32,
    /// Sampling temperature sent with every request.
    pub temperature: f32,
    /// Backoff profile for rate-limit and overload responses.
    pub rate_limit_backoff: Backoff,
    /// Backoff profile for transport-level errors.
    pub transport_backoff: Backoff,
}

impl Default for InvokeConfig {
    fn default() -> Self {
        Self {
            base_url: config::DEFAULT_BASE_URL.to_string(),
            models: config::default_models(),
            max_attempts_per_model: DEFAULT_MAX_ATTEMPTS_PER_MODEL,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            rate_limit_backoff: Backoff::rate_limit(),
            transport_backoff: Backoff::transport(),
        }
    }
}

impl InvokeConfig {
    /// Default configuration with the candidate list taken from the
    /// `GEMINI_MODEL` environment override when set.
    pub fn from_env() -> Self {
        Self {
            models: config::candidate_models(),
            ..Self::default()
        }
    }

    /// Set a custom base URL (e.g. a local mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the candidate model list.
    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    /// Set the maximum attempts per model.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts_per_model = max_attempts;
        self
    }

    /// Set the output length bound.
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Override both backoff profiles. Tests use millisecond-scale
    /// profiles so retries do not slow the suite down.
    pub fn with_backoff(mut self, rate_limit: Backoff, transport: Backoff) -> Self {
        self.rate_limit_backoff = rate_limit;
        self.transport_backoff = transport;
        self
    }
}

/// Outcome of a single attempt against one model.
enum Outcome {
    /// Usable answer text; stop immediately.
    Text(String),
    /// Provider blocked the prompt; reported to the user, not an error.
    Blocked(String),
    /// 429/503; retry the same model after backoff.
    RateLimited(String),
    /// Non-retryable failure; fall through to the next model.
    Failed(String),
}

/// Client for the Gemini `generateContent` endpoint.
///
/// Stateless across invocations; safe to share between tasks.
pub struct GeminiClient {
    config: InvokeConfig,
    client: Client,
}

impl GeminiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: InvokeConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Create a new client with default configuration and the
    /// environment model override applied.
    pub fn from_env() -> Self {
        Self::new(InvokeConfig::from_env())
    }

    /// The active configuration.
    pub fn config(&self) -> &InvokeConfig {
        &self.config
    }

    /// Send a prompt through the candidate models in priority order.
    ///
    /// Transient faults (429/503, transport errors) are retried per model
    /// with exponential backoff and jitter; anything else advances to the
    /// next candidate. Returns the first extracted answer text, or an
    /// aggregated fault once every candidate is exhausted.
    pub async fn invoke(&self, prompt: &str, api_key: &str) -> Result<String, GeminiError> {
        if api_key.is_empty() {
            return Err(GeminiError::MissingApiKey);
        }

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "maxOutputTokens": self.config.max_output_tokens,
                "temperature": self.config.temperature,
            }
        });

        let max_attempts = self.config.max_attempts_per_model;
        let mut errors: Vec<String> = Vec::new();

        for model in &self.config.models {
            let url = format!(
                "{}/models/{}:generateContent?key={}",
                self.config.base_url, model, api_key
            );

            'attempts: for attempt in 1..=max_attempts {
                debug!(model = %model, attempt, max_attempts, "sending generation request");

                match self.attempt(&url, &body, model).await {
                    Ok(Outcome::Text(text)) => return Ok(text),
                    Ok(Outcome::Blocked(reason)) => {
                        warn!(model = %model, reason = %reason, "response blocked by provider policy");
                        return Ok(format!(
                            "My response was blocked for the following reason: {reason}. \
                             Please try a different prompt."
                        ));
                    }
                    Ok(Outcome::RateLimited(msg)) => {
                        warn!(model = %model, attempt, "rate limited: {msg}");
                        errors.push(msg);
                        if attempt < max_attempts {
                            sleep(self.config.rate_limit_backoff.delay(attempt)).await;
                        }
                    }
                    Ok(Outcome::Failed(msg)) => {
                        warn!(model = %model, "non-retryable failure: {msg}");
                        errors.push(msg);
                        break 'attempts;
                    }
                    Err(err) => {
                        let msg = format!("attempt {attempt} for model {model} failed: {err}");
                        warn!(model = %model, attempt, "transport error: {err}");
                        errors.push(msg);
                        if attempt < max_attempts {
                            sleep(self.config.transport_backoff.delay(attempt)).await;
                        }
                    }
                }
            }
        }

        let aggregated = aggregate_errors(&errors);
        error!("all candidate models failed: {aggregated}");
        Err(GeminiError::AllModelsFailed(aggregated))
    }

    /// One request against one model. Transport errors come back as
    /// `Err`; everything the server actually said comes back as an
    /// [`Outcome`].
    async fn attempt(
        &self,
        url: &str,
        body: &Value,
        model: &str,
    ) -> Result<Outcome, reqwest::Error> {
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE {
            let text = response.text().await.unwrap_or_default();
            return Ok(Outcome::RateLimited(format!(
                "model {model} returned {}: {}",
                status.as_u16(),
                body_snippet(&text)
            )));
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Ok(Outcome::Failed(format!(
                "model {model} returned {}: {}",
                status.as_u16(),
                body_snippet(&text)
            )));
        }

        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("application/json"))
            .unwrap_or(false);
        let text = response.text().await?;

        if !is_json {
            // The service occasionally answers with a plain text payload.
            if !text.is_empty() {
                return Ok(Outcome::Text(text));
            }
            return Ok(Outcome::Failed(format!(
                "model {model} returned an unexpected non-JSON empty response"
            )));
        }

        let data: Value = match serde_json::from_str(&text) {
            Ok(data) => data,
            Err(err) => {
                return Ok(Outcome::Failed(format!(
                    "model {model} returned unparseable JSON: {err}"
                )))
            }
        };

        if let Some(answer) = extract_text(&data) {
            return Ok(Outcome::Text(answer));
        }

        if let Some(reason) = block_reason(&data) {
            return Ok(Outcome::Blocked(reason.to_string()));
        }

        Ok(Outcome::Failed(format!(
            "model {model} returned a response but no text could be extracted"
        )))
    }
}

/// Join the tail of the recorded errors into one bounded message.
fn aggregate_errors(errors: &[String]) -> String {
    if errors.is_empty() {
        return "no errors recorded".to_string();
    }
    let tail_start = errors.len().saturating_sub(AGGREGATED_ERROR_TAIL);
    errors[tail_start..].join(" | ")
}

/// Truncate a response body for inclusion in an error message.
fn body_snippet(text: &str) -> &str {
    if text.is_empty() {
        return "<empty body>";
    }
    let mut end = text.len().min(BODY_SNIPPET_LIMIT);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
