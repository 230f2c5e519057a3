//! # Gemini Relay
//!
//! A small, resilient client for the Gemini `generateContent` API.
//!
//! The client takes a prompt and a user-supplied API key, tries an ordered
//! list of candidate models, and for each model performs bounded retries
//! with exponential backoff and jitter on transient faults (rate limiting,
//! overload, transport errors). Non-retryable failures fall through to the
//! next candidate. When every candidate is exhausted the caller gets one
//! aggregated error carrying the last few recorded failures.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gemini_relay::{GeminiClient, InvokeConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GeminiClient::new(InvokeConfig::from_env());
//!     let reply = client.invoke("Say hello.", "my-api-key").await?;
//!
//!     println!("{}", reply);
//!     Ok(())
//! }
//! ```
//!
//! The candidate list defaults to `gemini-2.5-flash` then `gemini-2.5-pro`
//! and can be overridden with a comma-separated `GEMINI_MODEL` environment
//! variable.

pub mod config;
pub mod model;

pub use config::{candidate_models, parse_model_list, DEFAULT_BASE_URL, DEFAULT_MODELS};
pub use model::{Backoff, GeminiClient, GeminiError, InvokeConfig};
