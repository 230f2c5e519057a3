//! Model invocation client.

mod client;
mod extract;
mod retry;

pub use client::{
    GeminiClient, GeminiError, InvokeConfig, DEFAULT_MAX_ATTEMPTS_PER_MODEL,
    DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE,
};
pub use extract::{block_reason, extract_text};
pub use retry::Backoff;
