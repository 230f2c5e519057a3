//! Configuration for candidate model selection.
//!
//! The candidate list is ordered: the first entry is tried first, and the
//! client only falls through to later entries when an earlier one fails.

use std::env;

/// Built-in candidate models, in priority order.
pub const DEFAULT_MODELS: &[&str] = &["gemini-2.5-flash", "gemini-2.5-pro"];

/// Environment variable holding a comma-separated candidate model override.
pub const MODEL_ENV_VAR: &str = "GEMINI_MODEL";

/// Default base URL of the Gemini REST API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Parse a comma-separated model list into trimmed, non-empty entries.
///
/// Returns `None` when nothing usable remains after trimming, so callers
/// can fall back to [`DEFAULT_MODELS`].
pub fn parse_model_list(raw: &str) -> Option<Vec<String>> {
    let models: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if models.is_empty() {
        None
    } else {
        Some(models)
    }
}

/// Candidate models for this process: the `GEMINI_MODEL` override if set
/// and non-empty, otherwise the built-in defaults.
pub fn candidate_models() -> Vec<String> {
    env::var(MODEL_ENV_VAR)
        .ok()
        .and_then(|raw| parse_model_list(&raw))
        .unwrap_or_else(default_models)
}

/// The built-in candidate list as owned strings.
pub fn default_models() -> Vec<String> {
    DEFAULT_MODELS.iter().map(|s| s.to_string()).collect()
}
