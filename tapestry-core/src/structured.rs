//! Structured-output extraction from free-form model text.
//!
//! Several components (the retrieval evaluator, the agent router) ask a chat
//! model for a JSON judgment and receive free text that usually, but not
//! always, embeds one. This module isolates that brittle parsing behind a
//! single utility with a safe-default contract: parse failure is never fatal,
//! callers always receive a usable value.

use serde::de::DeserializeOwned;
use tracing::debug;

/// Extract the outermost JSON object embedded in `text` and deserialize it.
///
/// Scans for the first `{` and the last `}` and attempts to deserialize the
/// window between them. Returns `None` when no window exists or when the
/// window does not deserialize to `T`.
#[must_use]
pub fn extract_json<T: DeserializeOwned>(text: &str) -> Option<T> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }

    match serde_json::from_str::<T>(&text[start..=end]) {
        Ok(value) => Some(value),
        Err(err) => {
            debug!("Failed to parse embedded JSON: {err}");
            None
        }
    }
}

/// Extract a structured value from `text`, falling back to `default`.
///
/// This is the single safe-default parsing path shared by every component
/// that reads a structured judgment out of generation output.
#[must_use]
pub fn parse_structured_or<T: DeserializeOwned>(text: &str, default: T) -> T {
    extract_json(text).unwrap_or(default)
}
