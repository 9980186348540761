//! Enrichment: a generated caption and a synthetic weather reading for a draft.
//!
//! Callers only ever see an [`Enrichment`]. Failures stay inside the client
//! as [`EnrichError`] and are swapped for a fixed fallback pair before
//! returning, so a journal entry never waits on the service being healthy.

mod gemini;

use serde_json::Value;

use crate::model::Weather;

pub use gemini::GeminiClient;

/// Caption used when the request failed outright.
pub const FAILED_CAPTION: &str = "Captured in the journey.";

/// Caption used when the service answered without one.
pub const MISSING_CAPTION: &str = "A beautiful moment captured.";

/// What to enrich.
#[derive(Debug, Clone, Copy)]
pub struct EnrichmentRequest<'a> {
    pub text: &'a str,
    pub location: &'a str,
    /// Image as a data URI.
    pub image: Option<&'a str>,
}

/// A caption and weather reading, always fully populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    pub caption: String,
    pub weather: Weather,
}

impl Enrichment {
    /// The pair substituted when enrichment fails.
    pub fn fallback() -> Self {
        Self {
            caption: FAILED_CAPTION.to_string(),
            weather: failed_weather(),
        }
    }
}

/// Weather substituted when the request failed outright.
pub fn failed_weather() -> Weather {
    Weather::new("--", "Atmospheric", "🌍")
}

/// Weather substituted when the service answered without a usable reading.
pub fn missing_weather() -> Weather {
    Weather::new("--", "Unknown", "☁️")
}

/// Anything that can enrich a draft.
///
/// Implementations must not fail: errors are absorbed and replaced with
/// [`Enrichment::fallback`].
pub trait Enricher {
    fn enrich(&self, request: &EnrichmentRequest<'_>) -> Enrichment;
}

/// Why an enrichment request failed. Never leaves the client.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    #[error("no API key configured")]
    MissingApiKey,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed reply: {0}")]
    Malformed(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses the model's JSON reply into an enrichment.
///
/// Expects `{"enhancement": "...", "weather": {"temp", "condition", "icon"}}`.
/// The two fields degrade independently: a missing or empty caption and a
/// missing or incomplete weather object each get their own fallback. An
/// empty reply counts as `{}`. Only unparsable text is an error.
pub fn parse_reply(text: &str) -> Result<Enrichment, EnrichError> {
    let body = strip_code_fence(text);
    let body = if body.is_empty() { "{}" } else { body };

    let value: Value = serde_json::from_str(body)?;
    if value.is_null() {
        return Err(EnrichError::Malformed("reply is null".to_string()));
    }

    let caption = value
        .get("enhancement")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map_or_else(|| MISSING_CAPTION.to_string(), str::to_string);

    let weather = value
        .get("weather")
        .and_then(|w| serde_json::from_value::<Weather>(w.clone()).ok())
        .unwrap_or_else(missing_weather);

    Ok(Enrichment { caption, weather })
}

/// Drops a surrounding Markdown code fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string (e.g. `json`) on the opening line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
