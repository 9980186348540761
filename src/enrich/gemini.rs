//! Gemini-backed enrichment over the `generateContent` REST endpoint.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::config::EnrichmentConfig;
use crate::device::split_data_uri;

use super::{EnrichError, Enricher, Enrichment, EnrichmentRequest, parse_reply};

/// Blocking client for one `generateContent` call per commit. No retries.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Builds a client from config. The request timeout bounds how long a
    /// commit can stay in its submitting state.
    pub fn new(config: &EnrichmentConfig) -> Result<Self, EnrichError> {
        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Sends one request and parses the reply. Errors are returned as-is;
    /// [`Enricher::enrich`] is the absorbing wrapper.
    pub fn request(&self, request: &EnrichmentRequest<'_>) -> Result<Enrichment, EnrichError> {
        let api_key = self.api_key.as_deref().ok_or(EnrichError::MissingApiKey)?;
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);

        log::debug!(
            "requesting enrichment from {} (image: {})",
            self.model,
            request.image.is_some()
        );
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&build_body(request))
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(EnrichError::UnexpectedStatus { status, body });
        }

        let reply: GenerateResponse = response.json()?;
        parse_reply(&reply.text())
    }
}

impl Enricher for GeminiClient {
    fn enrich(&self, request: &EnrichmentRequest<'_>) -> Enrichment {
        match self.request(request) {
            Ok(enrichment) => enrichment,
            Err(e) => {
                log::warn!("enrichment failed, using fallback: {e}");
                Enrichment::fallback()
            }
        }
    }
}

// ── Wire types ──

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    tools: Vec<Tool>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: String,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: GoogleSearch,
}

/// Serializes as `{}`.
#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Deserialize)]
struct ReplyPart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, parts concatenated. Empty if none.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

fn build_body<'a>(request: &EnrichmentRequest<'a>) -> GenerateRequest<'a> {
    let mut parts = vec![Part::Text {
        text: prompt(request.text, request.location),
    }];

    if let Some(image) = request.image {
        match split_data_uri(image) {
            Some((mime_type, data)) => parts.push(Part::Inline {
                inline_data: InlineData { mime_type, data },
            }),
            None => log::debug!("image is not a base64 data URI, sending text only"),
        }
    }

    GenerateRequest {
        contents: vec![Content { parts }],
        tools: vec![Tool {
            google_search: GoogleSearch {},
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
        },
    }
}

fn prompt(text: &str, location: &str) -> String {
    format!(
        r#"You are a poetic travel companion who also knows the local weather.

First, rewrite this travel memory so it is short and evocative, two sentences at most: "{text}".
Second, for the location "{location}", look up the current weather if you can, otherwise give a believable description of the conditions there.

Answer with JSON only, shaped like this:
{{
  "enhancement": "the rewritten memory",
  "weather": {{
    "temp": "for example 24°C",
    "condition": "for example Sunny",
    "icon": "a single emoji, for example ☀️"
  }}
}}"#
    )
}
