//! Journal entries: one captured memory each.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// One journaled memory.
///
/// Never mutated after construction. Enrichment-derived fields are optional
/// and omitted from the stored JSON when absent, so records written before a
/// field existed still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Opaque unique id, never reused.
    pub id: String,

    /// Creation instant in milliseconds since the Unix epoch.
    pub timestamp: i64,

    /// User-authored or transcribed content.
    pub text: String,

    /// Captured image as a data URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<Weather>,

    /// Generated caption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_enhancement: Option<String>,

    /// Capture mode active at commit time.
    #[serde(alias = "type")]
    pub kind: EntryKind,
}

impl Entry {
    /// The creation instant, if the stored millisecond value is in range.
    pub fn created_at(&self) -> Option<Timestamp> {
        Timestamp::from_millisecond(self.timestamp).ok()
    }
}

/// A synthetic weather reading. All three fields or none at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weather {
    /// Display text such as `22°C`. Not parsed.
    pub temp: String,
    pub condition: String,
    /// Short glyph.
    pub icon: String,
}

impl Weather {
    pub fn new(temp: impl Into<String>, condition: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            temp: temp.into(),
            condition: condition.into(),
            icon: icon.into(),
        }
    }
}

/// How an entry was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryKind {
    Photo,
    Voice,
    Text,
}

impl EntryKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Voice => "voice",
            Self::Text => "text",
        }
    }
}
