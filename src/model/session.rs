//! The capture session: the draft being composed before it becomes an entry.
//!
//! A small state machine. `Idle` is `mode == InputMode::None`; any other mode
//! is `Composing`. Voice capture adds an independent recording flag, and
//! `is_submitting` locks the session to a single in-flight commit.

use serde::{Deserialize, Serialize};

use super::EntryKind;

/// Which composer is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputMode {
    /// Composer closed.
    #[default]
    None,
    Photo,
    Voice,
    Text,
}

impl InputMode {
    /// The entry kind a commit in this mode produces.
    pub fn entry_kind(self) -> EntryKind {
        match self {
            Self::Photo => EntryKind::Photo,
            Self::Voice => EntryKind::Voice,
            Self::None | Self::Text => EntryKind::Text,
        }
    }
}

/// The single active draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureSession {
    mode: InputMode,
    draft_text: String,
    draft_image: Option<String>,
    draft_location: String,
    is_submitting: bool,
    is_recording: bool,
}

impl CaptureSession {
    /// An idle session whose location label starts at `location`.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            mode: InputMode::None,
            draft_text: String::new(),
            draft_image: None,
            draft_location: location.into(),
            is_submitting: false,
            is_recording: false,
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn draft_text(&self) -> &str {
        &self.draft_text
    }

    pub fn draft_image(&self) -> Option<&str> {
        self.draft_image.as_deref()
    }

    pub fn draft_location(&self) -> &str {
        &self.draft_location
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording
    }

    pub fn is_composing(&self) -> bool {
        self.mode != InputMode::None
    }

    // ── Transitions ──

    /// Opens the composer in `mode`, or switches an open composer to it.
    ///
    /// Opening `InputMode::None` is a dismiss. Leaving voice mode ends any
    /// recording in progress.
    pub fn open(&mut self, mode: InputMode) {
        if mode == InputMode::None {
            self.dismiss();
            return;
        }
        if mode != InputMode::Voice {
            self.is_recording = false;
        }
        self.mode = mode;
    }

    /// Closes the composer and discards the draft.
    pub fn dismiss(&mut self) {
        self.reset();
    }

    /// Back to idle defaults. The location label is kept: it describes where
    /// the traveller is, not the draft.
    pub fn reset(&mut self) {
        self.mode = InputMode::None;
        self.draft_text.clear();
        self.draft_image = None;
        self.is_submitting = false;
        self.is_recording = false;
    }

    // ── Draft edits ──

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.draft_text = text.into();
    }

    pub fn attach_image(&mut self, data_uri: impl Into<String>) {
        self.draft_image = Some(data_uri.into());
    }

    pub fn clear_image(&mut self) {
        self.draft_image = None;
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.draft_location = location.into();
    }

    // ── Voice ──

    /// Starts a recording pass. The previous draft text is cleared first.
    pub fn start_recording(&mut self) {
        self.draft_text.clear();
        self.is_recording = true;
    }

    /// Ends the recording pass, keeping the last transcript.
    pub fn stop_recording(&mut self) {
        self.is_recording = false;
    }

    /// Replaces the draft text with a cumulative transcript.
    ///
    /// Returns `false` and leaves the draft alone when not recording.
    pub fn apply_transcript(&mut self, transcript: impl Into<String>) -> bool {
        if !self.is_recording {
            return false;
        }
        self.draft_text = transcript.into();
        true
    }

    // ── Commit gate ──

    /// Whether the draft has anything worth keeping.
    pub fn has_content(&self) -> bool {
        !self.draft_text.is_empty() || self.draft_image.is_some()
    }

    /// Whether a commit may start now.
    pub fn can_commit(&self) -> bool {
        self.has_content() && !self.is_submitting
    }

    /// Locks the session for a commit. Returns `false` if a commit is already
    /// in flight or there is nothing to commit.
    pub fn begin_submit(&mut self) -> bool {
        if !self.can_commit() {
            return false;
        }
        self.is_submitting = true;
        true
    }

    /// Releases the commit lock without touching the draft.
    pub fn abort_submit(&mut self) {
        self.is_submitting = false;
    }
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_LOCATION)
    }
}
