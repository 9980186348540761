//! The commit pipeline: turn the current draft into a saved entry.
//!
//! lock session → enrich (the one slow call) → build entry → prepend and
//! persist → reset session.

use jiff::Timestamp;
use uuid::Uuid;

use crate::config::DEFAULT_LOCATION;
use crate::enrich::{Enricher, Enrichment, EnrichmentRequest};
use crate::journal::Journal;
use crate::model::{CaptureSession, Entry, InputMode};
use crate::storage::{EntryStore, StorageError};

/// Text given to a photo entry committed without any words.
pub const PHOTO_PLACEHOLDER: &str = "A captured moment.";

#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    /// The entry could not be written. Nothing was kept and the draft is
    /// still in the session.
    #[error("failed to save entry: {0}")]
    Persist(#[from] StorageError),
}

/// Commits the session's draft to the journal.
///
/// Returns `Ok(None)` without touching anything when the draft is empty or a
/// commit is already in flight. With `enricher` set to `None` the entry is
/// saved without caption or weather.
///
/// On success the new entry is first in the journal, the full list has been
/// written once, and the session is back to idle. If the write fails the
/// journal is unchanged and the draft is kept so the commit can be retried.
pub fn commit<S: EntryStore>(
    session: &mut CaptureSession,
    enricher: Option<&dyn Enricher>,
    journal: &mut Journal<S>,
) -> Result<Option<Entry>, CommitError> {
    if !session.begin_submit() {
        log::debug!("commit skipped: empty draft or commit in flight");
        return Ok(None);
    }

    let enrichment = enricher.map(|enricher| {
        enricher.enrich(&EnrichmentRequest {
            text: session.draft_text(),
            location: session.draft_location(),
            image: session.draft_image(),
        })
    });

    let entry = build_entry(session, enrichment);

    if let Err(e) = journal.prepend(entry.clone()) {
        log::error!("could not persist entry {}: {e}", entry.id);
        session.abort_submit();
        return Err(e.into());
    }

    log::info!("saved {} entry {}", entry.kind.label(), entry.id);
    session.reset();
    Ok(Some(entry))
}

fn build_entry(session: &CaptureSession, enrichment: Option<Enrichment>) -> Entry {
    let text = if session.draft_text().is_empty() && session.mode() == InputMode::Photo {
        PHOTO_PLACEHOLDER.to_string()
    } else {
        session.draft_text().to_string()
    };

    let location = match session.draft_location().trim() {
        "" => DEFAULT_LOCATION.to_string(),
        _ => session.draft_location().to_string(),
    };

    let (ai_enhancement, weather) = match enrichment {
        Some(e) => (Some(e.caption), Some(e.weather)),
        None => (None, None),
    };

    Entry {
        id: Uuid::new_v4().to_string(),
        timestamp: Timestamp::now().as_millisecond(),
        text,
        image_url: session.draft_image().map(str::to_string),
        location: Some(location),
        weather,
        ai_enhancement,
        kind: session.mode().entry_kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::EnrichmentConfig;
    use crate::device::{CameraView, FileCamera};
    use crate::enrich::{FAILED_CAPTION, GeminiClient, failed_weather};
    use crate::model::{EntryKind, Weather};
    use crate::testing::{FakeEnricher, MemoryStore, sample_entry};

    const JPEG: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRg==";

    fn golden_hour() -> FakeEnricher {
        FakeEnricher::returning(Enrichment {
            caption: "Golden hour by the water.".into(),
            weather: Weather::new("22°C", "Clear", "☀️"),
        })
    }

    fn empty_journal() -> Journal<MemoryStore> {
        Journal::open(MemoryStore::default()).unwrap()
    }

    #[test]
    fn text_entry_is_enriched_and_saved() {
        let mut session = CaptureSession::new("Lisbon");
        session.open(InputMode::Text);
        session.set_text("Sunset over the bay");
        let enricher = golden_hour();
        let mut journal = empty_journal();

        let entry = commit(&mut session, Some(&enricher), &mut journal)
            .unwrap()
            .unwrap();

        assert_eq!(entry.kind, EntryKind::Text);
        assert_eq!(entry.text, "Sunset over the bay");
        assert_eq!(entry.location.as_deref(), Some("Lisbon"));
        assert_eq!(
            entry.ai_enhancement.as_deref(),
            Some("Golden hour by the water.")
        );
        assert_eq!(entry.weather, Some(Weather::new("22°C", "Clear", "☀️")));
        assert!(entry.image_url.is_none());
        assert_eq!(journal.entries(), [entry]);
    }

    #[test]
    fn enricher_sees_draft_fields() {
        let mut session = CaptureSession::new("Hoi An");
        session.open(InputMode::Photo);
        session.set_text("Lanterns");
        session.attach_image(JPEG);
        let enricher = golden_hour();

        commit(&mut session, Some(&enricher), &mut empty_journal()).unwrap();

        assert_eq!(
            enricher.calls(),
            [("Lanterns".to_string(), "Hoi An".to_string(), Some(JPEG.to_string()))]
        );
    }

    #[test]
    fn wordless_photo_gets_placeholder_text() {
        let mut session = CaptureSession::default();
        session.open(InputMode::Photo);
        session.attach_image(JPEG);

        let entry = commit(&mut session, Some(&golden_hour()), &mut empty_journal())
            .unwrap()
            .unwrap();

        assert_eq!(entry.text, PHOTO_PLACEHOLDER);
        assert_eq!(entry.kind, EntryKind::Photo);
        assert_eq!(entry.image_url.as_deref(), Some(JPEG));
    }

    #[test]
    fn placeholder_is_only_for_photo_mode() {
        let mut session = CaptureSession::default();
        session.open(InputMode::Voice);
        session.attach_image(JPEG);

        let entry = commit(&mut session, None, &mut empty_journal())
            .unwrap()
            .unwrap();

        assert_eq!(entry.text, "");
        assert_eq!(entry.kind, EntryKind::Voice);
    }

    #[test]
    fn unreachable_service_still_creates_entry_with_fallbacks() {
        let client = GeminiClient::new(&EnrichmentConfig {
            api_key: Some("test-key".into()),
            endpoint: "http://127.0.0.1:9/v1beta".into(),
            timeout_secs: 2,
            ..EnrichmentConfig::default()
        })
        .unwrap();
        let mut session = CaptureSession::default();
        session.open(InputMode::Text);
        session.set_text("Rain in Hanoi");
        let mut journal = empty_journal();

        let entry = commit(&mut session, Some(&client), &mut journal)
            .unwrap()
            .unwrap();

        assert_eq!(entry.ai_enhancement.as_deref(), Some(FAILED_CAPTION));
        assert_eq!(entry.weather, Some(failed_weather()));
        assert_eq!(journal.len(), 1);
    }

    #[test]
    fn empty_draft_is_a_no_op() {
        let mut session = CaptureSession::new("Oslo");
        session.open(InputMode::Text);
        let before = session.clone();
        let enricher = golden_hour();
        let mut journal = empty_journal();

        let result = commit(&mut session, Some(&enricher), &mut journal).unwrap();

        assert!(result.is_none());
        assert_eq!(session, before);
        assert!(journal.is_empty());
        assert!(enricher.calls().is_empty());
        assert_eq!(journal.store().writes(), 0);
    }

    #[test]
    fn second_commit_while_submitting_is_refused() {
        let mut session = CaptureSession::default();
        session.open(InputMode::Text);
        session.set_text("Double tap");
        assert!(session.begin_submit());
        let enricher = golden_hour();
        let mut journal = empty_journal();

        let result = commit(&mut session, Some(&enricher), &mut journal).unwrap();

        assert!(result.is_none());
        assert!(enricher.calls().is_empty());
        assert!(journal.is_empty());
    }

    #[test]
    fn commit_prepends_without_reordering() {
        let store = MemoryStore::with_entries(vec![
            sample_entry("c"),
            sample_entry("b"),
            sample_entry("a"),
        ]);
        let mut journal = Journal::open(store).unwrap();
        let before: Vec<Entry> = journal.entries().to_vec();
        let mut session = CaptureSession::default();
        session.open(InputMode::Text);
        session.set_text("Newest");

        let entry = commit(&mut session, None, &mut journal).unwrap().unwrap();

        assert_eq!(journal.entries()[0], entry);
        assert_eq!(&journal.entries()[1..], before.as_slice());
        assert_eq!(journal.store().writes(), 1);
        assert_eq!(journal.store().load_all().unwrap(), journal.entries());
    }

    #[test]
    fn successful_commit_resets_session() {
        let mut session = CaptureSession::new("Lisbon");
        session.open(InputMode::Photo);
        session.set_text("Tiles");
        session.attach_image(JPEG);

        commit(&mut session, None, &mut empty_journal()).unwrap();

        assert_eq!(session.mode(), InputMode::None);
        assert!(session.draft_text().is_empty());
        assert!(session.draft_image().is_none());
        assert!(!session.is_submitting());
    }

    #[test]
    fn skipping_enrichment_leaves_fields_absent() {
        let mut session = CaptureSession::default();
        session.open(InputMode::Text);
        session.set_text("Offline on the train");

        let entry = commit(&mut session, None, &mut empty_journal())
            .unwrap()
            .unwrap();

        assert!(entry.weather.is_none());
        assert!(entry.ai_enhancement.is_none());
    }

    #[test]
    fn idle_mode_commits_as_text() {
        let mut session = CaptureSession::default();
        session.set_text("Quick note");

        let entry = commit(&mut session, None, &mut empty_journal())
            .unwrap()
            .unwrap();

        assert_eq!(entry.kind, EntryKind::Text);
    }

    #[test]
    fn blank_location_uses_default_label() {
        let mut session = CaptureSession::new("   ");
        session.open(InputMode::Text);
        session.set_text("Somewhere");

        let entry = commit(&mut session, None, &mut empty_journal())
            .unwrap()
            .unwrap();

        assert_eq!(entry.location.as_deref(), Some(DEFAULT_LOCATION));
    }

    #[test]
    fn ids_are_unique_and_timestamps_set() {
        let mut journal = empty_journal();
        for text in ["one", "two"] {
            let mut session = CaptureSession::default();
            session.open(InputMode::Text);
            session.set_text(text);
            commit(&mut session, None, &mut journal).unwrap();
        }

        let entries = journal.entries();
        assert_ne!(entries[0].id, entries[1].id);
        assert!(entries[0].timestamp >= entries[1].timestamp);
        assert!(entries[0].created_at().is_some());
    }

    #[test]
    fn failed_write_rejects_commit_and_keeps_draft() {
        let store = MemoryStore::with_entries(vec![sample_entry("a")]);
        let mut journal = Journal::open(store).unwrap();
        journal.store().fail_writes();
        let mut session = CaptureSession::new("Lisbon");
        session.open(InputMode::Text);
        session.set_text("Won't fit");

        let err = commit(&mut session, Some(&golden_hour()), &mut journal).unwrap_err();

        assert!(matches!(err, CommitError::Persist(_)));
        assert_eq!(journal.len(), 1);
        assert_eq!(session.draft_text(), "Won't fit");
        assert_eq!(session.mode(), InputMode::Text);
        assert!(!session.is_submitting());
        assert!(session.can_commit());
    }

    #[test]
    fn camera_failure_blocks_empty_commit() {
        let mut session = CaptureSession::default();
        session.open(InputMode::Photo);
        let mut view = CameraView::new();
        let mut camera = FileCamera::new("/nonexistent/wanderlog/shot.jpg");

        if let Some(image) = view.capture(&mut camera) {
            session.attach_image(image);
        }

        assert!(view.error().is_some());
        assert!(!session.can_commit());
        let result = commit(&mut session, None, &mut empty_journal()).unwrap();
        assert!(result.is_none());
        assert_eq!(session.mode(), InputMode::Photo);
    }
}
