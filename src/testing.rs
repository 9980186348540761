//! Shared test doubles.

use std::cell::{Cell, RefCell};
use std::io;

use crate::enrich::{EnrichmentRequest, Enricher, Enrichment};
use crate::model::{Entry, EntryKind};
use crate::storage::{EntryStore, Result, StorageError};

/// An entry with the given id and otherwise fixed content.
pub fn sample_entry(id: &str) -> Entry {
    Entry {
        id: id.into(),
        timestamp: 1_700_000_000_000,
        text: "Walked the Alfama at dusk".into(),
        image_url: None,
        location: Some("Lisbon".into()),
        weather: None,
        ai_enhancement: None,
        kind: EntryKind::Text,
    }
}

/// Keeps the serialized list in memory and counts writes.
#[derive(Default)]
pub struct MemoryStore {
    json: RefCell<Option<String>>,
    writes: Cell<usize>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn with_entries(entries: Vec<Entry>) -> Self {
        let store = Self::default();
        *store.json.borrow_mut() = Some(serde_json::to_string(&entries).unwrap());
        store
    }

    /// Makes every later save fail like a full disk.
    pub fn fail_writes(&self) {
        self.fail_writes.set(true);
    }

    pub fn corrupt(&self) {
        *self.json.borrow_mut() = Some("{oops".into());
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl EntryStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<Entry>> {
        match self.json.borrow().as_deref() {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(Vec::new()),
        }
    }

    fn save_all(&self, entries: &[Entry]) -> Result<()> {
        if self.fail_writes.get() {
            return Err(StorageError::Io(io::Error::other("quota exceeded")));
        }
        *self.json.borrow_mut() = Some(serde_json::to_string(entries)?);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

/// Returns a fixed enrichment and records what it was asked.
pub struct FakeEnricher {
    result: Enrichment,
    calls: RefCell<Vec<(String, String, Option<String>)>>,
}

impl FakeEnricher {
    pub fn returning(result: Enrichment) -> Self {
        Self {
            result,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// `(text, location, image)` for every call so far.
    pub fn calls(&self) -> Vec<(String, String, Option<String>)> {
        self.calls.borrow().clone()
    }
}

impl Enricher for FakeEnricher {
    fn enrich(&self, request: &EnrichmentRequest<'_>) -> Enrichment {
        self.calls.borrow_mut().push((
            request.text.to_string(),
            request.location.to_string(),
            request.image.map(str::to_string),
        ));
        self.result.clone()
    }
}
