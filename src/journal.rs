//! The journal: the in-memory entry sequence and the store behind it.
//!
//! Newest entries come first. The only mutation is [`Journal::prepend`],
//! which writes the whole list back in one save.

use crate::model::Entry;
use crate::storage::{EntryStore, Result};

pub struct Journal<S> {
    store: S,
    entries: Vec<Entry>,
}

impl<S: EntryStore> Journal<S> {
    /// Loads every stored entry from `store`.
    pub fn open(store: S) -> Result<Self> {
        let entries = store.load_all()?;
        log::debug!("loaded {} entries", entries.len());
        Ok(Self { store, entries })
    }

    /// All entries, newest first.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Puts `entry` at the front and persists the full list.
    ///
    /// If the save fails the entry is removed again, so memory never runs
    /// ahead of what is on disk.
    pub fn prepend(&mut self, entry: Entry) -> Result<()> {
        self.entries.insert(0, entry);
        if let Err(e) = self.store.save_all(&self.entries) {
            self.entries.remove(0);
            return Err(e);
        }
        Ok(())
    }

    /// The store this journal writes to.
    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }
}
