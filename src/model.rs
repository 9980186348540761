//! Core data model for WanderLog.
//!
//! Two halves: the immutable [`Entry`] records that make up the journal,
//! and the mutable [`CaptureSession`] draft that becomes the next entry.

mod entry;
mod session;

pub use entry::{Entry, EntryKind, Weather};
pub use session::{CaptureSession, InputMode};
