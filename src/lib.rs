//! WanderLog: a travel journal.
//!
//! Memories are captured as photo, voice, or text drafts, enriched with a
//! generated caption and weather reading, and kept newest-first in a local
//! journal.

pub mod cli;
pub mod config;
pub mod device;
pub mod enrich;
pub mod journal;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod storage;
#[cfg(test)]
mod testing;
