//! Journal entries: records, validation, reversal, and the engine.

mod engine;
mod entry;
pub mod reversal;
mod status;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use engine::JournalEngine;
pub use entry::{EntryDraft, EntryTotals, JournalEntry, JournalLine, LineDraft, SourceRef};
pub use status::EntryStatus;
