//! Human-readable run log records.

use chrono::{DateTime, Utc};
use fabula_core::Topic;
use std::path::Path;

/// Header appended when a run starts.
pub fn run_started(run_index: usize, topic: &Topic, at: DateTime<Utc>) -> String {
    format!(
        "=== Run {} started {} ===\nTopic: {}",
        run_index + 1,
        at.to_rfc3339(),
        topic
    )
}

/// Appended once the foundation exists.
pub fn foundation_complete(outline: &str) -> String {
    format!("Foundation complete.\nOutline:\n{}", outline)
}

/// Appended after section `index` (0-based) is accepted.
pub fn section_complete(index: usize, critique: &str) -> String {
    format!(
        "Section {} complete.\nScore feedback:\n{}",
        index + 1,
        critique
    )
}

/// Appended after the memory digest is recomputed.
pub fn memory_updated(covers: usize) -> String {
    format!("Memory summary updated after {} sections.", covers)
}

/// Appended after the closing revision pass.
pub fn macro_edit_applied(applied: bool) -> String {
    if applied {
        "Macro edit applied.".to_string()
    } else {
        "Macro edit returned no content; kept assembled story.".to_string()
    }
}

/// Appended after the story artifact is written.
pub fn story_saved(path: &Path) -> String {
    format!("Story saved to {}.", path.display())
}

/// Appended when a run fails.
pub fn run_failed(run_index: usize, message: &str) -> String {
    format!("Run {} failed: {}", run_index + 1, message)
}
