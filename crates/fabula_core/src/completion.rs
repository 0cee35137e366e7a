//! Tagged result of a completion call.

use serde::{Deserialize, Serialize};

/// Outcome of one call to an inference backend.
///
/// Transport faults, timeouts, non-success statuses and blank responses all
/// collapse into [`Completion::Empty`]. Callers decide what "no content"
/// means for them; the section pipeline lets it flow through as empty text.
///
/// # Examples
///
/// ```
/// use fabula_core::Completion;
///
/// assert_eq!(Completion::from_response("  \n"), Completion::Empty);
/// assert_eq!(Completion::from_response("Once upon a time").text(), "Once upon a time");
/// assert_eq!(Completion::Empty.text(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Completion {
    /// Usable text returned by the backend
    Text(String),
    /// No usable content
    #[default]
    Empty,
}

impl Completion {
    /// Wraps raw backend output, treating blank output as empty.
    pub fn from_response(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim().is_empty() {
            Completion::Empty
        } else {
            Completion::Text(text)
        }
    }

    /// Returns the text, or `""` when empty.
    pub fn text(&self) -> &str {
        match self {
            Completion::Text(text) => text,
            Completion::Empty => "",
        }
    }

    /// Consumes the completion, returning its text (empty when no content).
    pub fn into_text(self) -> String {
        match self {
            Completion::Text(text) => text,
            Completion::Empty => String::new(),
        }
    }

    /// Returns true when the backend produced no usable content.
    pub fn is_empty(&self) -> bool {
        matches!(self, Completion::Empty)
    }
}
