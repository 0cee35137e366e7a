//! Append-only sequence of approved sections.

use serde::{Deserialize, Serialize};

/// Separator placed between sections when the story is assembled.
pub const SECTION_SEPARATOR: &str = "\n\n";

/// Ordered, append-only list of approved section texts.
///
/// There is no way to modify or remove a section once appended.
///
/// # Examples
///
/// ```
/// use fabula_core::Sections;
///
/// let mut sections = Sections::default();
/// assert_eq!(sections.append("Chapter 1"), 0);
/// assert_eq!(sections.append("Chapter 2"), 1);
/// assert_eq!(sections.joined(), "Chapter 1\n\nChapter 2");
/// assert_eq!(sections.last_n(1), vec!["Chapter 2"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sections(Vec<String>);

impl Sections {
    /// Appends an approved section, returning its index.
    pub fn append(&mut self, text: impl Into<String>) -> usize {
        self.0.push(text.into());
        self.0.len() - 1
    }

    /// Returns the section at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Number of appended sections.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates sections in generation order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns up to the last `n` sections, oldest first.
    pub fn last_n(&self, n: usize) -> Vec<&str> {
        let start = self.0.len().saturating_sub(n);
        self.0[start..].iter().map(String::as_str).collect()
    }

    /// Concatenates all sections with blank-line separators.
    pub fn joined(&self) -> String {
        self.0.join(SECTION_SEPARATOR)
    }
}
