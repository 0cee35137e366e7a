//! Story topic seed.

use fabula_error::{StoryError, StoryErrorKind};
use serde::{Deserialize, Serialize};

/// The text seed a story is grown from.
///
/// Immutable once constructed; every foundation generator reads it.
///
/// # Examples
///
/// ```
/// use fabula_core::Topic;
///
/// let topic = Topic::new("A machine that secretly writes stories at night.").unwrap();
/// assert_eq!(topic.as_str(), "A machine that secretly writes stories at night.");
/// assert!(Topic::new("   ").is_err());
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(try_from = "String", into = "String")]
#[display("{}", _0)]
pub struct Topic(String);

impl Topic {
    /// Creates a topic, rejecting empty or whitespace-only text.
    #[track_caller]
    pub fn new(text: impl Into<String>) -> Result<Self, StoryError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(StoryError::new(StoryErrorKind::EmptyTopic));
        }
        Ok(Self(text.trim().to_string()))
    }

    /// Returns the topic text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Topic {
    type Error = StoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Topic::new(value)
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        topic.0
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
