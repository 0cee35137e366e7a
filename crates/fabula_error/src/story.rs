//! Story pipeline error types.

/// Specific error conditions for story runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StoryErrorKind {
    /// Topic text is empty or whitespace
    #[display("Topic cannot be empty")]
    EmptyTopic,
    /// Pipeline configured to produce no sections
    #[display("Section count must be at least 1")]
    ZeroSections,
    /// Memory summary cadence of zero
    #[display("Summary cadence must be at least 1")]
    ZeroCadence,
    /// Retry threshold above edit threshold
    #[display("Invalid quality thresholds: retry below {retry_below}, edit below {edit_below}")]
    InvalidThresholds {
        /// Score under which a section is redrafted
        retry_below: u8,
        /// Score under which a section is edited
        edit_below: u8,
    },
    /// Batch has nothing to run
    #[display("No topics configured for batch")]
    NoTopics,
    /// The run log rejected a record
    #[display("Failed to append to run log: {}", _0)]
    LogWrite(String),
    /// A required input file or value is missing
    #[display("Missing input: {}", _0)]
    MissingInput(String),
}

/// Error type for story runs.
///
/// # Examples
///
/// ```
/// use fabula_error::{StoryError, StoryErrorKind};
///
/// let err = StoryError::new(StoryErrorKind::ZeroSections);
/// assert!(format!("{}", err).contains("at least 1"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Story Error: {} at line {} in {}", kind, line, file)]
pub struct StoryError {
    /// The specific error condition
    pub kind: StoryErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StoryError {
    /// Create a new StoryError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
