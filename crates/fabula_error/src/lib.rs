//! Error types for the Fabula story pipeline.
//!
//! Every error records the source location where it was created. The
//! crate-level [`FabulaError`] wraps any of them behind a boxed kind.

mod backend;
mod config;
mod http;
mod storage;
mod story;

pub use backend::BackendError;
pub use config::ConfigError;
pub use http::HttpError;
pub use storage::{StorageError, StorageErrorKind};
pub use story::{StoryError, StoryErrorKind};

/// Crate-level error variants.
#[derive(Debug, derive_more::From, derive_more::Display)]
pub enum FabulaErrorKind {
    /// HTTP error
    #[display("{}", _0)]
    Http(HttpError),
    /// Inference backend error
    #[display("{}", _0)]
    Backend(BackendError),
    /// Configuration error
    #[display("{}", _0)]
    Config(ConfigError),
    /// Story or log persistence error
    #[display("{}", _0)]
    Storage(StorageError),
    /// Story pipeline error
    #[display("{}", _0)]
    Story(StoryError),
}

/// Fabula error with kind discrimination.
///
/// # Examples
///
/// ```
/// use fabula_error::{FabulaError, FabulaErrorKind, StoryError, StoryErrorKind};
///
/// let err: FabulaError = StoryError::new(StoryErrorKind::EmptyTopic).into();
/// assert!(matches!(err.kind(), FabulaErrorKind::Story(_)));
/// ```
#[derive(Debug)]
pub struct FabulaError(Box<FabulaErrorKind>);

impl FabulaError {
    /// Create a new error from a kind.
    pub fn new(kind: FabulaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FabulaErrorKind {
        &self.0
    }
}

impl std::fmt::Display for FabulaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fabula Error: {}", self.0)
    }
}

impl std::error::Error for FabulaError {}

// Generic From implementation for any type that converts to FabulaErrorKind
impl<T> From<T> for FabulaError
where
    T: Into<FabulaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Fabula operations.
pub type FabulaResult<T> = std::result::Result<T, FabulaError>;
