//! Trait seams for the Fabula story pipeline.
//!
//! The pipeline talks to the outside world only through these traits, so
//! every collaborator (backend, host-load check, log file, output directory)
//! can be replaced with a test double.

mod admission;
mod driver;
mod sink;

pub use admission::AdmissionCheck;
pub use driver::InferenceDriver;
pub use sink::{RunLog, StoryStore};
