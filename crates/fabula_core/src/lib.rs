//! Core data types for the Fabula story pipeline.
//!
//! This crate provides the data model shared by every Fabula crate: the topic
//! seed, the story foundation, critiques, the rolling memory digest and the
//! append-only section list, plus the tagged completion result returned by
//! inference backends.

mod completion;
mod critique;
mod foundation;
mod memory;
mod observability;
mod options;
mod sections;
mod topic;

pub use completion::Completion;
pub use critique::Critique;
pub use foundation::{StoryFoundation, StoryFoundationBuilder, StoryFoundationBuilderError};
pub use memory::MemorySummary;
pub use observability::init_observability;
pub use options::{GenerationOptions, GenerationOptionsBuilder};
pub use sections::{SECTION_SEPARATOR, Sections};
pub use topic::Topic;
