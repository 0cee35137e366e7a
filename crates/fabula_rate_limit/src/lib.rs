//! Host-load admission control for the Fabula story pipeline.
//!
//! Inference calls against a local model saturate the machine they run on.
//! [`LoadThrottle`] inserts a fixed cooldown before a call whenever the
//! 1-minute load average exceeds the available compute units minus one.
//! [`Unthrottled`] is the always-pass variant used in tests.

mod config;
mod probe;
mod throttle;

pub use config::{DEFAULT_COOLDOWN_SECS, ThrottleConfig};
pub use probe::{HostLoad, LoadProbe, is_overloaded};
pub use throttle::{LoadThrottle, Unthrottled};
