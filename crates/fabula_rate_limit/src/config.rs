//! Throttle configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default cooldown applied when the host is overloaded.
pub const DEFAULT_COOLDOWN_SECS: u64 = 5;

/// Configuration for host-load throttling.
///
/// # Examples
///
/// ```
/// use fabula_rate_limit::ThrottleConfig;
///
/// let config = ThrottleConfig::default();
/// assert!(*config.enabled());
/// assert_eq!(config.cooldown().as_secs(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct ThrottleConfig {
    /// Whether the load check runs at all
    #[serde(default = "default_enabled")]
    enabled: bool,
    /// Cooldown in seconds when load exceeds capacity
    #[serde(default = "default_cooldown_secs")]
    cooldown_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_cooldown_secs() -> u64 {
    DEFAULT_COOLDOWN_SECS
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            cooldown_secs: default_cooldown_secs(),
        }
    }
}

impl ThrottleConfig {
    /// Creates a configuration.
    pub fn new(enabled: bool, cooldown_secs: u64) -> Self {
        Self {
            enabled,
            cooldown_secs,
        }
    }

    /// Cooldown as a duration.
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}
