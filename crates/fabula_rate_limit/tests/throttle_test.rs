//! Tests for load-based admission control.

use fabula_interface::AdmissionCheck;
use fabula_rate_limit::{LoadProbe, LoadThrottle, ThrottleConfig, Unthrottled};
use std::time::Duration;

/// Probe reporting a fixed load.
struct FixedLoad {
    load: f64,
    units: usize,
}

impl LoadProbe for FixedLoad {
    fn load_one(&self) -> f64 {
        self.load
    }

    fn compute_units(&self) -> usize {
        self.units
    }
}

#[tokio::test(start_paused = true)]
async fn test_overloaded_host_waits_for_cooldown() {
    let throttle = LoadThrottle::with_probe(
        ThrottleConfig::new(true, 5),
        FixedLoad {
            load: 7.9,
            units: 8,
        },
    );

    let start = tokio::time::Instant::now();
    throttle.admit().await;

    assert!(start.elapsed() >= Duration::from_secs(5));
    assert_eq!(throttle.cooldowns(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_idle_host_passes_immediately() {
    let throttle = LoadThrottle::with_probe(
        ThrottleConfig::new(true, 5),
        FixedLoad {
            load: 0.4,
            units: 8,
        },
    );

    let start = tokio::time::Instant::now();
    throttle.admit().await;

    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(throttle.cooldowns(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_load_at_threshold_is_not_overloaded() {
    let throttle = LoadThrottle::with_probe(
        ThrottleConfig::default(),
        FixedLoad {
            load: 3.0,
            units: 4,
        },
    );

    throttle.admit().await;
    assert_eq!(throttle.cooldowns(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_disabled_throttle_ignores_load() {
    let throttle = LoadThrottle::with_probe(
        ThrottleConfig::new(false, 5),
        FixedLoad {
            load: 100.0,
            units: 2,
        },
    );

    throttle.admit().await;
    assert_eq!(throttle.cooldowns(), 0);
}

#[tokio::test]
async fn test_unthrottled_always_admits() {
    Unthrottled.admit().await;
}

#[test]
fn test_config_defaults_from_empty_toml() {
    let config: ThrottleConfig = toml::from_str("").expect("Failed to parse config");
    assert_eq!(config, ThrottleConfig::default());
}

#[test]
fn test_config_overrides_from_toml() {
    let config: ThrottleConfig =
        toml::from_str("enabled = false\ncooldown_secs = 12").expect("Failed to parse config");
    assert!(!*config.enabled());
    assert_eq!(config.cooldown(), Duration::from_secs(12));
}
