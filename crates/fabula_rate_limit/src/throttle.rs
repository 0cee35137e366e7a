//! Load-based admission check.

use crate::{HostLoad, LoadProbe, ThrottleConfig, is_overloaded};
use async_trait::async_trait;
use fabula_interface::AdmissionCheck;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, instrument};

/// Delays callers while the host is overloaded.
///
/// Before each inference call the 1-minute load average is compared with the
/// number of compute units. If the load exceeds `units - 1`, the caller
/// sleeps for the configured cooldown and then proceeds. Calls are never
/// rejected.
///
/// # Example
///
/// ```rust,ignore
/// use fabula_rate_limit::{LoadThrottle, ThrottleConfig};
/// use fabula_interface::AdmissionCheck;
///
/// let throttle = LoadThrottle::new(ThrottleConfig::default());
/// throttle.admit().await;
/// // Make inference call...
/// ```
#[derive(Debug)]
pub struct LoadThrottle<P: LoadProbe = HostLoad> {
    config: ThrottleConfig,
    probe: P,
    cooldowns: AtomicUsize,
}

impl LoadThrottle<HostLoad> {
    /// Creates a throttle reading the live host load.
    pub fn new(config: ThrottleConfig) -> Self {
        Self::with_probe(config, HostLoad)
    }
}

impl<P: LoadProbe> LoadThrottle<P> {
    /// Creates a throttle with a custom load probe.
    pub fn with_probe(config: ThrottleConfig, probe: P) -> Self {
        Self {
            config,
            probe,
            cooldowns: AtomicUsize::new(0),
        }
    }

    /// Number of cooldowns applied so far.
    pub fn cooldowns(&self) -> usize {
        self.cooldowns.load(Ordering::Relaxed)
    }

    /// Gets the throttle configuration.
    pub fn config(&self) -> &ThrottleConfig {
        &self.config
    }
}

#[async_trait]
impl<P: LoadProbe> AdmissionCheck for LoadThrottle<P> {
    #[instrument(skip(self))]
    async fn admit(&self) {
        if !*self.config.enabled() {
            return;
        }

        let load = self.probe.load_one();
        let units = self.probe.compute_units();

        if is_overloaded(load, units) {
            let cooldown = self.config.cooldown();
            info!(
                load,
                units,
                cooldown_secs = cooldown.as_secs(),
                "Host overloaded, cooling down before inference call"
            );
            self.cooldowns.fetch_add(1, Ordering::Relaxed);
            tokio::time::sleep(cooldown).await;
        } else {
            debug!(load, units, "Host load within capacity");
        }
    }
}

/// Admission check that always lets calls through immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unthrottled;

#[async_trait]
impl AdmissionCheck for Unthrottled {
    async fn admit(&self) {}
}
