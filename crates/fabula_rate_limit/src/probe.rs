//! Host load sampling.

/// Source of host load readings.
pub trait LoadProbe: Send + Sync {
    /// Current 1-minute load average.
    fn load_one(&self) -> f64;

    /// Number of compute units available to the process.
    fn compute_units(&self) -> usize;
}

/// Reads the live host load via `sysinfo`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostLoad;

impl LoadProbe for HostLoad {
    fn load_one(&self) -> f64 {
        sysinfo::System::load_average().one
    }

    fn compute_units(&self) -> usize {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

/// Returns true when `load` exceeds `compute_units - 1`.
///
/// One unit is left as headroom for the inference backend itself.
///
/// # Examples
///
/// ```
/// use fabula_rate_limit::is_overloaded;
///
/// assert!(!is_overloaded(2.5, 4));
/// assert!(is_overloaded(3.5, 4));
/// assert!(is_overloaded(0.5, 1));
/// ```
pub fn is_overloaded(load: f64, compute_units: usize) -> bool {
    load > compute_units as f64 - 1.0
}
