//! Pre-call admission seam.

use async_trait::async_trait;

/// Advisory backpressure applied before every inference call.
///
/// An admission check may delay the caller but never rejects the call.
#[async_trait]
pub trait AdmissionCheck: Send + Sync {
    /// Waits until the call may proceed.
    async fn admit(&self);
}
