//! Pluggable delay used between retry attempts.

use std::time::Duration;

use async_trait::async_trait;

/// Waits out a backoff delay.
///
/// Tests inject an implementation that records the requested delays and
/// returns immediately.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

/// Wall-clock sleep via `tokio::time::sleep`.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioSleeper;

#[cfg(not(target_arch = "wasm32"))]
#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Returns immediately.
///
/// Default on WASM targets, where edge runtimes prefer fast failure over
/// sleeping and `tokio::time::sleep` is not available.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSleeper;

#[async_trait]
impl Sleeper for NoopSleeper {
    async fn sleep(&self, _delay: Duration) {}
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn default_sleeper() -> std::sync::Arc<dyn Sleeper> {
    std::sync::Arc::new(TokioSleeper)
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn default_sleeper() -> std::sync::Arc<dyn Sleeper> {
    std::sync::Arc::new(NoopSleeper)
}
