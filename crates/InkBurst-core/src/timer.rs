use async_trait::async_trait;
use tokio::time::{self, Duration};

use crate::traits::Timer;

/// Real-time pacing backed by the tokio timer wheel.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioTimer;

#[async_trait]
impl Timer for TokioTimer {
    async fn delay(&self, ms: u64) {
        time::sleep(Duration::from_millis(ms)).await;
    }
}

/// Completes every delay immediately (offline export, tests).
#[derive(Clone, Copy, Debug, Default)]
pub struct InstantTimer;

#[async_trait]
impl Timer for InstantTimer {
    async fn delay(&self, _ms: u64) {
        tokio::task::yield_now().await;
    }
}
