// src/services/delay.rs
use async_trait::async_trait;
use std::time::Duration;

/// Stand-in for the time an analysis "takes". Swapped out in tests so that
/// nothing actually sleeps.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Yields once and returns.
pub struct NoDelay;

#[async_trait]
impl Delay for NoDelay {
    async fn wait(&self, _duration: Duration) {
        tokio::task::yield_now().await;
    }
}
