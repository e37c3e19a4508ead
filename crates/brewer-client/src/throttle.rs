use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Spaces the *start* of consecutive requests by a fixed gap.
///
/// Callers reserve the next free slot under the lock and sleep outside it, so
/// concurrent requests queue up without holding the mutex while waiting.
#[derive(Debug)]
pub struct Throttle {
    gap: Duration,
    next: Mutex<Instant>,
}

impl Throttle {
    pub fn new(gap: Duration) -> Self {
        Self {
            gap,
            next: Mutex::new(Instant::now()),
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub async fn wait(&self) {
        let slot = {
            let mut next = self.next.lock().await;
            let slot = (*next).max(Instant::now());
            *next = slot + self.gap;
            slot
        };
        tokio::time::sleep_until(slot).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;
    use std::sync::Arc;

    #[tokio::test]
    async fn spaces_concurrent_starts() {
        let throttle = Arc::new(Throttle::from_millis(30));
        let start = std::time::Instant::now();
        join_all((0..4).map(|_| {
            let t = throttle.clone();
            async move { t.wait().await }
        }))
        .await;
        assert!(start.elapsed() >= Duration::from_millis(90));
    }

    #[tokio::test]
    async fn first_request_is_immediate() {
        let throttle = Throttle::from_millis(5_000);
        let start = std::time::Instant::now();
        throttle.wait().await;
        assert!(start.elapsed() < Duration::from_millis(1_000));
    }
}
