use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{sleep, Duration, Instant};

/// Fixed minimum gap between two requests to the same host. Hosts are throttled independently.
#[derive(Clone)]
pub struct HostThrottle {
    interval: Duration,
    next_allowed: Arc<Mutex<HashMap<String, Instant>>>,
}

impl HostThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_allowed: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn wait(&self, host: &str) {
        if self.interval.is_zero() {
            return;
        }
        let mut slots = self.next_allowed.lock().await;
        let now = Instant::now();
        let wait_until = match slots.get(host) {
            Some(next) if *next > now => *next,
            _ => now,
        };
        slots.insert(host.to_string(), wait_until + self.interval);
        drop(slots);

        let sleep_duration = wait_until.saturating_duration_since(now);
        if !sleep_duration.is_zero() {
            sleep(sleep_duration).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_host_waits_other_host_does_not() {
        let delay = Duration::from_millis(50);
        let throttle = HostThrottle::new(delay);

        // First call should be immediate.
        throttle.wait("www.statmuse.com").await;

        let start = Instant::now();
        throttle.wait("www.espn.com").await;
        assert!(start.elapsed() < delay);

        throttle.wait("www.statmuse.com").await;
        let elapsed = start.elapsed();
        assert!(
            elapsed >= delay - Duration::from_millis(5),
            "expected wait of at least {:?}, but got {:?}",
            delay,
            elapsed
        );
    }
}
