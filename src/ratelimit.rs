//! Fixed-window request limiter for the /health route family.
//!
//! Counts requests per client IP inside a fixed window; the counter resets
//! when the window expires. Only the /health routes pass through it, matching
//! the reference behavior of shielding the most expensive endpoints while
//! leaving `/` and `/docs` unthrottled.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::config::RateLimitConfig;

/// Entries above this count trigger a prune of expired windows on the next
/// acquire, keeping the map bounded under client churn.
const PRUNE_THRESHOLD: usize = 1024;

struct Window {
    started: Instant,
    count: u32,
}

/// Per-client fixed-window counter, safe for concurrent use.
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    clients: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests,
            window: Duration::from_secs(config.window_seconds),
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Record one request from `client`; returns false when the client has
    /// exhausted its budget for the current window.
    pub fn try_acquire(&self, client: IpAddr) -> bool {
        let now = Instant::now();
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);

        if clients.len() > PRUNE_THRESHOLD {
            let window = self.window;
            clients.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = clients.entry(client).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }
        entry.count += 1;
        entry.count <= self.max_requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn limiter(max_requests: u32, window_seconds: u64) -> RateLimiter {
        RateLimiter::new(&RateLimitConfig {
            max_requests,
            window_seconds,
        })
    }

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    #[test]
    fn allows_up_to_the_limit_then_rejects() {
        let limiter = limiter(3, 60);
        assert!(limiter.try_acquire(ip(1)));
        assert!(limiter.try_acquire(ip(1)));
        assert!(limiter.try_acquire(ip(1)));
        assert!(!limiter.try_acquire(ip(1)));
        assert!(!limiter.try_acquire(ip(1)));
    }

    #[test]
    fn clients_are_counted_independently() {
        let limiter = limiter(1, 60);
        assert!(limiter.try_acquire(ip(1)));
        assert!(!limiter.try_acquire(ip(1)));
        assert!(limiter.try_acquire(ip(2)));
    }

    #[test]
    fn expired_window_resets_the_counter() {
        // A zero-length window expires immediately, so every request starts
        // a fresh window and none are rejected.
        let limiter = limiter(1, 0);
        assert!(limiter.try_acquire(ip(1)));
        assert!(limiter.try_acquire(ip(1)));
        assert!(limiter.try_acquire(ip(1)));
    }

    #[test]
    fn concurrent_increments_never_overadmit() {
        use std::sync::Arc;

        let limiter = Arc::new(limiter(50, 60));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let limiter = Arc::clone(&limiter);
            handles.push(std::thread::spawn(move || {
                let mut admitted = 0u32;
                for _ in 0..25 {
                    if limiter.try_acquire(ip(9)) {
                        admitted += 1;
                    }
                }
                admitted
            }));
        }
        let total: u32 = handles.into_iter().map(|h| h.join().expect("thread")).sum();
        assert_eq!(total, 50);
    }
}
