//! Fixed-window rate limiter: N requests per client address per window.
//! Hand-rolled `HashMap` bookkeeping, the same shape as
//! `zksl_submit::IdempotencyCache` and the teacher's own preference for a
//! plain in-memory structure over a crate for something this small.

use std::collections::HashMap;
use std::time::{Duration, Instant};

pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: HashMap<String, (Instant, u32)>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: HashMap::new(),
        }
    }

    /// Record one request from `client`. Returns `true` if it is within the
    /// current window's budget, `false` if the window is exhausted.
    pub fn check(&mut self, client: &str) -> bool {
        let now = Instant::now();
        let entry = self.windows.entry(client.to_string()).or_insert((now, 0));

        if now.duration_since(entry.0) >= self.window {
            *entry = (now, 0);
        }

        if entry.1 >= self.max_requests {
            return false;
        }
        entry.1 += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_the_limit_then_rejects() {
        let mut limiter = RateLimiter::new(3, Duration::from_secs(60));
        assert!(limiter.check("a"));
        assert!(limiter.check("a"));
        assert!(limiter.check("a"));
        assert!(!limiter.check("a"));
    }

    #[test]
    fn separate_clients_have_separate_budgets() {
        let mut limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.check("a"));
        assert!(limiter.check("b"));
        assert!(!limiter.check("a"));
    }

    #[test]
    fn window_resets_after_elapsed_duration() {
        let mut limiter = RateLimiter::new(1, Duration::from_millis(5));
        assert!(limiter.check("a"));
        assert!(!limiter.check("a"));
        std::thread::sleep(Duration::from_millis(10));
        assert!(limiter.check("a"));
    }
}
