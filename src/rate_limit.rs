//! A fixed-window, per-IP rate limiter held in server memory.
//!
//! The counters are advisory: they reset when the server restarts and are not
//! shared across instances.

use std::{
    collections::HashMap,
    net::IpAddr,
    sync::{Arc, Mutex},
};

use time::{Duration, OffsetDateTime};

use crate::Error;

/// The number of feedback submissions allowed per IP per window.
pub const FEEDBACK_LIMIT: u32 = 5;

/// The width of the rate limit window.
pub const RATE_LIMIT_WINDOW: Duration = Duration::hours(1);

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: OffsetDateTime,
    count: u32,
}

/// Counts requests per client IP over a fixed window.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    windows: Arc<Mutex<HashMap<IpAddr, Window>>>,
}

impl RateLimiter {
    /// Create a limiter allowing `limit` requests per `window` per IP.
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record a request from `addr` at `now` and check it against the limit.
    ///
    /// `now` is a parameter so tests can step through a window without
    /// sleeping.
    ///
    /// # Errors
    ///
    /// Returns [Error::RateLimited] with the seconds remaining in the current
    /// window once the limit is exceeded.
    pub fn check(&self, addr: IpAddr, now: OffsetDateTime) -> Result<(), Error> {
        let mut windows = self.windows.lock().map_err(|_| Error::DatabaseLock)?;

        let window = windows.entry(addr).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if now - window.started_at >= self.window {
            window.started_at = now;
            window.count = 0;
        }

        if window.count >= self.limit {
            let retry_after = window.started_at + self.window - now;

            return Err(Error::RateLimited {
                retry_after_seconds: retry_after.whole_seconds().max(1) as u64,
            });
        }

        window.count += 1;

        Ok(())
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(FEEDBACK_LIMIT, RATE_LIMIT_WINDOW)
    }
}
