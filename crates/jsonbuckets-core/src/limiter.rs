//! In-process request rate tracking per client origin.
//!
//! Counters are fixed-window and ephemeral: they reset when their window
//! elapses and on process restart. A denied request consumes no quota in any
//! window. Check-and-increment for one origin happens under a single lock
//! acquisition, so bursts cannot undercount.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

const DAY: Duration = Duration::from_secs(24 * 60 * 60);
const HOUR: Duration = Duration::from_secs(60 * 60);
const MINUTE: Duration = Duration::from_secs(60);

/// Route class for per-minute quotas: reads and mutations carry different
/// ceilings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteClass {
    /// Bucket reads and listings.
    Read,
    /// Bucket creation, update, and deletion.
    Write,
}

impl RouteClass {
    fn label(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

/// Ceilings applied per client origin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimits {
    /// Global ceiling over a rolling day, all routes combined.
    pub per_day: u32,

    /// Global ceiling over a rolling hour, all routes combined.
    pub per_hour: u32,

    /// Per-minute ceiling for read routes.
    pub read_per_minute: u32,

    /// Per-minute ceiling for mutating routes.
    pub write_per_minute: u32,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            per_day: 200,
            per_hour: 50,
            read_per_minute: 30,
            write_per_minute: 10,
        }
    }
}

impl RateLimits {
    fn for_class(&self, class: RouteClass) -> u32 {
        match class {
            RouteClass::Read => self.read_per_minute,
            RouteClass::Write => self.write_per_minute,
        }
    }
}

/// Outcome of a denied check: which quota tripped and when it resets.
#[derive(Clone, Debug)]
pub struct RateDenied {
    /// Human-readable description of the exceeded quota, e.g. `"50 per hour"`.
    pub message: String,

    /// Time until the violated window resets.
    pub retry_after: Duration,
}

#[derive(Clone, Copy, Debug)]
struct Counter {
    started: Instant,
    count: u32,
}

impl Counter {
    fn new(now: Instant) -> Self {
        Self {
            started: now,
            count: 0,
        }
    }

    /// Resets the counter when its window has elapsed.
    fn roll(&mut self, now: Instant, window: Duration) {
        if now.duration_since(self.started) >= window {
            self.started = now;
            self.count = 0;
        }
    }

    fn retry_after(&self, now: Instant, window: Duration) -> Duration {
        window.saturating_sub(now.duration_since(self.started))
    }
}

#[derive(Clone, Copy, Debug)]
struct OriginWindows {
    day: Counter,
    hour: Counter,
    read_minute: Counter,
    write_minute: Counter,
}

impl OriginWindows {
    fn new(now: Instant) -> Self {
        Self {
            day: Counter::new(now),
            hour: Counter::new(now),
            read_minute: Counter::new(now),
            write_minute: Counter::new(now),
        }
    }

    fn minute(&self, class: RouteClass) -> &Counter {
        match class {
            RouteClass::Read => &self.read_minute,
            RouteClass::Write => &self.write_minute,
        }
    }

    fn minute_mut(&mut self, class: RouteClass) -> &mut Counter {
        match class {
            RouteClass::Read => &mut self.read_minute,
            RouteClass::Write => &mut self.write_minute,
        }
    }
}

/// Fixed-window request tracker shared across request tasks.
///
/// Evaluation order is day, hour, minute; the first exceeded window denies the
/// request and nothing is incremented.
#[derive(Clone)]
pub struct RateTracker {
    limits: RateLimits,
    origins: Arc<Mutex<HashMap<String, OriginWindows>>>,
}

impl RateTracker {
    /// Creates a tracker enforcing the given ceilings.
    #[must_use]
    pub fn new(limits: RateLimits) -> Self {
        Self {
            limits,
            origins: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Checks and, when allowed, records one request from `origin`.
    ///
    /// # Errors
    ///
    /// Returns `RateDenied` naming the first exceeded quota.
    pub fn check(&self, origin: &str, class: RouteClass) -> Result<(), RateDenied> {
        self.check_at(Instant::now(), origin, class)
    }

    fn check_at(
        &self,
        now: Instant,
        origin: &str,
        class: RouteClass,
    ) -> Result<(), RateDenied> {
        let mut origins = self.origins.lock();
        if !origins.contains_key(origin) {
            // Sweep on first sight of a new origin: an entry whose day window
            // has elapsed holds no live quota state in any shorter window.
            origins.retain(|_, windows| now.duration_since(windows.day.started) < DAY);
        }
        let windows = origins
            .entry(origin.to_string())
            .or_insert_with(|| OriginWindows::new(now));

        windows.day.roll(now, DAY);
        windows.hour.roll(now, HOUR);
        windows.minute_mut(class).roll(now, MINUTE);

        if windows.day.count >= self.limits.per_day {
            return Err(RateDenied {
                message: format!("{} per day", self.limits.per_day),
                retry_after: windows.day.retry_after(now, DAY),
            });
        }
        if windows.hour.count >= self.limits.per_hour {
            return Err(RateDenied {
                message: format!("{} per hour", self.limits.per_hour),
                retry_after: windows.hour.retry_after(now, HOUR),
            });
        }
        let minute_limit = self.limits.for_class(class);
        if windows.minute(class).count >= minute_limit {
            return Err(RateDenied {
                message: format!("{} per minute ({})", minute_limit, class.label()),
                retry_after: windows.minute(class).retry_after(now, MINUTE),
            });
        }

        windows.day.count += 1;
        windows.hour.count += 1;
        windows.minute_mut(class).count += 1;
        Ok(())
    }
}
