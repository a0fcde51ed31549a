/*
 *  clock.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  Clock source - monotonic time for timers, wall time for expiry instants
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use chrono::{DateTime, Local, TimeZone, Utc};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Time as the controller sees it.
///
/// `now()` drives the idle / refresh timers and must never go backwards.
/// `epoch_seconds()` is wall time (NTP synchronised by the host) and is only
/// used to turn "expire in N minutes" into an absolute instant.
pub trait Clock {
    fn now(&self) -> Instant;

    fn epoch_seconds(&self) -> i64;

    /// Local wall time for on-screen display.
    fn local_time(&self) -> DateTime<Local> {
        Local
            .timestamp_opt(self.epoch_seconds(), 0)
            .single()
            .unwrap_or_else(Local::now)
    }
}

/// Host clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn epoch_seconds(&self) -> i64 {
        Utc::now().timestamp()
    }

    fn local_time(&self) -> DateTime<Local> {
        Local::now()
    }
}

#[derive(Debug)]
struct ManualTime {
    base: Instant,
    elapsed: Duration,
    epoch: i64,
}

/// Hand-cranked clock for tests and simulations.
///
/// Clones share the same time, so a test can keep one handle while the
/// controller owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualTime>>,
}

impl ManualClock {
    pub fn new(epoch: i64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualTime {
                base: Instant::now(),
                elapsed: Duration::ZERO,
                epoch,
            })),
        }
    }

    /// Move both monotonic and wall time forward.
    pub fn advance(&self, by: Duration) {
        if let Ok(mut t) = self.inner.lock() {
            t.elapsed += by;
            t.epoch += by.as_secs() as i64;
        }
    }

    /// Step wall time only (an NTP correction).
    pub fn set_epoch(&self, epoch: i64) {
        if let Ok(mut t) = self.inner.lock() {
            t.epoch = epoch;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        match self.inner.lock() {
            Ok(t) => t.base + t.elapsed,
            Err(_) => Instant::now(),
        }
    }

    fn epoch_seconds(&self) -> i64 {
        self.inner.lock().map(|t| t.epoch).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new(1_700_000_000);
        let other = clock.clone();
        let start = other.now();

        clock.advance(Duration::from_secs(90));

        assert_eq!(other.epoch_seconds(), 1_700_000_090);
        assert_eq!(other.now() - start, Duration::from_secs(90));
    }

    #[test]
    fn test_set_epoch_leaves_monotonic_alone() {
        let clock = ManualClock::new(100);
        let start = clock.now();
        clock.set_epoch(5_000);
        assert_eq!(clock.epoch_seconds(), 5_000);
        assert_eq!(clock.now(), start);
    }
}
