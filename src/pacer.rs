/*
 *  pacer.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  Interval gate for the cooperative loop (redraw, refresh, polling)
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
use std::time::{Duration, Instant};

/// Fires at most once per period. Time is passed in so callers can drive
/// it from any `Clock`.
#[derive(Debug, Clone)]
pub struct Pacer {
    last: Option<Instant>,
    period: Duration,
    enabled: bool,
}

impl Pacer {
    /// A new pacer fires on the first check.
    pub fn new(period: Duration) -> Self {
        Self { last: None, period, enabled: true }
    }

    /// A pacer that never fires until `enable(true)`.
    pub fn disabled(period: Duration) -> Self {
        Self { last: None, period, enabled: false }
    }

    /// Would `should_fire` return true at `now`? Does not reschedule.
    #[inline]
    pub fn is_due(&self, now: Instant) -> bool {
        if !self.enabled {
            return false;
        }
        match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.period,
        }
    }

    /// Returns true if the period has passed; if true, it also schedules the next deadline.
    #[inline]
    pub fn should_fire(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.last = Some(now);
            true
        } else {
            false
        }
    }

    /// Record a firing that happened outside `should_fire`.
    #[inline]
    pub fn mark(&mut self, now: Instant) {
        self.last = Some(now);
    }

    /// Next check fires immediately.
    #[inline]
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Enable or disable. A change of state also resets, so re-enabling fires
    /// straight away. Returns whether the state actually changed.
    pub fn enable(&mut self, enable: bool) -> bool {
        let changed = self.enabled != enable;
        self.enabled = enable;
        if changed {
            self.last = None;
        }
        changed
    }
}
