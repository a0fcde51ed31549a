/*
 *  input/gesture.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  Push button debounce and click / double click / long click discrimination
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

use log::trace;
use std::time::{Duration, Instant};

use super::InputEvent;
use crate::config::InputConfig;

#[derive(Debug, Clone, Copy)]
pub struct GestureTiming {
    /// Level must hold this long to count
    pub debounce: Duration,
    /// Held this long fires LongClick, once, while still down
    pub long_press: Duration,
    /// Second release within this window of the first makes a DoubleClick
    pub double_click: Duration,
}

impl Default for GestureTiming {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(20),
            long_press: Duration::from_millis(1000),
            double_click: Duration::from_millis(300),
        }
    }
}

impl From<&InputConfig> for GestureTiming {
    fn from(config: &InputConfig) -> Self {
        let d = Self::default();
        Self {
            debounce: config.debounce_ms.map(Duration::from_millis).unwrap_or(d.debounce),
            long_press: config.long_press_ms.map(Duration::from_millis).unwrap_or(d.long_press),
            double_click: config.double_click_ms.map(Duration::from_millis).unwrap_or(d.double_click),
        }
    }
}

/// Turns sampled button levels into gestures.
///
/// Call `update` every few milliseconds, pressed or not; a single click is
/// only reported once the double click window has run out.
#[derive(Debug, Clone)]
pub struct ButtonGestures {
    timing: GestureTiming,
    raw: bool,
    raw_since: Instant,
    pressed: bool,
    pressed_at: Instant,
    long_fired: bool,
    /// release time of a click that may still become a double
    pending_click: Option<Instant>,
}

impl ButtonGestures {
    pub fn new(timing: GestureTiming, now: Instant) -> Self {
        Self {
            timing,
            raw: false,
            raw_since: now,
            pressed: false,
            pressed_at: now,
            long_fired: false,
            pending_click: None,
        }
    }

    pub fn update(&mut self, raw_pressed: bool, now: Instant) -> Option<InputEvent> {
        if raw_pressed != self.raw {
            self.raw = raw_pressed;
            self.raw_since = now;
        }

        let settled = now.saturating_duration_since(self.raw_since) >= self.timing.debounce;
        if settled && self.raw != self.pressed {
            self.pressed = self.raw;
            trace!("button {}", if self.pressed { "down" } else { "up" });
            if self.pressed {
                self.pressed_at = now;
                self.long_fired = false;
            } else if let Some(event) = self.on_release(now) {
                return Some(event);
            }
        }

        // the window runs whether or not the button went down again
        if let Some(released) = self.pending_click {
            if now.saturating_duration_since(released) > self.timing.double_click {
                self.pending_click = None;
                return Some(InputEvent::Click);
            }
        }

        if self.pressed
            && !self.long_fired
            && now.saturating_duration_since(self.pressed_at) >= self.timing.long_press
        {
            self.long_fired = true;
            return Some(InputEvent::LongClick);
        }
        None
    }

    fn on_release(&mut self, now: Instant) -> Option<InputEvent> {
        if self.long_fired {
            return None;
        }
        match self.pending_click.take() {
            Some(released) if now.saturating_duration_since(released) <= self.timing.double_click => {
                Some(InputEvent::DoubleClick)
            }
            // first release is stale, report it and start a new window
            Some(_) => {
                self.pending_click = Some(now);
                Some(InputEvent::Click)
            }
            None => {
                self.pending_click = Some(now);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hold `level` for `ms`, sampling every 5 ms
    fn hold(g: &mut ButtonGestures, t: &mut Instant, level: bool, ms: u64) -> Vec<InputEvent> {
        let mut out = Vec::new();
        for _ in 0..ms / 5 {
            *t += Duration::from_millis(5);
            out.extend(g.update(level, *t));
        }
        out
    }

    fn gestures() -> (ButtonGestures, Instant) {
        let t0 = Instant::now();
        (ButtonGestures::new(GestureTiming::default(), t0), t0)
    }

    #[test]
    fn test_single_click_after_window() {
        let (mut g, mut t) = gestures();
        assert!(hold(&mut g, &mut t, true, 100).is_empty());
        assert!(hold(&mut g, &mut t, false, 200).is_empty());
        assert_eq!(hold(&mut g, &mut t, false, 200), vec![InputEvent::Click]);
    }

    #[test]
    fn test_double_click() {
        let (mut g, mut t) = gestures();
        let mut events = hold(&mut g, &mut t, true, 80);
        events.extend(hold(&mut g, &mut t, false, 80));
        events.extend(hold(&mut g, &mut t, true, 80));
        events.extend(hold(&mut g, &mut t, false, 600));
        assert_eq!(events, vec![InputEvent::DoubleClick]);
    }

    #[test]
    fn test_long_click_fires_while_held_and_eats_release() {
        let (mut g, mut t) = gestures();
        let held = hold(&mut g, &mut t, true, 1500);
        assert_eq!(held, vec![InputEvent::LongClick]);
        assert!(hold(&mut g, &mut t, false, 600).is_empty());
    }

    #[test]
    fn test_bounce_is_debounced() {
        let (mut g, mut t) = gestures();
        let mut events = Vec::new();
        // 5 ms glitches never settle
        for _ in 0..10 {
            events.extend(hold(&mut g, &mut t, true, 5));
            events.extend(hold(&mut g, &mut t, false, 5));
        }
        events.extend(hold(&mut g, &mut t, false, 600));
        assert!(events.is_empty());
    }

    #[test]
    fn test_second_press_held_past_window_is_two_clicks() {
        let (mut g, mut t) = gestures();
        let mut events = hold(&mut g, &mut t, true, 80);
        events.extend(hold(&mut g, &mut t, false, 200));
        // first click is reported while the second press is still down
        let held = hold(&mut g, &mut t, true, 800);
        assert_eq!(held, vec![InputEvent::Click]);
        events.extend(held);
        events.extend(hold(&mut g, &mut t, false, 600));
        assert_eq!(events, vec![InputEvent::Click, InputEvent::Click]);
    }

    #[test]
    fn test_stale_release_without_sampling_is_click() {
        let timing = GestureTiming::default();
        let t0 = Instant::now();
        let mut g = ButtonGestures::new(timing, t0);
        let at = |ms: u64| t0 + Duration::from_millis(ms);

        assert_eq!(g.update(true, at(0)), None);
        assert_eq!(g.update(true, at(30)), None);
        assert_eq!(g.update(false, at(60)), None);
        assert_eq!(g.update(false, at(90)), None);
        assert_eq!(g.update(true, at(100)), None);
        assert_eq!(g.update(true, at(125)), None);
        // sampler stalls, next look is well past the window
        assert_eq!(g.update(false, at(130)), None);
        assert_eq!(g.update(false, at(500)), Some(InputEvent::Click));
        assert_eq!(g.update(false, at(900)), Some(InputEvent::Click));
    }
}
