/*
 *  display/state.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  Screen / selection / expiry state and its transition rules
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

use log::{debug, info};
use std::time::Instant;

use super::Screen;
use crate::constants::{MAX_EXPIRY_MINUTES, VISIBLE_LINES};
use crate::input::Direction;

/// Everything the render pass needs to know about where the user is.
///
/// Fields are private; every change goes through a method that keeps
/// `scroll_offset <= highlighted <= scroll_offset + VISIBLE_LINES - 1`,
/// `highlighted < catalog_size` and `edit_expiry_minutes <= 999`.
#[derive(Debug, Clone)]
pub struct ControllerState {
    screen: Screen,
    highlighted: usize,
    scroll_offset: usize,
    edit_expiry_minutes: u32,
    settings_locked: bool,
    dirty: bool,
    last_interaction_at: Instant,
    catalog_size: usize,
}

impl ControllerState {
    pub fn new(catalog_size: usize, now: Instant) -> Self {
        Self {
            screen: Screen::Boot,
            highlighted: 0,
            scroll_offset: 0,
            edit_expiry_minutes: 0,
            settings_locked: false,
            dirty: true,
            last_interaction_at: now,
            catalog_size: catalog_size.max(1),
        }
    }

    pub fn screen(&self) -> Screen { self.screen }
    pub fn highlighted(&self) -> usize { self.highlighted }
    pub fn scroll_offset(&self) -> usize { self.scroll_offset }
    pub fn edit_expiry_minutes(&self) -> u32 { self.edit_expiry_minutes }
    pub fn settings_locked(&self) -> bool { self.settings_locked }
    pub fn is_dirty(&self) -> bool { self.dirty }
    pub fn last_interaction_at(&self) -> Instant { self.last_interaction_at }

    /// Largest legal scroll offset
    fn max_scroll(&self) -> usize {
        self.catalog_size.saturating_sub(VISIBLE_LINES)
    }

    /// The transition function. Returns true if the screen changed.
    ///
    /// MAIN is refused while settings are locked, silently and without
    /// marking dirty. Entering SET_EXPIRE presets the edit value.
    pub fn request_screen(&mut self, target: Screen, expiry_preset: u32) -> bool {
        if target == Screen::Main && self.settings_locked {
            debug!("{:?} -> Main refused, settings locked", self.screen);
            return false;
        }
        if target == self.screen {
            return false;
        }
        if target == Screen::SetExpire {
            self.edit_expiry_minutes = expiry_preset.min(MAX_EXPIRY_MINUTES);
        }
        info!("Screen {:?} -> {:?}", self.screen, target);
        self.screen = target;
        self.dirty = true;
        true
    }

    pub fn lock_settings(&mut self, locked: bool) {
        if self.settings_locked != locked {
            debug!("Settings {}", if locked { "locked" } else { "unlocked" });
            self.settings_locked = locked;
        }
    }

    /// Move the highlight one entry, scrolling the minimum needed to keep it visible.
    pub fn rotate_highlight(&mut self, direction: Direction) {
        self.highlighted = match direction {
            Direction::Increase => (self.highlighted + 1).min(self.catalog_size - 1),
            Direction::Decrease => self.highlighted.saturating_sub(1),
        };

        if self.highlighted < self.scroll_offset {
            self.scroll_offset = self.highlighted;
        } else if self.highlighted >= self.scroll_offset + VISIBLE_LINES {
            self.scroll_offset = self.highlighted + 1 - VISIBLE_LINES;
        }
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    /// One minute up or down, saturating at 0 and 999
    pub fn step_expiry(&mut self, direction: Direction) {
        self.edit_expiry_minutes = match direction {
            Direction::Increase => (self.edit_expiry_minutes + 1).min(MAX_EXPIRY_MINUTES),
            Direction::Decrease => self.edit_expiry_minutes.saturating_sub(1),
        };
    }

    /// Any input counts as presence
    pub fn touch(&mut self, now: Instant) {
        self.last_interaction_at = now;
        self.dirty = true;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clear the dirty flag, returning what it was
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Time since the last input
    pub fn idle_for(&self, now: Instant) -> std::time::Duration {
        now.saturating_duration_since(self.last_interaction_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn state(size: usize) -> ControllerState {
        ControllerState::new(size, Instant::now())
    }

    #[test]
    fn test_scroll_only_when_leaving_viewport() {
        let mut s = state(9);
        for _ in 0..5 {
            s.rotate_highlight(Direction::Increase);
        }
        assert_eq!((s.highlighted(), s.scroll_offset()), (5, 3));

        for _ in 0..2 {
            s.rotate_highlight(Direction::Decrease);
        }
        assert_eq!((s.highlighted(), s.scroll_offset()), (3, 3));

        s.rotate_highlight(Direction::Decrease);
        assert_eq!((s.highlighted(), s.scroll_offset()), (2, 2));
    }

    #[test]
    fn test_highlight_saturates() {
        let mut s = state(4);
        s.rotate_highlight(Direction::Decrease);
        assert_eq!(s.highlighted(), 0);
        for _ in 0..10 {
            s.rotate_highlight(Direction::Increase);
        }
        assert_eq!((s.highlighted(), s.scroll_offset()), (3, 1));
    }

    #[test]
    fn test_locked_main_is_noop() {
        let mut s = state(9);
        s.lock_settings(true);
        assert!(s.request_screen(Screen::Wifi, 0));
        s.take_dirty();

        assert!(!s.request_screen(Screen::Main, 0));
        assert_eq!(s.screen(), Screen::Wifi);
        assert!(!s.is_dirty());

        s.lock_settings(false);
        assert!(s.request_screen(Screen::Main, 0));
        assert!(s.is_dirty());
    }

    #[test]
    fn test_set_expire_preset() {
        let mut s = state(9);
        s.request_screen(Screen::Main, 0);
        s.request_screen(Screen::SetExpire, 60);
        assert_eq!(s.edit_expiry_minutes(), 60);
        s.step_expiry(Direction::Decrease);
        s.request_screen(Screen::Main, 0);
        s.request_screen(Screen::SetExpire, 60);
        assert_eq!(s.edit_expiry_minutes(), 60);

        s.request_screen(Screen::Main, 0);
        s.request_screen(Screen::SetExpire, 5000);
        assert_eq!(s.edit_expiry_minutes(), MAX_EXPIRY_MINUTES);
    }

    #[test]
    fn test_single_entry_catalog() {
        let mut s = state(1);
        s.rotate_highlight(Direction::Increase);
        assert_eq!((s.highlighted(), s.scroll_offset()), (0, 0));
    }

    fn direction() -> impl Strategy<Value = Direction> {
        prop_oneof![Just(Direction::Increase), Just(Direction::Decrease)]
    }

    proptest! {
        #[test]
        fn prop_viewport_holds(size in 1usize..=25, steps in prop::collection::vec(direction(), 0..80)) {
            let mut s = state(size);
            for d in steps {
                s.rotate_highlight(d);
                prop_assert!(s.highlighted() < size);
                prop_assert!(s.scroll_offset() <= s.highlighted());
                prop_assert!(s.highlighted() <= s.scroll_offset() + VISIBLE_LINES - 1);
                prop_assert!(s.scroll_offset() <= size.saturating_sub(VISIBLE_LINES));
            }
        }

        #[test]
        fn prop_expiry_in_range(start in 0u32..=999, steps in prop::collection::vec(direction(), 0..2000)) {
            let mut s = state(9);
            s.request_screen(Screen::SetExpire, start);
            for d in steps {
                s.step_expiry(d);
                prop_assert!(s.edit_expiry_minutes() <= MAX_EXPIRY_MINUTES);
            }
        }
    }
}
