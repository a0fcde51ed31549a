/*
 *  display/controller.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  Gesture handling, status submission, refresh and render scheduling
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

use log::{debug, error, info, warn};
use std::time::Duration;

use super::screens::{render_blank, render_screen, View};
use super::{ControllerState, Screen, Surface};
use crate::catalog::StatusCatalog;
use crate::clock::Clock;
use crate::constants::{PROFILE_REFRESH_INTERVAL, REDRAW_INTERVAL, SCREEN_OFF_INTERVAL};
use crate::input::{Direction, InputEvent};
use crate::network::{ConnectivityState, NetworkInfo};
use crate::pacer::Pacer;
use crate::presence::{PresenceClient, RemoteProfile};

/// Timings and labels the controller runs with
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// Remote status re-read period while on MAIN
    pub refresh_interval: Duration,
    /// Idle time before the panel blanks
    pub screen_off_interval: Duration,
    /// Forced redraw period
    pub redraw_interval: Duration,
    /// Shown under the clock on the WiFi screen
    pub timezone_label: String,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            refresh_interval: PROFILE_REFRESH_INTERVAL,
            screen_off_interval: SCREEN_OFF_INTERVAL,
            redraw_interval: REDRAW_INTERVAL,
            timezone_label: String::new(),
        }
    }
}

/// Owns the UI state and drives the surface and the presence client.
///
/// Single threaded. Every handler runs to completion; the only blocking
/// points are the presence calls inside submit and refresh, each preceded
/// by a rendered placeholder.
pub struct StatusController<S: Surface, P: PresenceClient, C: Clock> {
    state: ControllerState,
    catalog: StatusCatalog,
    surface: S,
    presence: P,
    clock: C,
    profile: RemoteProfile,
    network: NetworkInfo,
    settings: ControllerSettings,
    /// last firing is the last profile fetch (or submit)
    refresh: Pacer,
    redraw: Pacer,
    blanked: bool,
}

impl<S: Surface, P: PresenceClient, C: Clock> StatusController<S, P, C> {
    pub fn new(catalog: StatusCatalog, surface: S, presence: P, clock: C, settings: ControllerSettings) -> Self {
        let now = clock.now();
        info!("Controller up, {} status entries", catalog.size());
        Self {
            state: ControllerState::new(catalog.size(), now),
            refresh: Pacer::disabled(settings.refresh_interval),
            redraw: Pacer::new(settings.redraw_interval),
            catalog,
            surface,
            presence,
            clock,
            profile: RemoteProfile::blank(),
            network: NetworkInfo::default(),
            settings,
            blanked: false,
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn profile(&self) -> &RemoteProfile {
        &self.profile
    }

    pub fn catalog(&self) -> &StatusCatalog {
        &self.catalog
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn presence(&self) -> &P {
        &self.presence
    }

    pub fn network_info(&self) -> &NetworkInfo {
        &self.network
    }

    /// Panel is blanked by the screen saver
    pub fn is_blanked(&self) -> bool {
        self.blanked
    }

    /// Navigate to `target` through the transition rules. Returns true if the screen changed.
    pub fn request_screen(&mut self, target: Screen) -> bool {
        let preset = self.catalog.entry_at(self.state.highlighted()).default_expiry_minutes;
        self.state.request_screen(target, preset)
    }

    /// React to a connectivity change
    pub fn on_connectivity(&mut self, connectivity: ConnectivityState) {
        debug!("Connectivity signal {:?} on {:?}", connectivity, self.state.screen());
        match connectivity {
            ConnectivityState::Booting => {}
            ConnectivityState::Unconfigured => {
                self.state.lock_settings(true);
                self.request_screen(Screen::Ap);
            }
            ConnectivityState::Connecting => {
                self.state.lock_settings(true);
                self.request_screen(Screen::Wifi);
            }
            ConnectivityState::Online => {
                self.state.lock_settings(false);
                self.request_screen(Screen::Main);
                // first refresh on the next tick
                self.refresh.enable(true);
                self.refresh.reset();
            }
        }
    }

    /// Latest network details for the diagnostic screens
    pub fn set_network_info(&mut self, info: NetworkInfo) {
        if info != self.network {
            self.network = info;
            if matches!(self.state.screen(), Screen::Wifi | Screen::Ap) {
                self.state.mark_dirty();
            }
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Rotate(direction) => self.on_rotate(direction),
            InputEvent::Click => self.on_click(),
            InputEvent::DoubleClick => self.on_double_click(),
            InputEvent::LongClick => self.on_long_click(),
        }
    }

    pub fn on_rotate(&mut self, direction: Direction) {
        self.state.touch(self.clock.now());
        match self.state.screen() {
            Screen::Main => self.state.rotate_highlight(direction),
            Screen::SetExpire => self.state.step_expiry(direction),
            _ => {}
        }
    }

    /// Submit from MAIN or SET_EXPIRE, ignored elsewhere
    pub fn on_click(&mut self) {
        self.state.touch(self.clock.now());
        match self.state.screen() {
            Screen::Main | Screen::SetExpire => self.submit(),
            other => debug!("Click ignored on {:?}", other),
        }
    }

    /// MAIN <-> SET_EXPIRE
    pub fn on_double_click(&mut self) {
        self.state.touch(self.clock.now());
        match self.state.screen() {
            Screen::Main => {
                self.request_screen(Screen::SetExpire);
            }
            Screen::SetExpire => {
                self.request_screen(Screen::Main);
            }
            other => debug!("Double click ignored on {:?}", other),
        }
    }

    /// Cancels an edit, otherwise toggles the WiFi diagnostics
    pub fn on_long_click(&mut self) {
        self.state.touch(self.clock.now());
        match self.state.screen() {
            Screen::SetExpire | Screen::Wifi | Screen::Ap => {
                self.request_screen(Screen::Main);
            }
            Screen::Main => {
                self.request_screen(Screen::Wifi);
            }
            Screen::Boot => debug!("Long click ignored on Boot"),
        }
    }

    /// Send the highlighted entry. Uses the edited expiry when coming from
    /// SET_EXPIRE, the entry default otherwise.
    fn submit(&mut self) {
        let entry = self.catalog.entry_at(self.state.highlighted()).clone();
        let expire_in_minutes = if self.state.screen() == Screen::SetExpire {
            self.state.edit_expiry_minutes()
        } else {
            entry.default_expiry_minutes
        };

        self.request_screen(Screen::Main);

        self.profile = RemoteProfile::sending();
        self.state.mark_dirty();
        self.render();

        let expire_epoch = if expire_in_minutes > 0 {
            self.clock.epoch_seconds() + i64::from(expire_in_minutes) * 60
        } else {
            0
        };

        info!("Submitting [{}] {} for {} min", entry.title, entry.icon, expire_in_minutes);
        let result = self.presence.set_status(&entry.title, &entry.icon, expire_epoch);
        if result.is_error {
            warn!("Submit failed");
        }
        self.refresh.mark(self.clock.now());
        self.set_profile(result);
    }

    /// Re-read the remote status, showing a placeholder while the call runs
    pub fn refresh_profile(&mut self) {
        self.profile = RemoteProfile::fetching(&self.profile);
        self.state.mark_dirty();
        self.render();

        let result = self.presence.fetch_current_status();
        self.refresh.mark(self.clock.now());
        self.set_profile(result);
    }

    fn set_profile(&mut self, profile: RemoteProfile) {
        self.profile = profile;
        self.state.mark_dirty();
    }

    /// One pass of the cooperative loop: refresh if due (MAIN only),
    /// forced redraw cadence, then render if anything changed.
    pub fn tick(&mut self) {
        let now = self.clock.now();

        if self.state.screen() == Screen::Main && self.refresh.should_fire(now) {
            self.refresh_profile();
        }

        if self.redraw.should_fire(now) {
            self.state.mark_dirty();
        }

        let saver_due = !self.blanked && self.state.idle_for(now) >= self.settings.screen_off_interval;
        if self.state.is_dirty() || saver_due {
            self.render();
        }
    }

    /// Render now, or blank the panel if idle long enough
    pub fn render(&mut self) {
        self.state.take_dirty();

        let now = self.clock.now();
        if self.state.idle_for(now) >= self.settings.screen_off_interval {
            if !self.blanked {
                info!("Screen saver on after {:?} idle", self.state.idle_for(now));
                render_blank(&mut self.surface).unwrap_or_else(|e| error!("Blank failed: {}", e));
                self.blanked = true;
            }
            return;
        }
        if self.blanked {
            info!("Screen saver off");
            self.blanked = false;
        }

        let view = View {
            state: &self.state,
            catalog: &self.catalog,
            profile: &self.profile,
            network: &self.network,
            local_time: self.clock.local_time(),
            timezone_label: &self.settings.timezone_label,
        };
        render_screen(&mut self.surface, &view).unwrap_or_else(|e| error!("Render failed: {}", e));
    }
}
