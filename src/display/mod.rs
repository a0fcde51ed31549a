/*
 *  display/mod.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display subsystem: panel drivers, drawing surface, screens and controller
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

// Core trait definitions
pub mod traits;
pub mod error;
pub mod framebuffer;
pub mod factory;

// Panel drivers (ssd1306 behind its feature, mock always)
pub mod drivers;

// Cursor surface over a driver
pub mod manager;

// UI state machine
pub mod state;
pub mod screens;
pub mod controller;

pub use traits::{char_width, DisplayCapabilities, DisplayDriver, Surface};
pub use error::{DisplayError, DisplayFactoryError};
pub use framebuffer::MonoFrame;
pub use factory::{BoxedDriver, DisplayDriverFactory};
pub use manager::DisplayManager;
pub use state::ControllerState;
pub use controller::{ControllerSettings, StatusController};
pub use drivers::mock::{MockDriver, MockPanelState};

#[cfg(feature = "driver-ssd1306")]
pub use drivers::ssd1306::Ssd1306Driver;

/// Screen enum - what the panel is showing
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Screen {
    Boot,      // Splash until the network reports in
    Main,      // Status bar + selection list
    SetExpire, // Expiry stepper for the highlighted entry
    Wifi,      // Connectivity diagnostics + clock
    Ap,        // Captive portal instructions
}
