/*
 *  constants.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  Global constants shared by the controller, renderers and config
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

//! This module contains global constants used across the display and other modules.

use std::time::Duration;

/// The total width of the OLED display in pixels.
pub const DISPLAY_WIDTH: u32 = 128;
/// The total height of the OLED display in pixels.
pub const DISPLAY_HEIGHT: u32 = 64;

/// Number of catalog entries visible at once on the main screen.
pub const VISIBLE_LINES: usize = 3;

/// Most characters of a status title / display name that fit across the panel.
pub const STATUS_CHARS_MAX: usize = 10;
/// Longest icon token accepted from configuration.
pub const STATUS_ICON_CHARS_MAX: usize = 32;
/// Upper bound of the expiry stepper (three digits).
pub const MAX_EXPIRY_MINUTES: u32 = 999;
/// Largest catalog the configuration may define.
pub const MAX_CATALOG_SIZE: usize = 25;

// text size 1 (status bar, info screens)
/// Character cell width for text size 1 (FONT_6X10).
pub const TS1_CHAR_WIDTH: u32 = 6;
/// Character cell height for text size 1.
pub const TS1_CHAR_HEIGHT: u32 = 10;
/// Status bar height, pixels.
pub const STATUS_BAR_HEIGHT: u32 = 10;
/// Y of the status bar text.
pub const CURSOR_STATUS_BAR: i32 = 0;

/// Five text-size-1 rows used by the info screens.
pub const TS1_LINES: [i32; 5] = [0, 17, 30, 43, 54];

// text size 2 (selection list, expiry stepper)
/// Character cell width for text size 2 (FONT_9X15).
pub const TS2_CHAR_WIDTH: u32 = 9;
/// Character cell height for text size 2.
pub const TS2_CHAR_HEIGHT: u32 = 15;
/// Height of one selection line / highlight band.
pub const LINE_HEIGHT: u32 = 18;
/// Y of the three selection lines.
pub const LIST_LINES: [i32; VISIBLE_LINES] = [10, 28, 46];

/// Placeholder when the remote status is empty or not fetched yet.
pub const STATUS_DISPLAY_BLANK: &str = "---";
/// Shown in the status bar after a failed remote call.
pub const STATUS_DISPLAY_ERROR: &str = "ERROR";
/// Status bar text while a refresh is in flight.
pub const STATUS_DISPLAY_FETCHING: &str = "...";
/// Status bar text while a submit is in flight.
pub const STATUS_DISPLAY_SENDING: &str = "Sending...";

/// How often the remote status is re-read while on the main screen.
pub const PROFILE_REFRESH_INTERVAL: Duration = Duration::from_secs(60);
/// Panel blanks after this long without input.
pub const SCREEN_OFF_INTERVAL: Duration = Duration::from_secs(60 * 60);
/// Forced redraw cadence, keeps the clock on the WiFi screen ticking.
pub const REDRAW_INTERVAL: Duration = Duration::from_millis(500);

// rotary encoder on the Pi header, BCM numbering
/// Encoder channel A when `input.pin_a` is unset.
pub const DEFAULT_PIN_A: u8 = 17;
/// Encoder channel B when `input.pin_b` is unset.
pub const DEFAULT_PIN_B: u8 = 27;
/// Push button when `input.pin_button` is unset.
pub const DEFAULT_PIN_BUTTON: u8 = 22;
/// Quadrature steps per reported detent.
pub const DEFAULT_STEPS_PER_CLICK: u8 = 4;
