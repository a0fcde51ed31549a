/*
 *  lib.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  Rotary encoder + OLED front panel for broadcasting a Slack status
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

pub mod catalog;
pub mod clock;
pub mod config;
pub mod constants;
pub mod display;
pub mod input;
pub mod network;
pub mod pacer;
pub mod presence;
pub mod runtime;

pub use catalog::{StatusCatalog, StatusEntry};
pub use clock::{Clock, ManualClock, SystemClock};
pub use display::{ControllerSettings, Screen, StatusController, Surface};
pub use input::{Direction, InputEvent, InputSource};
pub use network::{ConnectivityMonitor, ConnectivityState, NetworkInfo};
pub use presence::{PresenceClient, RemoteProfile};
pub use runtime::Runtime;
