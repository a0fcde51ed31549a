/*
 *  presence/mod.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  Remote presence service - profile snapshot and client contract
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

pub mod slack;

pub use slack::{PresenceError, SlackClient};

use crate::constants::{STATUS_DISPLAY_BLANK, STATUS_DISPLAY_FETCHING, STATUS_DISPLAY_SENDING};

/// Last known state of the user's broadcast status.
///
/// A fresh value is produced by every fetch or set call; the controller only
/// ever keeps the latest one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteProfile {
    pub display_name: String,
    pub status_text: String,
    pub status_icon: String,

    /// Absolute expiry, epoch seconds (0 = none)
    pub expiration_epoch: i64,

    /// The call that produced this profile failed
    pub is_error: bool,
}

impl RemoteProfile {
    /// Nothing fetched yet
    pub fn blank() -> Self {
        Self {
            display_name: String::new(),
            status_text: STATUS_DISPLAY_BLANK.to_string(),
            status_icon: String::new(),
            expiration_epoch: 0,
            is_error: false,
        }
    }

    /// Synthetic profile shown while a submit is in flight.
    pub fn sending() -> Self {
        Self {
            display_name: String::new(),
            status_text: STATUS_DISPLAY_SENDING.to_string(),
            status_icon: String::new(),
            expiration_epoch: 0,
            is_error: false,
        }
    }

    /// Synthetic profile shown while a refresh is in flight, keeps the known name.
    pub fn fetching(previous: &RemoteProfile) -> Self {
        Self {
            display_name: if previous.is_error { String::new() } else { previous.display_name.clone() },
            status_text: STATUS_DISPLAY_FETCHING.to_string(),
            status_icon: String::new(),
            expiration_epoch: 0,
            is_error: false,
        }
    }

    /// Result of a failed call
    pub fn error() -> Self {
        Self {
            display_name: String::new(),
            status_text: String::new(),
            status_icon: String::new(),
            expiration_epoch: 0,
            is_error: true,
        }
    }
}

impl Default for RemoteProfile {
    fn default() -> Self {
        Self::blank()
    }
}

/// The presence service as the controller needs it.
///
/// Both calls are blocking and bounded; failures come back as a profile with
/// `is_error` set, never as a panic or a retry.
pub trait PresenceClient {
    fn fetch_current_status(&mut self) -> RemoteProfile;

    /// `expire_epoch` is an absolute epoch second, 0 for no expiry.
    fn set_status(&mut self, title: &str, icon: &str, expire_epoch: i64) -> RemoteProfile;
}

impl<P: PresenceClient + ?Sized> PresenceClient for Box<P> {
    fn fetch_current_status(&mut self) -> RemoteProfile {
        (**self).fetch_current_status()
    }

    fn set_status(&mut self, title: &str, icon: &str, expire_epoch: i64) -> RemoteProfile {
        (**self).set_status(title, icon, expire_epoch)
    }
}
