/*
 *  catalog.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  Ordered, fixed-size catalog of selectable status entries
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

use serde::{Deserialize, Serialize};

/// One selectable status: what is shown, what is sent, and how long it lasts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    /// Short display string, only the first 10 characters are ever drawn
    pub title: String,

    /// Opaque emoji token, passed through to the presence service untouched
    pub icon: String,

    /// Default expiry in minutes, 0 = no auto-expiry
    #[serde(rename = "expiry", default)]
    pub default_expiry_minutes: u32,
}

impl StatusEntry {
    pub fn new(title: &str, icon: &str, default_expiry_minutes: u32) -> Self {
        Self {
            title: title.to_string(),
            icon: icon.to_string(),
            default_expiry_minutes,
        }
    }
}

/// Read-only list of status entries, index is the identity.
#[derive(Debug, Clone)]
pub struct StatusCatalog {
    entries: Vec<StatusEntry>,
}

impl StatusCatalog {
    /// Build a catalog from entries loaded elsewhere (config, tests).
    ///
    /// An empty list falls back to the compiled defaults; the controller
    /// relies on there always being at least one entry.
    pub fn new(entries: Vec<StatusEntry>) -> Self {
        if entries.is_empty() {
            log::warn!("Empty status list supplied, using compiled defaults");
            return Self::default();
        }
        Self { entries }
    }

    /// Entry at `index`. Callers clamp the index, out of range saturates to the last entry.
    pub fn entry_at(&self, index: usize) -> &StatusEntry {
        let last = self.entries.len() - 1;
        &self.entries[index.min(last)]
    }

    /// Number of entries (always >= 1)
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEntry> {
        self.entries.iter()
    }
}

impl Default for StatusCatalog {
    fn default() -> Self {
        Self {
            entries: vec![
                StatusEntry::new("Available", ":white_check_mark:", 0),
                StatusEntry::new("Coffee", ":coffee:", 15),
                StatusEntry::new("Lunch", ":hamburger:", 60),
                StatusEntry::new("Meeting", ":calendar:", 60),
                StatusEntry::new("OOO", ":warning:", 0),
                StatusEntry::new("Offline", ":x:", 0),
                StatusEntry::new("Walk Dog", ":dog2:", 30),
                StatusEntry::new("On a Break", ":hourglass:", 30),
                StatusEntry::new("Very Busy", ":lightning:", 120),
                StatusEntry::new("Doctor", ":stethoscope:", 90),
                StatusEntry::new("PTO", ":palm_tree:", 0),
                StatusEntry::new("Sleeping", ":sleeping:", 0),
            ],
        }
    }
}
