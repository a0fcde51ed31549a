/*
 *  display/screens.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  The five screens: boot splash, status list, expiry stepper, WiFi, portal
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

use arrayvec::ArrayString;
use chrono::{DateTime, Local};
use core::fmt::Write;
use embedded_graphics::pixelcolor::BinaryColor;

use super::{ControllerState, DisplayError, Screen, Surface};
use crate::catalog::StatusCatalog;
use crate::constants::{
    CURSOR_STATUS_BAR, LINE_HEIGHT, LIST_LINES, STATUS_CHARS_MAX, STATUS_DISPLAY_BLANK,
    STATUS_DISPLAY_ERROR, TS1_CHAR_WIDTH, TS1_LINES, VISIBLE_LINES,
};
use crate::network::NetworkInfo;
use crate::presence::RemoteProfile;

/// Room for STATUS_CHARS_MAX characters of any width
pub type BarText = ArrayString<{ STATUS_CHARS_MAX * 4 }>;

/// Everything a render pass reads. Borrowed, nothing is mutated.
pub struct View<'a> {
    pub state: &'a ControllerState,
    pub catalog: &'a StatusCatalog,
    pub profile: &'a RemoteProfile,
    pub network: &'a NetworkInfo,
    pub local_time: DateTime<Local>,
    pub timezone_label: &'a str,
}

/// Status bar contents: optional name on the left, status on the right
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBarText {
    pub name: Option<BarText>,
    pub status: BarText,
}

/// Copy at most `max_chars` characters
fn truncate_chars(s: &str, max_chars: usize) -> BarText {
    let mut out = BarText::new();
    for ch in s.chars().take(max_chars) {
        if out.try_push(ch).is_err() {
            break;
        }
    }
    out
}

/// ERROR on a failed call, otherwise the first word of the name and the
/// status text, both cut to 10 characters; an empty status shows "---".
pub fn status_bar_text(profile: &RemoteProfile) -> StatusBarText {
    if profile.is_error {
        return StatusBarText { name: None, status: truncate_chars(STATUS_DISPLAY_ERROR, STATUS_CHARS_MAX) };
    }

    let status = if profile.status_text.is_empty() {
        truncate_chars(STATUS_DISPLAY_BLANK, STATUS_CHARS_MAX)
    } else {
        truncate_chars(&profile.status_text, STATUS_CHARS_MAX)
    };

    let name = profile
        .display_name
        .split(' ')
        .next()
        .filter(|first| !first.is_empty())
        .map(|first| truncate_chars(first, STATUS_CHARS_MAX));

    StatusBarText { name, status }
}

/// Clear, draw the current screen, present
pub fn render_screen<S: Surface>(surface: &mut S, view: &View) -> Result<(), DisplayError> {
    surface.clear();
    match view.state.screen() {
        Screen::Boot => render_boot(surface),
        Screen::Main => render_main(surface, view),
        Screen::SetExpire => render_set_expire(surface, view),
        Screen::Wifi => render_wifi(surface, view),
        Screen::Ap => render_ap(surface, view),
    }?;
    surface.present()
}

/// Blank panel for the screen saver
pub fn render_blank<S: Surface>(surface: &mut S) -> Result<(), DisplayError> {
    surface.clear();
    surface.present()
}

fn render_boot<S: Surface>(surface: &mut S) -> Result<(), DisplayError> {
    surface.set_text_size(1);
    surface.set_color(BinaryColor::On);
    surface.move_to(0, TS1_LINES[4]);
    surface.draw_text(concat!("StatusDial v", env!("CARGO_PKG_VERSION")))
}

fn render_main<S: Surface>(surface: &mut S, view: &View) -> Result<(), DisplayError> {
    surface.set_text_size(1);
    surface.set_color(BinaryColor::On);

    let bar = status_bar_text(view.profile);
    if let Some(name) = bar.name {
        surface.move_to(0, CURSOR_STATUS_BAR);
        surface.draw_text(&name)?;
    }
    let x = surface.width() as i32 - (bar.status.chars().count() as u32 * TS1_CHAR_WIDTH) as i32;
    surface.move_to(x, CURSOR_STATUS_BAR);
    surface.draw_text(&bar.status)?;

    let top = view.state.scroll_offset();
    for (line, y) in LIST_LINES.iter().enumerate().take(VISIBLE_LINES) {
        let index = top + line;
        if index >= view.catalog.size() {
            break;
        }
        let entry = view.catalog.entry_at(index);
        render_list_line(surface, *y, &entry.title, index == view.state.highlighted())?;
    }
    Ok(())
}

fn render_list_line<S: Surface>(surface: &mut S, y: i32, title: &str, active: bool) -> Result<(), DisplayError> {
    surface.set_text_size(2);
    let ink = if active {
        let width = surface.width();
        surface.fill_rect(0, y - 1, width, LINE_HEIGHT, BinaryColor::On)?;
        BinaryColor::Off
    } else {
        BinaryColor::On
    };
    surface.set_color(ink);
    surface.move_to(1, y);
    surface.draw_text(&truncate_chars(title, STATUS_CHARS_MAX))
}

fn render_set_expire<S: Surface>(surface: &mut S, view: &View) -> Result<(), DisplayError> {
    surface.set_text_size(2);
    surface.set_color(BinaryColor::On);

    let entry = view.catalog.entry_at(view.state.highlighted());
    surface.move_to(0, LIST_LINES[0]);
    surface.draw_text(&truncate_chars(&entry.title, STATUS_CHARS_MAX))?;

    surface.move_to(0, LIST_LINES[1]);
    surface.draw_text("Expire In")?;

    let mut line = ArrayString::<16>::new();
    // at most "< 999 min >"
    let _ = write!(line, "< {:02} min >", view.state.edit_expiry_minutes());
    let x = (surface.width() as i32 - surface.text_width(&line) as i32) / 2;
    surface.move_to(x.max(0), LIST_LINES[2]);
    surface.draw_text(&line)
}

fn render_wifi<S: Surface>(surface: &mut S, view: &View) -> Result<(), DisplayError> {
    surface.set_text_size(1);
    surface.set_color(BinaryColor::On);

    surface.move_to(0, TS1_LINES[0]);
    surface.draw_text("WiFi:")?;
    surface.move_to(0, TS1_LINES[1]);
    surface.draw_text(view.network.ssid.as_deref().unwrap_or("-"))?;

    surface.move_to(0, TS1_LINES[2]);
    match (view.network.link_up, view.network.ip) {
        (false, _) => surface.draw_text("Connecting..."),
        (true, Some(ip)) => {
            let mut text = ArrayString::<40>::new();
            let _ = write!(text, "{}", ip);
            surface.draw_text(&text)?;

            let mut time = ArrayString::<32>::new();
            let _ = write!(time, "{}", view.local_time.format("%Y/%m/%d %I:%M:%S%P"));
            surface.move_to(0, TS1_LINES[3]);
            surface.draw_text(&time)?;

            surface.move_to(0, TS1_LINES[4]);
            surface.draw_text(view.timezone_label)
        }
        (true, None) => surface.draw_text("Obtaining IP..."),
    }
}

fn render_ap<S: Surface>(surface: &mut S, view: &View) -> Result<(), DisplayError> {
    surface.set_text_size(1);
    surface.set_color(BinaryColor::On);

    surface.move_to(0, TS1_LINES[0]);
    surface.draw_text("Configure:")?;
    surface.move_to(0, TS1_LINES[1]);
    surface.draw_text("Connect Phone or")?;
    surface.move_to(0, TS1_LINES[2]);
    surface.draw_text("Laptop to this WiFi")?;
    surface.move_to(18, TS1_LINES[3]);
    surface.draw_text(&view.network.ap_ssid)?;
    surface.move_to(0, TS1_LINES[4]);
    surface.draw_text(&view.network.portal_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, text: &str) -> RemoteProfile {
        RemoteProfile {
            display_name: name.to_string(),
            status_text: text.to_string(),
            ..RemoteProfile::blank()
        }
    }

    #[test]
    fn test_bar_first_name_and_truncation() {
        let bar = status_bar_text(&profile("Bartholomew Simpson", "In a meeting today"));
        assert_eq!(bar.name.as_deref(), Some("Bartholome"));
        assert_eq!(bar.status.as_str(), "In a meeti");
    }

    #[test]
    fn test_bar_blank_and_error() {
        let bar = status_bar_text(&profile("", ""));
        assert_eq!(bar.name, None);
        assert_eq!(bar.status.as_str(), "---");

        let bar = status_bar_text(&RemoteProfile::error());
        assert_eq!(bar.name, None);
        assert_eq!(bar.status.as_str(), "ERROR");
    }

    #[test]
    fn test_bar_counts_characters_not_bytes() {
        let bar = status_bar_text(&profile("Zoë", "Café ☕☕☕☕☕☕☕"));
        assert_eq!(bar.name.as_deref(), Some("Zoë"));
        assert_eq!(bar.status.chars().count(), 10);
    }
}
