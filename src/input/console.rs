/*
 *  input/console.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  Keyboard stand-in for the knob, one line at a time on stdin
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

use log::{debug, info, warn};
use std::io::{self, BufRead};

use super::{ChannelInput, Direction, InputError, InputEvent};

/// Map a console line to knob events.
///
/// Single keys may be repeated (`+++` is three detents): `+`/`-` rotate,
/// `c` click, `d` double click, `l` long click. Whole words work too.
pub fn parse_console_line(line: &str) -> Vec<InputEvent> {
    match line.trim().to_ascii_lowercase().as_str() {
        "up" | "right" => return vec![InputEvent::Rotate(Direction::Increase)],
        "down" | "left" => return vec![InputEvent::Rotate(Direction::Decrease)],
        "click" => return vec![InputEvent::Click],
        "double" => return vec![InputEvent::DoubleClick],
        "long" => return vec![InputEvent::LongClick],
        _ => {}
    }

    line.chars()
        .filter_map(|ch| match ch {
            '+' | '=' => Some(InputEvent::Rotate(Direction::Increase)),
            '-' | '_' => Some(InputEvent::Rotate(Direction::Decrease)),
            'c' | 'C' => Some(InputEvent::Click),
            'd' | 'D' => Some(InputEvent::DoubleClick),
            'l' | 'L' => Some(InputEvent::LongClick),
            _ => None,
        })
        .collect()
}

/// Read stdin on its own thread; the thread ends at EOF or when the receiver is dropped.
pub fn spawn_console() -> Result<ChannelInput, InputError> {
    let (tx, input) = ChannelInput::new();

    std::thread::Builder::new()
        .name("console".into())
        .spawn(move || {
            info!("console: ready, keys + - c d l then Enter");
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("console: read failed: {}", e);
                        break;
                    }
                };
                let events = parse_console_line(&line);
                if events.is_empty() && !line.trim().is_empty() {
                    debug!("console: nothing in [{}]", line);
                }
                for event in events {
                    if tx.send(event).is_err() {
                        return;
                    }
                }
            }
            debug!("console: stdin closed");
        })?;

    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_keys() {
        assert_eq!(
            parse_console_line("++-c"),
            vec![
                InputEvent::Rotate(Direction::Increase),
                InputEvent::Rotate(Direction::Increase),
                InputEvent::Rotate(Direction::Decrease),
                InputEvent::Click,
            ]
        );
    }

    #[test]
    fn test_words() {
        assert_eq!(parse_console_line(" Double "), vec![InputEvent::DoubleClick]);
        assert_eq!(parse_console_line("long"), vec![InputEvent::LongClick]);
        assert!(parse_console_line("xyz").is_empty());
    }
}
