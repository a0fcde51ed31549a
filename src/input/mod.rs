/*
 *  input/mod.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  Knob events and the sources that produce them
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

pub mod rotary;
pub mod gesture;
pub mod console;

#[cfg(feature = "gpio")]
pub mod gpio;

pub use console::{parse_console_line, spawn_console};
pub use gesture::{ButtonGestures, GestureTiming};
pub use rotary::QuadratureDecoder;

use log::info;
use thiserror::Error;
use tokio::sync::mpsc::{error::TryRecvError, unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::config::{Config, InputKind};

/// Which way the knob turned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Increase,
    Decrease,
}

/// Edge triggered, already debounced and discriminated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Rotate(Direction),
    Click,
    DoubleClick,
    LongClick,
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("GPIO error: {0}")]
    Gpio(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Input source {0:?} not built in this binary")]
    Unavailable(InputKind),
}

/// Where the controller's events come from
pub trait InputSource {
    /// Everything that arrived since the last call, oldest first
    fn poll_events(&mut self) -> Vec<InputEvent>;
}

/// Receiving end fed by a reader thread (console, GPIO) or a test
pub struct ChannelInput {
    rx: UnboundedReceiver<InputEvent>,
    closed: bool,
}

impl ChannelInput {
    pub fn new() -> (UnboundedSender<InputEvent>, Self) {
        let (tx, rx) = unbounded_channel();
        (tx, Self { rx, closed: false })
    }
}

impl InputSource for ChannelInput {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.closed {
                        info!("Input source closed");
                        self.closed = true;
                    }
                    break;
                }
            }
        }
        events
    }
}

/// Start the source named in the configuration
pub fn open_source(config: &Config) -> Result<ChannelInput, InputError> {
    let input = config.input();
    match input.source.unwrap_or(InputKind::Console) {
        InputKind::Console => spawn_console(),
        #[cfg(feature = "gpio")]
        InputKind::Gpio => gpio::spawn_gpio(&input),
        #[cfg(not(feature = "gpio"))]
        InputKind::Gpio => Err(InputError::Unavailable(InputKind::Gpio)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_drains_in_order() {
        let (tx, mut input) = ChannelInput::new();
        tx.send(InputEvent::Rotate(Direction::Increase)).unwrap();
        tx.send(InputEvent::Click).unwrap();

        assert_eq!(
            input.poll_events(),
            vec![InputEvent::Rotate(Direction::Increase), InputEvent::Click]
        );
        assert!(input.poll_events().is_empty());

        // a dead producer is quiet, not an error
        drop(tx);
        assert!(input.poll_events().is_empty());
        assert!(input.poll_events().is_empty());
    }
}
