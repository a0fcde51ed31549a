/*
 *  input/gpio.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  Rotary encoder + push button on the Raspberry Pi header
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
use rppal::gpio::{Gpio, InputPin};
use std::time::{Duration, Instant};

use super::{ButtonGestures, ChannelInput, GestureTiming, InputError, InputEvent, QuadratureDecoder};
use crate::config::InputConfig;
use crate::constants::DEFAULT_STEPS_PER_CLICK;

const SAMPLE_PERIOD: Duration = Duration::from_millis(1);

fn open_pin(gpio: &Gpio, pin: u8) -> Result<InputPin, InputError> {
    gpio.get(pin)
        .map(|p| p.into_input_pullup())
        .map_err(|e| InputError::Gpio(format!("pin {}: {}", pin, e)))
}

/// Sample the encoder on its own thread at 1 kHz; events go down the channel.
pub fn spawn_gpio(config: &InputConfig) -> Result<ChannelInput, InputError> {
    let gpio = Gpio::new().map_err(|e| InputError::Gpio(e.to_string()))?;

    let [a, b, btn] = config.pins();
    let pin_a = open_pin(&gpio, a)?;
    let pin_b = open_pin(&gpio, b)?;
    let button = open_pin(&gpio, btn)?;
    let steps = config.steps_per_click.unwrap_or(DEFAULT_STEPS_PER_CLICK);
    let timing = GestureTiming::from(config);

    info!(
        "GPIO encoder A={} B={} button={} steps/click={}",
        pin_a.pin(), pin_b.pin(), button.pin(), steps
    );

    let (tx, input) = ChannelInput::new();

    std::thread::Builder::new()
        .name("encoder".into())
        .spawn(move || {
            let mut decoder = QuadratureDecoder::new(pin_a.is_high(), pin_b.is_high(), steps);
            let mut gestures = ButtonGestures::new(timing, Instant::now());

            loop {
                let rotation = decoder.update(pin_a.is_high(), pin_b.is_high()).map(InputEvent::Rotate);
                // pulled up, pressed reads low
                let press = gestures.update(button.is_low(), Instant::now());

                for event in [rotation, press].into_iter().flatten() {
                    if tx.send(event).is_err() {
                        debug!("encoder: receiver gone, stopping");
                        return;
                    }
                }
                std::thread::sleep(SAMPLE_PERIOD);
            }
        })?;

    Ok(input)
}
