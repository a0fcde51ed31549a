/*
 *  display/drivers/ssd1306.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  SSD1306 OLED on Linux I2C
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

use linux_embedded_hal::I2cdev;
use log::{debug, info};
use ssd1306::{
    mode::{BufferedGraphicsMode, DisplayConfig as _},
    prelude::*,
    size::{DisplaySize, DisplaySize128x32, DisplaySize128x64},
    I2CDisplayInterface,
    Ssd1306,
};

use crate::config::DisplayConfig;
use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::display::error::DisplayError;
use crate::display::traits::{DisplayCapabilities, DisplayDriver};

type Panel<SIZE> = Ssd1306<I2CInterface<I2cdev>, SIZE, BufferedGraphicsMode<SIZE>>;

enum Ssd1306Variants {
    Size128x64(Panel<DisplaySize128x64>),
    Size128x32(Panel<DisplaySize128x32>),
}

/// SSD1306 wrapper; frames are unpacked into the controller's own buffer.
pub struct Ssd1306Driver {
    display: Ssd1306Variants,
    capabilities: DisplayCapabilities,
    /// applied while staging, the panel itself is never put in inverse mode
    inverted: bool,
    /// re-sent after every init, the controller resets contrast
    brightness: Option<u8>,
}

fn brightness_step(value: u8) -> Brightness {
    match value {
        0..=63 => Brightness::DIMMEST,
        64..=127 => Brightness::DIM,
        128..=191 => Brightness::NORMAL,
        _ => Brightness::BRIGHTEST,
    }
}

fn interface_err(what: &str, e: display_interface::DisplayError) -> DisplayError {
    DisplayError::Panel(format!("{} failed: {:?}", what, e))
}

fn stage<SIZE: DisplaySize>(panel: &mut Panel<SIZE>, width: u32, buffer: &[u8], inverted: bool) {
    panel.clear_buffer();
    for (byte_idx, &byte) in buffer.iter().enumerate() {
        let byte = if inverted { !byte } else { byte };
        if byte == 0 {
            continue;
        }
        for bit in 0..8u32 {
            if byte & (1 << bit) != 0 {
                let pixel = byte_idx as u32 * 8 + bit;
                panel.set_pixel(pixel % width, pixel / width, true);
            }
        }
    }
}

impl Ssd1306Driver {
    /// Open `i2c_bus_path` and talk to the controller at `address` (0x3C / 0x3D)
    pub fn new_i2c(i2c_bus_path: &str, address: u8, config: &DisplayConfig) -> Result<Self, DisplayError> {
        info!("Opening SSD1306 at {:#04x} on {}", address, i2c_bus_path);

        let i2c = I2cdev::new(i2c_bus_path)
            .map_err(|e| DisplayError::Bus(format!("cannot open {}: {}", i2c_bus_path, e)))?;
        let interface = I2CDisplayInterface::new_custom_address(i2c, address);

        let width = config.width.unwrap_or(DISPLAY_WIDTH);
        let height = config.height.unwrap_or(DISPLAY_HEIGHT);

        let display = match (width, height) {
            (128, 64) => Ssd1306Variants::Size128x64(
                Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
                    .into_buffered_graphics_mode(),
            ),
            (128, 32) => Ssd1306Variants::Size128x32(
                Ssd1306::new(interface, DisplaySize128x32, DisplayRotation::Rotate0)
                    .into_buffered_graphics_mode(),
            ),
            _ => {
                return Err(DisplayError::Config(
                    format!("SSD1306 comes in 128x64 or 128x32, not {}x{}", width, height)
                ));
            }
        };

        let mut driver = Self {
            display,
            capabilities: DisplayCapabilities {
                width,
                height,
                supports_rotation: true,
                max_fps: 30,
                supports_brightness: true,
                supports_invert: true,
            },
            inverted: config.invert.unwrap_or(false),
            brightness: config.brightness,
        };

        // rotation is kept by the ssd1306 crate and replayed by init
        if let Some(rotation) = config.rotate_deg {
            driver.set_rotation(rotation)?;
        }

        info!("SSD1306 opened ({}x{}), waiting for init", width, height);
        Ok(driver)
    }
}

impl DisplayDriver for Ssd1306Driver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        match &mut self.display {
            Ssd1306Variants::Size128x64(d) => d.init(),
            Ssd1306Variants::Size128x32(d) => d.init(),
        }
        .map_err(|e| DisplayError::Init(format!("{:?}", e)))?;

        if let Some(value) = self.brightness {
            self.set_brightness(value)?;
        }
        Ok(())
    }

    fn set_brightness(&mut self, value: u8) -> Result<(), DisplayError> {
        self.brightness = Some(value);
        let brightness = brightness_step(value);
        match &mut self.display {
            Ssd1306Variants::Size128x64(d) => d.set_brightness(brightness),
            Ssd1306Variants::Size128x32(d) => d.set_brightness(brightness),
        }
        .map_err(|e| interface_err("Set brightness", e))
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        match &mut self.display {
            Ssd1306Variants::Size128x64(d) => d.flush(),
            Ssd1306Variants::Size128x32(d) => d.flush(),
        }
        .map_err(|e| interface_err("Flush", e))
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        match &mut self.display {
            Ssd1306Variants::Size128x64(d) => d.clear_buffer(),
            Ssd1306Variants::Size128x32(d) => d.clear_buffer(),
        }
        self.flush()
    }

    fn write_buffer(&mut self, buffer: &[u8]) -> Result<(), DisplayError> {
        let expected = (self.capabilities.width * self.capabilities.height / 8) as usize;
        if buffer.len() != expected {
            return Err(DisplayError::FrameSize { expected, actual: buffer.len() });
        }
        let width = self.capabilities.width;
        match &mut self.display {
            Ssd1306Variants::Size128x64(d) => stage(d, width, buffer, self.inverted),
            Ssd1306Variants::Size128x32(d) => stage(d, width, buffer, self.inverted),
        }
        Ok(())
    }

    fn set_invert(&mut self, inverted: bool) -> Result<(), DisplayError> {
        debug!("SSD1306 invert {}", inverted);
        self.inverted = inverted;
        Ok(())
    }

    fn set_rotation(&mut self, degrees: u16) -> Result<(), DisplayError> {
        let rotation = match degrees {
            0 => DisplayRotation::Rotate0,
            90 => DisplayRotation::Rotate90,
            180 => DisplayRotation::Rotate180,
            270 => DisplayRotation::Rotate270,
            _ => return Err(DisplayError::Rotation(degrees)),
        };
        match &mut self.display {
            Ssd1306Variants::Size128x64(d) => d.set_rotation(rotation),
            Ssd1306Variants::Size128x32(d) => d.set_rotation(rotation),
        }
        .map_err(|e| interface_err("Set rotation", e))
    }
}
