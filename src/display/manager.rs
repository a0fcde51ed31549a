/*
 *  display/manager.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  Text cursor surface over a panel driver
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

use embedded_graphics::{
    mono_font::{ascii::{FONT_6X10, FONT_9X15}, MonoFont, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use log::{info, warn};
use std::time::Instant;

use crate::config::DisplayConfig;
use crate::display::{
    BoxedDriver,
    DisplayCapabilities,
    DisplayDriverFactory,
    DisplayError,
    MonoFrame,
    Surface,
};

/// Transfer timing, warns when the bus can't keep up
#[derive(Debug, Default)]
pub struct FrameStats {
    pub frame_count: u64,
    pub transfer_time_us: u64,
    pub avg_transfer_time_us: u64,
    target_frame_time_us: u64,
}

impl FrameStats {
    pub fn new(target_fps: u32) -> Self {
        Self {
            target_frame_time_us: 1_000_000 / target_fps.max(1) as u64,
            ..Default::default()
        }
    }

    pub fn record_frame(&mut self, transfer_time_us: u64) {
        self.transfer_time_us = transfer_time_us;
        self.frame_count += 1;
        self.avg_transfer_time_us = if self.avg_transfer_time_us == 0 {
            transfer_time_us
        } else {
            (self.avg_transfer_time_us + transfer_time_us) / 2
        };

        if transfer_time_us > self.target_frame_time_us * 12 / 10 {
            warn!("Frame transfer {}μs exceeds target {}μs", transfer_time_us, self.target_frame_time_us);
        }
    }
}

fn font_for(text_size: u8) -> &'static MonoFont<'static> {
    if text_size <= 1 { &FONT_6X10 } else { &FONT_9X15 }
}

/// The drawing surface the controller renders into: a `MonoFrame` back
/// buffer plus cursor, text size and ink, pushed to the driver on `present`.
pub struct DisplayManager {
    driver: BoxedDriver,
    frame: MonoFrame,
    capabilities: DisplayCapabilities,
    cursor: Point,
    text_size: u8,
    color: BinaryColor,
    stats: FrameStats,
}

impl DisplayManager {
    /// Build the configured driver and bring it up
    pub fn new(config: &DisplayConfig) -> Result<Self, DisplayError> {
        info!("Initializing display");
        let mut driver = DisplayDriverFactory::create_from_config(config)?;
        driver.init()?;
        Self::new_with_driver(driver)
    }

    /// Wrap an already initialized driver
    pub fn new_with_driver(driver: BoxedDriver) -> Result<Self, DisplayError> {
        let capabilities = driver.capabilities().clone();
        info!("Display: {}x{} (target {} FPS)", capabilities.width, capabilities.height, capabilities.max_fps);

        Ok(Self {
            frame: MonoFrame::new(capabilities.width, capabilities.height),
            stats: FrameStats::new(capabilities.max_fps),
            capabilities,
            driver,
            cursor: Point::zero(),
            text_size: 1,
            color: BinaryColor::On,
        })
    }

    pub fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Back buffer as drawn so far
    pub fn frame(&self) -> &MonoFrame {
        &self.frame
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }
}

impl Surface for DisplayManager {
    fn width(&self) -> u32 {
        self.capabilities.width
    }

    fn height(&self) -> u32 {
        self.capabilities.height
    }

    fn clear(&mut self) {
        self.frame.clear_color(BinaryColor::Off);
        self.cursor = Point::zero();
    }

    fn set_text_size(&mut self, size: u8) {
        self.text_size = size.max(1);
    }

    fn text_size(&self) -> u8 {
        self.text_size
    }

    fn set_color(&mut self, color: BinaryColor) {
        self.color = color;
    }

    fn move_to(&mut self, x: i32, y: i32) {
        self.cursor = Point::new(x, y);
    }

    fn draw_text(&mut self, text: &str) -> Result<(), DisplayError> {
        let style = MonoTextStyle::new(font_for(self.text_size), self.color);
        // infallible target, next position is where the next glyph goes
        let Ok(next) = Text::with_baseline(text, self.cursor, style, Baseline::Top).draw(&mut self.frame);
        self.cursor = next;
        Ok(())
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: BinaryColor) -> Result<(), DisplayError> {
        let Ok(()) = Rectangle::new(Point::new(x, y), Size::new(width, height))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.frame);
        Ok(())
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        let transfer_start = Instant::now();

        let buffer_data = self.frame.to_packed_bytes();
        self.driver.write_buffer(&buffer_data)?;
        self.driver.flush()?;

        self.stats.record_frame(transfer_start.elapsed().as_micros() as u64);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::MockDriver;

    fn manager() -> (DisplayManager, MockDriver) {
        let mock = MockDriver::new_with_size(128, 64).unwrap();
        let manager = DisplayManager::new_with_driver(Box::new(mock.clone())).unwrap();
        (manager, mock)
    }

    #[test]
    fn test_text_advances_cursor() {
        let (mut display, _) = manager();
        display.set_text_size(1);
        display.move_to(0, 0);
        display.draw_text("abc").unwrap();
        assert_eq!(display.cursor(), Point::new(18, 0));

        display.set_text_size(2);
        display.move_to(0, 20);
        display.draw_text("ab").unwrap();
        assert_eq!(display.cursor(), Point::new(18, 20));
        assert_eq!(display.text_width("ab"), 18);
    }

    #[test]
    fn test_nothing_reaches_panel_before_present() {
        let (mut display, mock) = manager();
        display.fill_rect(0, 0, 128, 64, BinaryColor::On).unwrap();
        assert_eq!(mock.count_on_pixels(), 0);

        display.present().unwrap();
        assert_eq!(mock.count_on_pixels(), 128 * 64);
        assert_eq!(display.stats().frame_count, 1);
    }

    #[test]
    fn test_off_text_cuts_into_band() {
        let (mut display, _) = manager();
        display.fill_rect(0, 9, 128, 18, BinaryColor::On).unwrap();
        let lit = display.frame().count_on();

        display.set_text_size(2);
        display.set_color(BinaryColor::Off);
        display.move_to(0, 10);
        display.draw_text("Lunch").unwrap();
        assert!(display.frame().count_on() < lit);

        display.clear();
        assert_eq!(display.frame().count_on(), 0);
    }
}
