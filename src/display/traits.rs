/*
 *  display/traits.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  Panel driver and drawing surface abstractions
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

use embedded_graphics::pixelcolor::BinaryColor;

use crate::constants::{TS1_CHAR_WIDTH, TS2_CHAR_WIDTH};
use crate::display::error::DisplayError;

/// Panel capabilities and metadata
#[derive(Debug, Clone)]
pub struct DisplayCapabilities {
    pub width: u32,
    pub height: u32,

    /// Whether the controller can rotate in hardware
    pub supports_rotation: bool,

    /// Maximum recommended frame rate
    pub max_fps: u32,

    pub supports_brightness: bool,
    pub supports_invert: bool,
}

/// Minimal hardware abstraction every panel driver implements.
///
/// Frames arrive packed, 1 bit per pixel, row-major, LSB first in each byte.
/// `write_buffer` only stages the frame; `flush` puts it on the glass.
pub trait DisplayDriver: Send {
    fn capabilities(&self) -> &DisplayCapabilities;

    /// (width, height)
    fn dimensions(&self) -> (u32, u32) {
        let caps = self.capabilities();
        (caps.width, caps.height)
    }

    /// Bring up the controller; safe to call more than once
    fn init(&mut self) -> Result<(), DisplayError>;

    /// 0-255, drivers map onto whatever steps the controller has
    fn set_brightness(&mut self, value: u8) -> Result<(), DisplayError>;

    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Blank the panel immediately
    fn clear(&mut self) -> Result<(), DisplayError>;

    fn write_buffer(&mut self, buffer: &[u8]) -> Result<(), DisplayError>;

    fn set_invert(&mut self, _inverted: bool) -> Result<(), DisplayError> {
        Err(DisplayError::Unsupported)
    }

    /// 0, 90, 180 or 270 degrees
    fn set_rotation(&mut self, degrees: u16) -> Result<(), DisplayError> {
        if !self.capabilities().supports_rotation {
            return Err(DisplayError::Unsupported);
        }
        if !matches!(degrees, 0 | 90 | 180 | 270) {
            return Err(DisplayError::Rotation(degrees));
        }
        Err(DisplayError::Unsupported)
    }
}

/// Cell width in pixels for a text size (1 = small, 2 = large)
pub fn char_width(text_size: u8) -> u32 {
    if text_size <= 1 { TS1_CHAR_WIDTH } else { TS2_CHAR_WIDTH }
}

/// Cursor style drawing surface the screens render into.
///
/// Everything is buffered until `present`. Text is drawn from the cursor's
/// top-left corner and advances the cursor by the rendered width; only the
/// foreground pixels of each glyph are touched, so text can be drawn in
/// `Off` over a filled band.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Wipe the back buffer
    fn clear(&mut self);

    fn set_text_size(&mut self, size: u8);
    fn text_size(&self) -> u8;

    fn set_color(&mut self, color: BinaryColor);

    fn move_to(&mut self, x: i32, y: i32);

    fn draw_text(&mut self, text: &str) -> Result<(), DisplayError>;

    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: BinaryColor) -> Result<(), DisplayError>;

    /// Push the back buffer to the panel
    fn present(&mut self) -> Result<(), DisplayError>;

    /// Rendered width of `text` at the current text size
    fn text_width(&self, text: &str) -> u32 {
        text.chars().count() as u32 * char_width(self.text_size())
    }
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn width(&self) -> u32 { (**self).width() }
    fn height(&self) -> u32 { (**self).height() }
    fn clear(&mut self) { (**self).clear() }
    fn set_text_size(&mut self, size: u8) { (**self).set_text_size(size) }
    fn text_size(&self) -> u8 { (**self).text_size() }
    fn set_color(&mut self, color: BinaryColor) { (**self).set_color(color) }
    fn move_to(&mut self, x: i32, y: i32) { (**self).move_to(x, y) }
    fn draw_text(&mut self, text: &str) -> Result<(), DisplayError> { (**self).draw_text(text) }
    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: BinaryColor) -> Result<(), DisplayError> {
        (**self).fill_rect(x, y, width, height, color)
    }
    fn present(&mut self) -> Result<(), DisplayError> { (**self).present() }
}
