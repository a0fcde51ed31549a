/*
 *  display/drivers/mock.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  In-memory panel for headless runs and tests
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
use log::trace;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::DisplayConfig;
use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::display::error::DisplayError;
use crate::display::framebuffer::MonoFrame;
use crate::display::traits::{DisplayCapabilities, DisplayDriver};

/// Panel that keeps what it is sent.
///
/// Staged and shown frames live in a shared `MockPanelState` so a test can
/// keep a handle after the driver has been boxed into a `DisplayManager`.
#[derive(Debug, Clone)]
pub struct MockDriver {
    capabilities: DisplayCapabilities,
    state: Arc<Mutex<MockPanelState>>,
}

/// Counters and frames, shared for inspection
#[derive(Debug, Default)]
pub struct MockPanelState {
    pub inits: usize,
    pub flushes: usize,
    pub clears: usize,

    pub brightness: Option<u8>,
    pub rotation: Option<u16>,
    pub inverted: Option<bool>,
    pub ready: bool,

    /// Running total passed to write_buffer
    pub bytes_in: usize,

    /// Written but not yet flushed
    pub staged: Vec<u8>,
    /// What is on the glass
    pub shown: Vec<u8>,

    /// Fault injection
    pub fail_flush: bool,
    pub fail_init: bool,
}

impl MockDriver {
    pub fn new(config: &DisplayConfig) -> Result<Self, DisplayError> {
        Self::new_with_size(
            config.width.unwrap_or(DISPLAY_WIDTH),
            config.height.unwrap_or(DISPLAY_HEIGHT),
        )
    }

    pub fn new_with_size(width: u32, height: u32) -> Result<Self, DisplayError> {
        if width == 0 || height == 0 || (width * height) % 8 != 0 {
            return Err(DisplayError::Config(format!(
                "mock panel {}x{} is not a whole number of bytes", width, height
            )));
        }
        let frame_len = (width * height / 8) as usize;
        let state = MockPanelState {
            staged: vec![0; frame_len],
            shown: vec![0; frame_len],
            ..Default::default()
        };
        Ok(Self {
            capabilities: DisplayCapabilities {
                width,
                height,
                supports_rotation: true,
                max_fps: 60,
                supports_brightness: true,
                supports_invert: true,
            },
            state: Arc::new(Mutex::new(state)),
        })
    }

    /// Handle to the shared state
    pub fn state(&self) -> Arc<Mutex<MockPanelState>> {
        Arc::clone(&self.state)
    }

    fn lock(&self) -> MutexGuard<'_, MockPanelState> {
        // a panicked test thread must not hide the frames from the next one
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Decoded copy of the frame on the glass
    pub fn shown_frame(&self) -> MonoFrame {
        let state = self.lock();
        MonoFrame::from_packed_bytes(self.capabilities.width, self.capabilities.height, &state.shown)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<BinaryColor> {
        self.shown_frame().pixel(x, y)
    }

    pub fn count_on_pixels(&self) -> usize {
        self.lock().shown.iter().map(|b| b.count_ones() as usize).sum()
    }
}

impl DisplayDriver for MockDriver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        let mut state = self.lock();
        if state.fail_init {
            return Err(DisplayError::Init("mock: init refused".to_string()));
        }
        state.inits += 1;
        state.ready = true;
        Ok(())
    }

    fn set_brightness(&mut self, value: u8) -> Result<(), DisplayError> {
        self.lock().brightness = Some(value);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        let mut state = self.lock();
        if state.fail_flush {
            return Err(DisplayError::Panel("mock: flush refused".to_string()));
        }
        state.flushes += 1;
        state.shown = state.staged.clone();
        trace!("mock flush #{}", state.flushes);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        {
            let mut state = self.lock();
            state.clears += 1;
            state.staged.fill(0);
        }
        self.flush()
    }

    fn write_buffer(&mut self, buffer: &[u8]) -> Result<(), DisplayError> {
        let expected = (self.capabilities.width * self.capabilities.height / 8) as usize;
        if buffer.len() != expected {
            return Err(DisplayError::FrameSize { expected, actual: buffer.len() });
        }
        let mut state = self.lock();
        state.bytes_in += buffer.len();
        state.staged.copy_from_slice(buffer);
        Ok(())
    }

    fn set_invert(&mut self, inverted: bool) -> Result<(), DisplayError> {
        self.lock().inverted = Some(inverted);
        Ok(())
    }

    fn set_rotation(&mut self, degrees: u16) -> Result<(), DisplayError> {
        if !matches!(degrees, 0 | 90 | 180 | 270) {
            return Err(DisplayError::Rotation(degrees));
        }
        self.lock().rotation = Some(degrees);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_driver_init() {
        let mut driver = MockDriver::new_with_size(128, 64).unwrap();
        let state = driver.state();
        assert!(!state.lock().unwrap().ready);

        driver.init().unwrap();

        assert_eq!(state.lock().unwrap().inits, 1);
        assert!(state.lock().unwrap().ready);
    }

    #[test]
    fn test_write_is_staged_until_flush() {
        let mut driver = MockDriver::new_with_size(128, 64).unwrap();

        driver.write_buffer(&vec![0xFF; 1024]).unwrap();
        assert_eq!(driver.count_on_pixels(), 0);

        driver.flush().unwrap();
        assert_eq!(driver.count_on_pixels(), 128 * 64);
        assert_eq!(driver.pixel(127, 63), Some(BinaryColor::On));
        assert_eq!(driver.state().lock().unwrap().bytes_in, 1024);
    }

    #[test]
    fn test_clear_blanks_glass() {
        let mut driver = MockDriver::new_with_size(128, 64).unwrap();
        driver.write_buffer(&vec![0xFF; 1024]).unwrap();
        driver.flush().unwrap();

        DisplayDriver::clear(&mut driver).unwrap();

        assert_eq!(driver.count_on_pixels(), 0);
        assert_eq!(driver.state().lock().unwrap().clears, 1);
    }

    #[test]
    fn test_buffer_size_mismatch() {
        let mut driver = MockDriver::new_with_size(128, 64).unwrap();
        assert!(matches!(
            driver.write_buffer(&vec![0xFF; 512]),
            Err(DisplayError::FrameSize { expected: 1024, actual: 512 })
        ));
    }

    #[test]
    fn test_rotation_and_failure() {
        let mut driver = MockDriver::new_with_size(128, 64).unwrap();
        driver.set_rotation(180).unwrap();
        assert_eq!(driver.state().lock().unwrap().rotation, Some(180));
        assert!(driver.set_rotation(45).is_err());

        driver.state().lock().unwrap().fail_flush = true;
        assert!(driver.flush().is_err());
    }
}
