/*
 *  display/error.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  Error types for the panel, its drivers and the driver factory
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

use std::error::Error;
use std::fmt;

/// Failures between a finished frame and the glass
#[derive(Debug)]
pub enum DisplayError {
    /// Panel did not come up
    Init(String),

    /// I2C open / transfer
    Bus(String),

    /// Geometry, address or other settings the panel cannot honour
    Config(String),

    /// The panel has no such feature
    Unsupported,

    Rotation(u16),

    /// Packed frame length does not match the panel
    FrameSize { expected: usize, actual: usize },

    Interface(display_interface::DisplayError),

    /// A panel command failed
    Panel(String),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "panel init: {}", msg),
            Self::Bus(msg) => write!(f, "bus: {}", msg),
            Self::Config(msg) => write!(f, "panel config: {}", msg),
            Self::Unsupported => f.write_str("not supported by this panel"),
            Self::Rotation(deg) => write!(f, "rotation {} not one of 0/90/180/270", deg),
            Self::FrameSize { expected, actual } => {
                write!(f, "frame is {} bytes, panel wants {}", actual, expected)
            }
            Self::Interface(err) => write!(f, "display interface: {:?}", err),
            Self::Panel(msg) => f.write_str(msg),
        }
    }
}

// display_interface errors carry no std Error impl
impl Error for DisplayError {}

impl From<display_interface::DisplayError> for DisplayError {
    fn from(err: display_interface::DisplayError) -> Self {
        Self::Interface(err)
    }
}

impl From<linux_embedded_hal::I2CError> for DisplayError {
    fn from(err: linux_embedded_hal::I2CError) -> Self {
        Self::Bus(format!("{:?}", err))
    }
}

/// Reasons the factory hands back no driver
#[derive(Debug)]
pub enum DisplayFactoryError {
    NoDriver,
    /// Hardware panel chosen without a bus
    NoBus,
    /// Driver and bus do not go together
    NoSuchPanel,
    Driver(DisplayError),
    Config(String),
}

impl fmt::Display for DisplayFactoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDriver => f.write_str("display.driver is not set"),
            Self::NoBus => f.write_str("display.bus is required for a hardware panel"),
            Self::NoSuchPanel => f.write_str("no panel for this driver/bus pair"),
            Self::Driver(err) => write!(f, "driver: {}", err),
            Self::Config(msg) => write!(f, "display config: {}", msg),
        }
    }
}

impl Error for DisplayFactoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        if let Self::Driver(err) = self { Some(err) } else { None }
    }
}

impl From<DisplayError> for DisplayFactoryError {
    fn from(err: DisplayError) -> Self {
        Self::Driver(err)
    }
}

impl From<DisplayFactoryError> for DisplayError {
    fn from(err: DisplayFactoryError) -> Self {
        match err {
            DisplayFactoryError::Driver(inner) => inner,
            DisplayFactoryError::Config(msg) => Self::Config(msg),
            other => Self::Init(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_error_source() {
        let err = DisplayFactoryError::from(DisplayError::Rotation(45));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("45"));
        assert!(DisplayFactoryError::NoBus.source().is_none());
    }

    #[test]
    fn test_factory_error_unwraps_driver_error() {
        let err = DisplayError::from(DisplayFactoryError::Driver(DisplayError::Unsupported));
        assert!(matches!(err, DisplayError::Unsupported));

        let err = DisplayError::from(DisplayFactoryError::NoDriver);
        assert!(matches!(err, DisplayError::Init(msg) if msg.contains("display.driver")));
    }
}
