/*
 *  display/factory.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  Builds the panel driver named in the configuration
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

use log::info;

use crate::config::{BusConfig, DisplayConfig, DriverKind};
use crate::display::drivers::mock::MockDriver;
use crate::display::error::DisplayFactoryError;
use crate::display::traits::DisplayDriver;

#[cfg(feature = "driver-ssd1306")]
use crate::display::drivers::ssd1306::Ssd1306Driver;

pub type BoxedDriver = Box<dyn DisplayDriver>;

/// Turns a `DisplayConfig` into a ready-to-init panel driver.
pub struct DisplayDriverFactory;

impl DisplayDriverFactory {
    /// Validate, then build the configured driver. Mock needs no bus.
    ///
    /// ```ignore
    /// let panel = DisplayConfig {
    ///     driver: Some(DriverKind::Ssd1306),
    ///     bus: Some(BusConfig::I2c { bus: "/dev/i2c-1".into(), address: 0x3C, speed_hz: None }),
    ///     ..Default::default()
    /// };
    /// let driver = DisplayDriverFactory::create_from_config(&panel)?;
    /// ```
    pub fn create_from_config(config: &DisplayConfig) -> Result<BoxedDriver, DisplayFactoryError> {
        let kind = Self::validate_config(config)?;

        match (kind, config.bus.as_ref()) {
            (DriverKind::Mock, _) => {
                info!("Display driver: mock (headless)");
                Ok(Box::new(MockDriver::new(config)?))
            }

            #[cfg(feature = "driver-ssd1306")]
            (DriverKind::Ssd1306, Some(BusConfig::I2c { bus, address, .. })) => {
                info!("Display driver: ssd1306 on {} @ {:#04x}", bus, address);
                Ok(Box::new(Ssd1306Driver::new_i2c(bus, *address, config)?))
            }

            #[cfg(not(feature = "driver-ssd1306"))]
            (DriverKind::Ssd1306, _) => Err(DisplayFactoryError::Config(
                "built without the driver-ssd1306 feature".to_string(),
            )),

            #[allow(unreachable_patterns)]
            _ => Err(DisplayFactoryError::NoSuchPanel),
        }
    }

    /// Check a configuration without touching hardware, returning the driver kind
    pub fn validate_config(config: &DisplayConfig) -> Result<DriverKind, DisplayFactoryError> {
        let kind = config.driver.ok_or(DisplayFactoryError::NoDriver)?;

        if kind != DriverKind::Mock && config.bus.is_none() {
            return Err(DisplayFactoryError::NoBus);
        }

        if let Some(deg) = config.rotate_deg {
            if !matches!(deg, 0 | 90 | 180 | 270) {
                return Err(DisplayFactoryError::Config(format!("rotate_deg {} not one of 0/90/180/270", deg)));
            }
        }

        if config.width == Some(0) || config.height == Some(0) {
            return Err(DisplayFactoryError::Config("width and height must be non-zero".to_string()));
        }

        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_config_no_driver() {
        let config = DisplayConfig {
            driver: None,
            bus: Some(BusConfig::I2c { bus: "/dev/i2c-1".to_string(), address: 0x3C, speed_hz: None }),
            ..Default::default()
        };
        assert!(matches!(
            DisplayDriverFactory::validate_config(&config),
            Err(DisplayFactoryError::NoDriver)
        ));
    }

    #[test]
    fn test_validate_config_no_bus() {
        let config = DisplayConfig { driver: Some(DriverKind::Ssd1306), bus: None, ..Default::default() };
        assert!(matches!(
            DisplayDriverFactory::validate_config(&config),
            Err(DisplayFactoryError::NoBus)
        ));
    }

    #[test]
    fn test_validate_config_invalid_rotation() {
        let config = DisplayConfig {
            driver: Some(DriverKind::Mock),
            rotate_deg: Some(45),
            ..Default::default()
        };
        assert!(DisplayDriverFactory::validate_config(&config).is_err());
    }

    #[test]
    fn test_mock_needs_no_bus() {
        let config = DisplayConfig { driver: Some(DriverKind::Mock), ..Default::default() };
        let driver = DisplayDriverFactory::create_from_config(&config).unwrap();
        assert_eq!(driver.dimensions(), (128, 64));
    }

    #[test]
    fn test_zero_geometry_rejected() {
        let config = DisplayConfig { driver: Some(DriverKind::Mock), width: Some(0), ..Default::default() };
        assert!(matches!(
            DisplayDriverFactory::validate_config(&config),
            Err(DisplayFactoryError::Config(_))
        ));
    }
}
