//! Linux sysfs GPIO output pins.

use std::fmt;

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin, StatefulOutputPin};
use sysfs_gpio::{Direction, Pin};
use tracing::{debug, warn};

/// Error from a sysfs GPIO operation.
#[derive(Debug)]
pub struct SysfsError {
    gpio: u32,
    source: sysfs_gpio::Error,
}

impl SysfsError {
    fn new(gpio: u32, source: sysfs_gpio::Error) -> Self {
        Self { gpio, source }
    }

    /// GPIO number that failed.
    pub fn gpio(&self) -> u32 {
        self.gpio
    }
}

impl fmt::Display for SysfsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gpio{}: {}", self.gpio, self.source)
    }
}

impl std::error::Error for SysfsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl embedded_hal::digital::Error for SysfsError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// An exported sysfs GPIO configured as an output.
///
/// The GPIO is unexported when the pin is closed or dropped.
pub struct SysfsPin {
    gpio: u32,
    pin: Pin,
    level: bool,
    released: bool,
}

impl SysfsPin {
    /// Export `gpio` and configure it as an output driven low.
    ///
    /// A GPIO that is already exported is reused.
    pub fn open(gpio: u32) -> Result<Self, SysfsError> {
        let pin = Pin::new(u64::from(gpio));
        pin.export().map_err(|e| SysfsError::new(gpio, e))?;
        pin.set_direction(Direction::Low)
            .map_err(|e| SysfsError::new(gpio, e))?;

        debug!(gpio, "exported sysfs gpio");
        Ok(Self {
            gpio,
            pin,
            level: false,
            released: false,
        })
    }

    /// GPIO number.
    pub fn gpio(&self) -> u32 {
        self.gpio
    }

    /// Read the level currently reported by the kernel.
    pub fn read(&self) -> Result<bool, SysfsError> {
        self.pin
            .get_value()
            .map(|v| v != 0)
            .map_err(|e| SysfsError::new(self.gpio, e))
    }

    /// Write a level.
    pub fn write(&mut self, level: bool) -> Result<(), SysfsError> {
        self.pin
            .set_value(u8::from(level))
            .map_err(|e| SysfsError::new(self.gpio, e))?;
        self.level = level;
        Ok(())
    }

    /// Unexport the GPIO.
    pub fn close(mut self) -> Result<(), SysfsError> {
        self.unexport()
    }

    fn unexport(&mut self) -> Result<(), SysfsError> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.pin
            .unexport()
            .map_err(|e| SysfsError::new(self.gpio, e))
    }
}

impl Drop for SysfsPin {
    fn drop(&mut self) {
        if let Err(e) = self.unexport() {
            warn!(gpio = self.gpio, error = %e, "failed to unexport gpio");
        }
    }
}

impl fmt::Debug for SysfsPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SysfsPin")
            .field("gpio", &self.gpio)
            .field("level", &self.level)
            .finish()
    }
}

impl ErrorType for SysfsPin {
    type Error = SysfsError;
}

impl OutputPin for SysfsPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true)
    }
}

impl StatefulOutputPin for SysfsPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::Error as _;

    #[test]
    fn test_unavailable_gpio_fails() {
        // No kernel exposes this line.
        let err = SysfsPin::open(65_000).unwrap_err();
        assert_eq!(err.gpio(), 65_000);
        assert_eq!(err.kind(), ErrorKind::Other);
        assert!(err.to_string().starts_with("gpio65000: "));
    }
}
