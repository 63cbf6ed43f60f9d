//! Digital pin abstraction.
//!
//! Any `embedded_hal::digital::OutputPin` can drive a motor phase: writing a
//! level is `set_state`, releasing the pin is dropping it. Two backends ship
//! with the crate:
//!
//! - [`SysfsPin`]: Linux sysfs GPIO (feature `sysfs`)
//! - [`crate::sim::SimulatedPin`]: forwards writes to a [`crate::sim::SimulatedMotor`]

#[cfg(feature = "sysfs")]
mod sysfs;

#[cfg(feature = "sysfs")]
pub use sysfs::{SysfsError, SysfsPin};

use embedded_hal::digital::{Error as _, OutputPin, PinState};

use crate::error::MotorError;
use crate::motor::phase::PhaseRow;

/// Write one phase row to the four pins, in pin order.
///
/// Stops at the first failing pin; earlier pins keep their new level.
pub fn write_phase<P: OutputPin>(pins: &mut [P; 4], row: PhaseRow) -> Result<(), MotorError> {
    for (index, (pin, level)) in pins.iter_mut().zip(row).enumerate() {
        pin.set_state(PinState::from(level))
            .map_err(|e| MotorError::HardwareIo {
                pin: index,
                kind: e.kind(),
            })?;
    }
    Ok(())
}
