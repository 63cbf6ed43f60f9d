//! Configuration validation.

use crate::error::{bounded, ConfigError, Error, Result};
use crate::flap::LabelTable;

use super::{DisplayConfig, MotorConfig, SystemConfig};

/// Validate a system configuration.
///
/// Checks:
/// - Motor step counts are in range and indices are unique
/// - Each motor lists four pins or is simulated, not both
/// - Displays reference existing motors
/// - Label lists are non-empty, unique and fit their positions
/// - Periods are finite and positive
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    if config.event_capacity == 0 {
        return Err(Error::Config(ConfigError::InvalidEventCapacity(0)));
    }

    for (name, motor) in config.motors.iter() {
        validate_motor(name.as_str(), motor)?;
    }

    let mut indices = heapless::Vec::<u8, 8>::new();
    for motor in config.motors.values() {
        if indices.contains(&motor.index) {
            return Err(Error::Config(ConfigError::DuplicateMotorIndex(motor.index)));
        }
        // Capacity matches the motor map
        let _ = indices.push(motor.index);
    }

    for display in config.displays.values() {
        validate_display(display, config)?;
    }

    Ok(())
}

fn validate_motor(name: &str, config: &MotorConfig) -> Result<()> {
    if config.total_steps == 0 || config.total_steps > i32::MAX as u32 {
        return Err(Error::Config(ConfigError::InvalidTotalSteps(
            config.total_steps,
        )));
    }

    if config.simulated {
        if !config.pins.is_empty() {
            return Err(Error::Config(ConfigError::PinSource(bounded(name))));
        }
    } else if config.pins.is_empty() {
        return Err(Error::Config(ConfigError::PinSource(bounded(name))));
    } else if config.pins.len() != 4 {
        return Err(Error::Config(ConfigError::PinCount(config.pins.len())));
    }

    Ok(())
}

fn validate_display(display: &DisplayConfig, config: &SystemConfig) -> Result<()> {
    if config.motor(display.motor.as_str()).is_none() {
        return Err(Error::Config(ConfigError::MotorNotFound(
            display.motor.clone(),
        )));
    }

    let table = LabelTable::from_labels(display.label_strs())?;

    if display.total_positions == 0 || (display.total_positions as usize) < table.len() {
        return Err(Error::Config(ConfigError::InvalidTotalPositions {
            positions: display.total_positions,
            labels: table.len(),
        }));
    }

    if !(display.period_secs.is_finite() && display.period_secs > 0.0) {
        return Err(Error::Config(ConfigError::InvalidPeriod(
            display.period_secs,
        )));
    }

    if let Some(label) = &display.calibrate {
        if table.index_of(label).is_none() {
            return Err(Error::Flap(crate::error::FlapError::UnknownLabel(bounded(
                label,
            ))));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motor(simulated: bool, pins: &[u32]) -> MotorConfig {
        MotorConfig {
            index: 0,
            total_steps: 200,
            pins: heapless::Vec::from_slice(pins).unwrap(),
            simulated,
            throttle_ms: None,
        }
    }

    #[test]
    fn test_pin_source() {
        assert!(validate_motor("m", &motor(false, &[1, 2, 3, 4])).is_ok());
        assert!(validate_motor("m", &motor(true, &[])).is_ok());

        assert!(matches!(
            validate_motor("m", &motor(true, &[1, 2, 3, 4])),
            Err(Error::Config(ConfigError::PinSource(_)))
        ));
        assert!(matches!(
            validate_motor("m", &motor(false, &[])),
            Err(Error::Config(ConfigError::PinSource(_)))
        ));
        assert!(matches!(
            validate_motor("m", &motor(false, &[1, 2, 3])),
            Err(Error::Config(ConfigError::PinCount(3)))
        ));
    }

    #[test]
    fn test_invalid_total_steps() {
        let mut config = motor(true, &[]);
        config.total_steps = 0;
        assert!(matches!(
            validate_motor("m", &config),
            Err(Error::Config(ConfigError::InvalidTotalSteps(0)))
        ));
    }
}
