//! Step commands.

use std::time::Duration;

use tokio::time::Instant;

use crate::error::MotorError;

/// Rotation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Increasing positions.
    Forward,
    /// Decreasing positions.
    Backward,
}

impl Direction {
    /// Get the direction sign (+1 or -1).
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// A signed, timed step request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepCommand {
    /// Signed step count (sign is direction).
    pub steps: i32,
    /// Total time budget for the whole move.
    pub duration: Duration,
}

impl StepCommand {
    /// Create a command from a step count and a duration in seconds.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::InvalidDuration` if `duration` is negative, not
    /// finite, or so large that its end cannot be represented as an instant.
    pub fn new(steps: i32, duration: f64) -> Result<Self, MotorError> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(MotorError::InvalidDuration(duration));
        }
        let seconds = duration;
        let duration = Duration::try_from_secs_f64(seconds)
            .map_err(|_| MotorError::InvalidDuration(seconds))?;
        if Instant::now().checked_add(duration).is_none() {
            return Err(MotorError::InvalidDuration(seconds));
        }
        Ok(Self { steps, duration })
    }

    /// Direction of travel.
    #[inline]
    pub fn direction(&self) -> Direction {
        if self.steps < 0 {
            Direction::Backward
        } else {
            Direction::Forward
        }
    }

    /// Number of phase transitions to perform.
    #[inline]
    pub fn magnitude(&self) -> u32 {
        self.steps.unsigned_abs()
    }

    /// Whether the command completes without moving.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.steps == 0
    }

    /// Ideal time between two transitions.
    #[inline]
    pub fn interval(&self) -> Duration {
        match self.magnitude() {
            0 => Duration::ZERO,
            n => self.duration / n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_values() {
        let cmd = StepCommand::new(-200, 4.0).unwrap();
        assert_eq!(cmd.direction(), Direction::Backward);
        assert_eq!(cmd.magnitude(), 200);
        assert_eq!(cmd.interval(), Duration::from_millis(20));
    }

    #[test]
    fn test_zero_command() {
        let cmd = StepCommand::new(0, 1.0).unwrap();
        assert!(cmd.is_zero());
        assert_eq!(cmd.interval(), Duration::ZERO);
    }

    #[test]
    fn test_invalid_duration() {
        assert!(matches!(
            StepCommand::new(10, -1.0),
            Err(MotorError::InvalidDuration(_))
        ));
        assert!(StepCommand::new(10, f64::NAN).is_err());
        assert!(StepCommand::new(10, f64::INFINITY).is_err());
        assert!(StepCommand::new(10, 1e300).is_err());
        // Fits a Duration but not an instant.
        assert_eq!(
            StepCommand::new(1, 1e19),
            Err(MotorError::InvalidDuration(1e19))
        );
        assert!(StepCommand::new(10, 0.0).is_ok());
    }

    #[test]
    fn test_extreme_step_count() {
        let cmd = StepCommand::new(i32::MIN, 1.0).unwrap();
        assert_eq!(cmd.magnitude(), 2_147_483_648);
    }
}
