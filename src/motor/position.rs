//! Position tracking for stepper motors.
//!
//! Positions live on a ring of `total_steps` slots and wrap at both ends.

use crate::motion::Direction;

/// Modular motor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Current step index, always `< total_steps`.
    steps: u32,
    /// Steps per full revolution.
    total_steps: u32,
}

impl Position {
    /// Create a position tracker at the origin.
    ///
    /// `total_steps` must be non-zero; callers validate it first.
    #[inline]
    pub fn new(total_steps: u32) -> Self {
        Self::at(0, total_steps)
    }

    /// Create a position tracker at a specific step (reduced modulo `total_steps`).
    #[inline]
    pub fn at(steps: u32, total_steps: u32) -> Self {
        let total_steps = total_steps.max(1);
        Self {
            steps: steps % total_steps,
            total_steps,
        }
    }

    /// Get current position in steps.
    #[inline]
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Get steps per revolution.
    #[inline]
    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    /// Move one step in `direction`, wrapping at both ends.
    ///
    /// Returns the new position.
    #[inline]
    pub fn advance(&mut self, direction: Direction) -> u32 {
        self.steps = match direction {
            Direction::Forward => {
                if self.steps + 1 >= self.total_steps {
                    0
                } else {
                    self.steps + 1
                }
            }
            Direction::Backward => {
                if self.steps == 0 {
                    self.total_steps - 1
                } else {
                    self.steps - 1
                }
            }
        };
        self.steps
    }

    /// Position reached after a signed move of `delta` steps.
    #[inline]
    pub fn offset(&self, delta: i64) -> u32 {
        (self.steps as i64 + delta).rem_euclid(self.total_steps as i64) as u32
    }

    /// Forward-only distance to `target`, going around the ring if needed.
    #[inline]
    pub fn forward_distance_to(&self, target: u32) -> u32 {
        let target = target % self.total_steps;
        if target >= self.steps {
            target - self.steps
        } else {
            self.total_steps - self.steps + target
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_wraps_forward() {
        let mut pos = Position::at(299, 300);
        assert_eq!(pos.advance(Direction::Forward), 0);
        assert_eq!(pos.advance(Direction::Forward), 1);
    }

    #[test]
    fn test_position_wraps_backward() {
        let mut pos = Position::new(300);
        assert_eq!(pos.advance(Direction::Backward), 299);
        assert_eq!(pos.advance(Direction::Backward), 298);
    }

    #[test]
    fn test_offset() {
        let pos = Position::at(10, 300);
        assert_eq!(pos.offset(-20), 290);
        assert_eq!(pos.offset(295), 5);
        assert_eq!(pos.offset(-610), 0);
    }

    #[test]
    fn test_forward_distance() {
        let pos = Position::at(200, 300);
        assert_eq!(pos.forward_distance_to(200), 0);
        assert_eq!(pos.forward_distance_to(250), 50);
        // Going backwards is never an option
        assert_eq!(pos.forward_distance_to(100), 200);
    }
}
