//! Phase-pattern movement inference.

use crate::motion::Direction;
use crate::motor::phase::{phase_for, PhaseRow, PHASE_COUNT};
use crate::motor::Position;

/// Outcome of evaluating a settled pin vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Pins match the next phase: the rotor advanced.
    Stepped(Direction),
    /// Pins still match the current phase.
    Holding,
    /// Pins match neither neighbour (mid-transition or invalid sequence).
    Unrecognized,
}

/// Pin-state machine tracking an inferred rotor position.
#[derive(Debug, Clone)]
pub struct PhaseTracker {
    pins: PhaseRow,
    position: Position,
}

impl PhaseTracker {
    /// Create a de-energized tracker at position 0.
    pub fn new(total_steps: u32) -> Self {
        Self {
            pins: [false; PHASE_COUNT],
            position: Position::new(total_steps),
        }
    }

    /// Record the level of one pin without evaluating.
    pub fn record(&mut self, pin: usize, level: bool) {
        if let Some(slot) = self.pins.get_mut(pin) {
            *slot = level;
        }
    }

    /// Evaluate the current pin vector once.
    ///
    /// Forward is checked before backward.
    pub fn evaluate(&mut self) -> Movement {
        let forward = self.position.offset(1);
        let backward = self.position.offset(-1);

        if self.pins == phase_for(forward) {
            self.position.advance(Direction::Forward);
            Movement::Stepped(Direction::Forward)
        } else if self.pins == phase_for(backward) {
            self.position.advance(Direction::Backward);
            Movement::Stepped(Direction::Backward)
        } else if self.pins == phase_for(self.position.steps()) {
            Movement::Holding
        } else {
            Movement::Unrecognized
        }
    }

    /// Latest recorded pin levels.
    pub fn pins(&self) -> PhaseRow {
        self.pins
    }

    /// Inferred position.
    pub fn position(&self) -> u32 {
        self.position.steps()
    }

    /// Steps per revolution.
    pub fn total_steps(&self) -> u32 {
        self.position.total_steps()
    }
}
