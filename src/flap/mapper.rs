//! Label-to-step mapping on top of a stepper motor.

use tracing::debug;

use crate::error::{bounded, ConfigError, Error, FlapError, Result};
use crate::motor::{Position, StepperMotor};

use super::labels::LabelTable;
use super::BLANK_LABEL;

/// A planned forward rotation to a label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlapMove {
    /// Index of the target label.
    pub index: u32,
    /// Motor position the move starts from.
    pub start_step: u32,
    /// Motor position of the target label.
    pub target_step: u32,
    /// Forward steps to travel (never negative).
    pub steps: u32,
    /// Seconds the move takes at the display's revolution period.
    pub duration: f64,
}

/// One split-flap wheel.
///
/// Shares its motor: the display does not close it.
#[derive(Debug)]
pub struct FlapDisplay {
    table: LabelTable,
    total_positions: u32,
    period: f64,
    current_index: u32,
    motor: StepperMotor,
}

impl FlapDisplay {
    /// Create a display showing the first label.
    ///
    /// `total_positions` is the number of evenly spaced positions on a full
    /// revolution; `period` is the time in seconds of one revolution.
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidPeriod` unless `period` is finite and positive
    /// - `ConfigError::InvalidTotalPositions` if there are fewer positions than labels
    /// - any label table error (empty, too many, too long, duplicate)
    pub fn new<I, S>(
        labels: I,
        total_positions: u32,
        period: f64,
        motor: StepperMotor,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !(period.is_finite() && period > 0.0) {
            return Err(Error::Config(ConfigError::InvalidPeriod(period)));
        }

        let table = LabelTable::from_labels(labels)?;
        if total_positions == 0 || (total_positions as usize) < table.len() {
            return Err(Error::Config(ConfigError::InvalidTotalPositions {
                positions: total_positions,
                labels: table.len(),
            }));
        }

        Ok(Self {
            table,
            total_positions,
            period,
            current_index: 0,
            motor,
        })
    }

    /// Label currently shown.
    pub fn current_label(&self) -> &str {
        self.table.label(self.current_index).unwrap_or(BLANK_LABEL)
    }

    /// Index of the label currently shown.
    pub fn current_index(&self) -> u32 {
        self.current_index
    }

    /// Labels in display order.
    pub fn labels(&self) -> &LabelTable {
        &self.table
    }

    /// Index of `label`, if present.
    pub fn index_of(&self, label: &str) -> Option<u32> {
        self.table.index_of(label)
    }

    /// Positions per revolution.
    pub fn total_positions(&self) -> u32 {
        self.total_positions
    }

    /// Seconds per revolution.
    pub fn period(&self) -> f64 {
        self.period
    }

    /// The underlying motor.
    pub fn motor(&self) -> &StepperMotor {
        &self.motor
    }

    /// Motor position of the label at `index`.
    pub fn target_step(&self, index: u32) -> u32 {
        let total_steps = self.motor.total_steps();
        let step = (index as f64 / self.total_positions as f64 * total_steps as f64).round() as u32;
        step % total_steps
    }

    /// Plan the forward move to `label` from the motor's actual position.
    ///
    /// # Errors
    ///
    /// Returns `FlapError::UnknownLabel` if `label` is not on this wheel.
    pub fn plan(&self, label: &str) -> Result<FlapMove> {
        let index = self.lookup(label)?;
        let total_steps = self.motor.total_steps();
        let start = Position::at(self.motor.current_position(), total_steps);
        let target_step = self.target_step(index);
        let steps = start.forward_distance_to(target_step);

        Ok(FlapMove {
            index,
            start_step: start.steps(),
            target_step,
            steps,
            duration: steps as f64 / total_steps as f64 * self.period,
        })
    }

    /// Declare that the wheel already shows `label`, without moving.
    ///
    /// Used at startup after the wheel was set by hand.
    ///
    /// # Errors
    ///
    /// Returns `FlapError::UnknownLabel` if `label` is not on this wheel.
    pub fn calibrate(&mut self, label: &str) -> Result<()> {
        let index = self.lookup(label)?;
        debug!(
            motor = self.motor.id(),
            label,
            position = self.motor.current_position(),
            "calibrated"
        );
        self.current_index = index;
        Ok(())
    }

    /// Show `label`.
    ///
    /// With `calibrate` set this is [`FlapDisplay::calibrate`]. Otherwise the
    /// wheel rotates forward to the label and the shown label is updated once
    /// the motor finishes.
    ///
    /// # Errors
    ///
    /// - `FlapError::UnknownLabel` if `label` is not on this wheel; nothing moves
    /// - any motor error from the rotation; the shown label is left unchanged
    pub async fn set_flap(&mut self, label: &str, calibrate: bool) -> Result<()> {
        if calibrate {
            return self.calibrate(label);
        }

        let planned = self.plan(label)?;
        debug!(
            motor = self.motor.id(),
            label,
            from = planned.start_step,
            to = planned.target_step,
            steps = planned.steps,
            "moving to flap"
        );

        let steps = i32::try_from(planned.steps)
            .map_err(|_| Error::Config(ConfigError::InvalidTotalSteps(self.motor.total_steps())))?;
        self.motor.step(steps, planned.duration).await?;
        self.commit(planned.index);
        Ok(())
    }

    /// Show the reserved blank label.
    pub async fn blank(&mut self) -> Result<()> {
        self.set_flap(BLANK_LABEL, false).await
    }

    pub(crate) fn commit(&mut self, index: u32) {
        self.current_index = index;
    }

    fn lookup(&self, label: &str) -> Result<u32> {
        self.table
            .index_of(label)
            .ok_or_else(|| Error::Flap(FlapError::UnknownLabel(bounded(label))))
    }
}
