//! Simulated stepper motor.
//!
//! Infers rotation purely from the pin levels it observes, without looking
//! at the driver's own position counter. Running a driver against a
//! [`SimulatedMotor`] and comparing both positions validates the driver's
//! phase sequencing.

mod motor;
mod tracker;

pub use motor::{SimulatedMotor, SimulatedPin};
pub use tracker::{Movement, PhaseTracker};
