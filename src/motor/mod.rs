//! Motor module for flap-motion.
//!
//! Provides the four-phase stepper driver, its builder, and the
//! configuration-driven [`MotorSystem`].

mod builder;
mod driver;
pub mod phase;
mod position;
mod system;

pub use builder::{StepperMotorBuilder, DEFAULT_EVENT_CAPACITY};
pub use driver::{PositionEvent, StepperMotor};
pub use position::Position;
pub use system::MotorSystem;
