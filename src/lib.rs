//! # flap-motion
//!
//! Stepper motor control for split-flap displays, built on embedded-hal 1.0
//! output pins and tokio.
//!
//! ## Features
//!
//! - **Serialized commands**: step commands on one motor never interleave
//! - **Drift-corrected timing**: every step deadline is measured from the
//!   command start, so a command takes its requested duration
//! - **Throttled notifications**: position events at most every 10 ms, plus
//!   a final event per command
//! - **Forward-only flaps**: labels map to motor positions and the wheel
//!   only ever turns forward
//! - **Simulated motor**: infers rotation from pin levels alone, for tests
//!   and hardware-free runs
//! - **Configuration-driven**: motors and displays defined in TOML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flap_motion::{FlapDisplay, SimulatedMotor, StepperMotor};
//!
//! let sim = SimulatedMotor::new(2048)?;
//! let motor = StepperMotor::simulated(2048, &sim)?;
//! let mut display = FlapDisplay::new(["_", "A", "B"], 3, 4.0, motor)?;
//!
//! display.set_flap("B", false).await?;
//! assert_eq!(sim.inferred_position(), display.motor().current_position());
//! ```
//!
//! ## Feature Flags
//!
//! - `sysfs` (default): Linux sysfs GPIO pins and hardware motors in
//!   [`MotorSystem`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Error variants carry heapless strings
#![allow(clippy::result_large_err)]

// Core modules
pub mod config;
pub mod error;
pub mod flap;
pub mod motion;
pub mod motor;
pub mod pin;
pub mod sim;

// Re-exports for ergonomic API
pub use config::{
    load_config, parse_config, validate_config, DisplayConfig, MotorConfig, SystemConfig,
};
pub use error::{ConfigError, Error, FlapError, MotorError, Result};
pub use flap::{FlapDisplay, FlapMove, BLANK_LABEL};
pub use motion::Direction;
pub use motor::{MotorSystem, PositionEvent, StepperMotor, StepperMotorBuilder};
pub use sim::SimulatedMotor;

#[cfg(feature = "sysfs")]
pub use pin::SysfsPin;
