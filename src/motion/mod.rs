//! Motion module for flap-motion.
//!
//! Provides step commands, drift-corrected pacing and notification throttling.

mod command;
mod pacer;
mod throttle;

pub use command::{Direction, StepCommand};
pub use pacer::{StepPacer, TIMER_RESOLUTION};
pub use throttle::{EventThrottle, DEFAULT_THROTTLE};
