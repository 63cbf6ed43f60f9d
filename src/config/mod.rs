//! Configuration module for flap-motion.
//!
//! Provides types for loading and validating motor and display configurations
//! from TOML files or pre-parsed data.

mod display;
mod loader;
mod motor;
mod system;
mod validation;

pub use display::DisplayConfig;
pub use loader::{load_config, parse_config};
pub use motor::MotorConfig;
pub use system::SystemConfig;
pub use validation::validate_config;
