//! Error types for flap-motion.
//!
//! Provides unified error handling across configuration, motor control, and flap mapping.

use core::fmt;

use embedded_hal::digital::ErrorKind;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all flap-motion operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motor operation error
    Motor(MotorError),
    /// Flap mapping error
    Flap(FlapError),
}

/// Configuration-related errors.
///
/// Raised at construction time and never retried.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// File I/O error while loading configuration
    IoError(heapless::String<128>),
    /// A motor needs exactly four phase pins
    PinCount(usize),
    /// Total steps must be in `1..=i32::MAX`
    InvalidTotalSteps(u32),
    /// Simulated motor and driver disagree on steps per revolution
    StepCountMismatch {
        /// Steps requested by the driver
        expected: u32,
        /// Steps declared by the simulated motor
        simulated: u32,
    },
    /// Revolution period must be finite and strictly positive
    InvalidPeriod(f64),
    /// Total positions must be non-zero and cover every label
    InvalidTotalPositions {
        /// Configured number of positions
        positions: u32,
        /// Number of labels
        labels: usize,
    },
    /// Label list is empty
    EmptyLabels,
    /// Too many labels for the label table
    TooManyLabels(usize),
    /// Label does not fit the label table's string capacity
    LabelTooLong(heapless::String<32>),
    /// The same label appears twice
    DuplicateLabel(heapless::String<16>),
    /// Motor name not found in configuration
    MotorNotFound(heapless::String<32>),
    /// Two motors share the same notification index
    DuplicateMotorIndex(u8),
    /// Simulated motor declared with pins, or hardware motor without them
    PinSource(heapless::String<32>),
    /// Shared notification channel needs room for at least one event
    InvalidEventCapacity(usize),
    /// Motors spawn worker tasks and must be built inside a tokio runtime
    NoRuntime,
}

/// Motor operation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorError {
    /// A phase pin write failed; the command was aborted
    HardwareIo {
        /// Index of the failing pin (0..4)
        pin: usize,
        /// Error kind reported by the pin
        kind: ErrorKind,
    },
    /// Step duration must be finite and non-negative
    InvalidDuration(f64),
    /// The motor has been closed
    Closed,
}

/// Flap mapping errors.
#[derive(Debug, Clone, PartialEq)]
pub enum FlapError {
    /// Label is not in the display's label table
    UnknownLabel(heapless::String<32>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Flap(e) => write!(f, "Flap error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
            ConfigError::PinCount(n) => write!(f, "Expected exactly 4 phase pins, got {}", n),
            ConfigError::InvalidTotalSteps(v) => {
                write!(f, "Invalid total steps: {}. Must be 1..={}", v, i32::MAX)
            }
            ConfigError::StepCountMismatch { expected, simulated } => write!(
                f,
                "Simulated motor has {} steps per revolution, driver expects {}",
                simulated, expected
            ),
            ConfigError::InvalidPeriod(v) => write!(f, "Invalid period: {}. Must be > 0", v),
            ConfigError::InvalidTotalPositions { positions, labels } => write!(
                f,
                "Invalid total positions: {} for {} labels",
                positions, labels
            ),
            ConfigError::EmptyLabels => write!(f, "Label list is empty"),
            ConfigError::TooManyLabels(n) => write!(f, "Too many labels: {}", n),
            ConfigError::LabelTooLong(label) => write!(f, "Label too long: '{}'", label),
            ConfigError::DuplicateLabel(label) => write!(f, "Duplicate label: '{}'", label),
            ConfigError::MotorNotFound(name) => write!(f, "Motor '{}' not found", name),
            ConfigError::DuplicateMotorIndex(i) => write!(f, "Duplicate motor index: {}", i),
            ConfigError::PinSource(name) => write!(
                f,
                "Motor '{}' must either list 4 pins or be simulated",
                name
            ),
            ConfigError::InvalidEventCapacity(n) => {
                write!(f, "Invalid event capacity: {}. Must be > 0", n)
            }
            ConfigError::NoRuntime => write!(f, "No tokio runtime available"),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::HardwareIo { pin, kind } => {
                write!(f, "Write to phase pin {} failed: {}", pin, kind)
            }
            MotorError::InvalidDuration(d) => write!(f, "Invalid step duration: {}s", d),
            MotorError::Closed => write!(f, "Motor is closed"),
        }
    }
}

impl fmt::Display for FlapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlapError::UnknownLabel(label) => write!(f, "Unknown flap '{}'", label),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<FlapError> for Error {
    fn from(e: FlapError) -> Self {
        Error::Flap(e)
    }
}

impl std::error::Error for Error {}

impl std::error::Error for ConfigError {}

impl std::error::Error for MotorError {}

impl std::error::Error for FlapError {}

/// Copy `s` into a bounded string, truncating on a char boundary.
pub(crate) fn bounded<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
