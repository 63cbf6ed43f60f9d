//! Unit tests for configuration validation.

use flap_motion::config::{validate_config, SystemConfig};
use flap_motion::error::{ConfigError, Error, FlapError};

fn parse(toml_str: &str) -> SystemConfig {
    toml::from_str(toml_str).expect("Failed to parse TOML")
}

const MOTOR: &str = r#"
[motors.wheel]
index = 0
total_steps = 300
simulated = true
"#;

/// Test validation of a valid configuration.
#[test]
fn test_valid_config_passes_validation() {
    let config = parse(&format!(
        r#"{MOTOR}
[displays.letters]
motor = "wheel"
labels = ["A", "B", "C"]
total_positions = 3
period_secs = 6.0
calibrate = "B"
"#
    ));
    assert!(validate_config(&config).is_ok());
}

/// Test validation fails for a display referencing a non-existent motor.
#[test]
fn test_display_invalid_motor_reference() {
    let config = parse(&format!(
        r#"{MOTOR}
[displays.letters]
motor = "nonexistent"
labels = ["A"]
total_positions = 1
period_secs = 1.0
"#
    ));
    let result = validate_config(&config);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::MotorNotFound(ref name))) if name.as_str() == "nonexistent"
    ));
}

/// Test validation fails for a step count out of range.
#[test]
fn test_invalid_total_steps() {
    let config = parse("[motors.m]\nindex = 0\ntotal_steps = 0\nsimulated = true");
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidTotalSteps(0)))
    ));

    let config = parse("[motors.m]\nindex = 0\ntotal_steps = 3000000000\nsimulated = true");
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidTotalSteps(3_000_000_000)))
    ));
}

/// Test validation fails for the wrong number of pins.
#[test]
fn test_wrong_pin_count() {
    let config = parse("[motors.m]\nindex = 0\ntotal_steps = 200\npins = [1, 2, 3, 4, 5]");
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::PinCount(5)))
    ));
}

/// Test validation fails for a motor with neither pins nor simulation.
#[test]
fn test_missing_pin_source() {
    let config = parse("[motors.m]\nindex = 0\ntotal_steps = 200");
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::PinSource(ref name))) if name.as_str() == "m"
    ));
}

/// Test validation fails when two motors share an index.
#[test]
fn test_duplicate_motor_index() {
    let config = parse(
        r#"
[motors.a]
index = 4
total_steps = 200
simulated = true

[motors.b]
index = 4
total_steps = 200
simulated = true
"#,
    );
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::DuplicateMotorIndex(4)))
    ));
}

/// Test validation fails for duplicate labels.
#[test]
fn test_duplicate_labels() {
    let config = parse(&format!(
        r#"{MOTOR}
[displays.letters]
motor = "wheel"
labels = ["A", "B", "A"]
total_positions = 3
period_secs = 1.0
"#
    ));
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::DuplicateLabel(ref l))) if l.as_str() == "A"
    ));
}

/// Test validation fails for an empty label list.
#[test]
fn test_empty_labels() {
    let config = parse(&format!(
        r#"{MOTOR}
[displays.letters]
motor = "wheel"
labels = []
total_positions = 3
period_secs = 1.0
"#
    ));
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::EmptyLabels))
    ));
}

/// Test validation fails when positions cannot hold every label.
#[test]
fn test_too_few_positions() {
    let config = parse(&format!(
        r#"{MOTOR}
[displays.letters]
motor = "wheel"
labels = ["A", "B", "C"]
total_positions = 2
period_secs = 1.0
"#
    ));
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidTotalPositions {
            positions: 2,
            labels: 3
        }))
    ));
}

/// Test validation fails for a non-positive period.
#[test]
fn test_invalid_period() {
    let config = parse(&format!(
        r#"{MOTOR}
[displays.letters]
motor = "wheel"
labels = ["A"]
total_positions = 1
period_secs = 0.0
"#
    ));
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidPeriod(_)))
    ));
}

/// Test validation fails for a calibration label the wheel does not have.
#[test]
fn test_unknown_calibration_label() {
    let config = parse(&format!(
        r#"{MOTOR}
[displays.letters]
motor = "wheel"
labels = ["A", "B"]
total_positions = 2
period_secs = 1.0
calibrate = "Z"
"#
    ));
    assert!(matches!(
        validate_config(&config),
        Err(Error::Flap(FlapError::UnknownLabel(_)))
    ));
}

/// Test validation fails for a zero-capacity event channel.
#[test]
fn test_zero_event_capacity() {
    let config = parse(&format!("event_capacity = 0\n{MOTOR}"));
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidEventCapacity(0)))
    ));
}
