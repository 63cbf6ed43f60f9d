//! Unit tests for TOML configuration parsing.

use std::io::Write;

use flap_motion::config::{load_config, parse_config, SystemConfig};
use flap_motion::error::{ConfigError, Error};

/// Test parsing a hardware motor configuration from TOML.
#[test]
fn test_parse_motor_config() {
    let toml_str = r#"
[motors.stepper1]
index = 2
total_steps = 2048
pins = [17, 18, 27, 22]
throttle_ms = 25
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let motor = config.motor("stepper1").expect("Motor not found");

    assert_eq!(motor.index, 2);
    assert_eq!(motor.total_steps, 2048);
    assert_eq!(motor.phase_pins(), Some([17, 18, 27, 22]));
    assert!(!motor.simulated);
    assert_eq!(motor.throttle_ms, Some(25));
}

/// Test parsing a display with its motor.
#[test]
fn test_parse_display_config() {
    let toml_str = r#"
[motors.wheel]
index = 0
total_steps = 200
simulated = true

[displays.letters]
motor = "wheel"
labels = ["_", "A", "B", "C"]
total_positions = 40
period_secs = 2.5
"#;

    let config = parse_config(toml_str).expect("Failed to parse config");
    let display = config.display("letters").expect("Display not found");

    assert_eq!(display.motor.as_str(), "wheel");
    assert_eq!(display.labels.len(), 4);
    assert_eq!(display.total_positions, 40);
    assert_eq!(display.period_secs, 2.5);
    assert!(display.calibrate.is_none());
}

/// Test the names listed in the configuration keep file order.
#[test]
fn test_names_in_file_order() {
    let toml_str = r#"
[motors.b]
index = 0
total_steps = 200
simulated = true

[motors.a]
index = 1
total_steps = 200
simulated = true
"#;

    let config = parse_config(toml_str).unwrap();
    let names: Vec<_> = config.motor_names().collect();
    assert_eq!(names, ["b", "a"]);
    assert_eq!(config.display_names().count(), 0);
}

/// Test loading a configuration file from disk.
#[test]
fn test_load_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[motors.m]\nindex = 0\ntotal_steps = 512\nsimulated = true"
    )
    .unwrap();

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.motor("m").unwrap().total_steps, 512);
}

/// Test malformed TOML is reported as a parse error.
#[test]
fn test_malformed_toml() {
    let result = parse_config("[motors.m\nindex = 0");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::ParseError(_)))
    ));
}

/// Test a missing required field is reported as a parse error.
#[test]
fn test_missing_total_steps() {
    let result = parse_config("[motors.m]\nindex = 0\nsimulated = true");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::ParseError(_)))
    ));
}
