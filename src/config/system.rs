//! System configuration - root configuration structure.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;

use crate::motor::DEFAULT_EVENT_CAPACITY;

use super::display::DisplayConfig;
use super::motor::MotorConfig;

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    /// Capacity of the notification channel shared by all motors.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    /// Named motor configurations.
    pub motors: FnvIndexMap<String<32>, MotorConfig, 8>,

    /// Named display configurations.
    #[serde(default)]
    pub displays: FnvIndexMap<String<32>, DisplayConfig, 8>,
}

fn default_event_capacity() -> usize {
    DEFAULT_EVENT_CAPACITY
}

impl SystemConfig {
    /// Get a motor configuration by name.
    pub fn motor(&self, name: &str) -> Option<&MotorConfig> {
        self.motors
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// Get a display configuration by name.
    pub fn display(&self, name: &str) -> Option<&DisplayConfig> {
        self.displays
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// List all motor names.
    pub fn motor_names(&self) -> impl Iterator<Item = &str> {
        self.motors.keys().map(|s| s.as_str())
    }

    /// List all display names.
    pub fn display_names(&self) -> impl Iterator<Item = &str> {
        self.displays.keys().map(|s| s.as_str())
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            event_capacity: DEFAULT_EVENT_CAPACITY,
            motors: FnvIndexMap::new(),
            displays: FnvIndexMap::new(),
        }
    }
}
