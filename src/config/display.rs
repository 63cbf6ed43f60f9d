//! Split-flap display configuration from TOML.

use heapless::String;
use serde::Deserialize;

use crate::flap::{MAX_LABELS, MAX_LABEL_LEN};

/// One flap wheel driven by a named motor.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Name of the motor in `[motors]`.
    pub motor: String<32>,

    /// Labels in wheel order. The first one is shown at step 0.
    pub labels: heapless::Vec<String<MAX_LABEL_LEN>, MAX_LABELS>,

    /// Evenly spaced positions per revolution.
    pub total_positions: u32,

    /// Seconds per full revolution.
    pub period_secs: f64,

    /// Label the wheel shows at startup.
    #[serde(default)]
    pub calibrate: Option<String<MAX_LABEL_LEN>>,
}

impl DisplayConfig {
    /// Labels as string slices.
    pub fn label_strs(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(|s| s.as_str())
    }
}
