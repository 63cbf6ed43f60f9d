//! Motor configuration from TOML.

use serde::Deserialize;

/// One four-phase motor.
#[derive(Debug, Clone, Deserialize)]
pub struct MotorConfig {
    /// Index carried by this motor's notifications.
    pub index: u8,

    /// Steps per full revolution.
    pub total_steps: u32,

    /// GPIO numbers of the phase pins, in energization order.
    #[serde(default)]
    pub pins: heapless::Vec<u32, 8>,

    /// Drive a simulated motor instead of GPIO pins.
    #[serde(default)]
    pub simulated: bool,

    /// Minimum milliseconds between intermediate notifications.
    #[serde(default)]
    pub throttle_ms: Option<u64>,
}

impl MotorConfig {
    /// Phase pins as a fixed array, if exactly four are listed.
    pub fn phase_pins(&self) -> Option<[u32; 4]> {
        self.pins.as_slice().try_into().ok()
    }
}
