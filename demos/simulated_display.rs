//! Example: a configured clock face on simulated motors.
//!
//! This example demonstrates how to:
//! - Build a `MotorSystem` from TOML with simulated motors
//! - Listen to the shared position stream
//! - Drive displays forward to labels and blank them together
//!
//! Run with: `RUST_LOG=flap_motion=debug cargo run --example simulated_display`

use flap_motion::{parse_config, MotorSystem, Result};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"
event_capacity = 256

[motors.hours]
index = 0
total_steps = 2048
simulated = true

[motors.minutes]
index = 1
total_steps = 2048
simulated = true
throttle_ms = 250

[displays.hours]
motor = "hours"
labels = ["_", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12"]
total_positions = 13
period_secs = 2.0
calibrate = "_"

[displays.minutes]
motor = "minutes"
labels = ["_", "00", "15", "30", "45"]
total_positions = 5
period_secs = 2.0
calibrate = "_"
"#;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let config = parse_config(CONFIG)?;
    let mut system = MotorSystem::from_config(config)?;

    let mut events = system.subscribe();
    let listener = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => info!(motor = event.motor, position = event.position, "position"),
                Err(RecvError::Lagged(missed)) => warn!(missed, "listener fell behind"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    for (hour, minute) in [("3", "15"), ("9", "45"), ("12", "00")] {
        if let Some(display) = system.display_mut("hours") {
            display.set_flap(hour, false).await?;
        }
        if let Some(display) = system.display_mut("minutes") {
            display.set_flap(minute, false).await?;
        }
        info!(hour, minute, "showing");
    }

    system.blank_all().await?;
    for name in ["hours", "minutes"] {
        if let (Some(motor), Some(sim)) = (system.motor(name), system.simulator(name)) {
            info!(
                display = name,
                driver = motor.current_position(),
                inferred = sim.inferred_position(),
                "final positions"
            );
        }
    }

    system.close().await;
    let _ = listener.await;
    Ok(())
}
