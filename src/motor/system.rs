//! Motor system facade for multi-motor configuration.
//!
//! Owns every motor and display named in a [`SystemConfig`] and the single
//! notification channel they all publish on.

use heapless::{FnvIndexMap, String};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::config::{validate_config, MotorConfig, SystemConfig};
use crate::error::{bounded, ConfigError, Error, Result};
use crate::flap::FlapDisplay;
use crate::sim::SimulatedMotor;

use super::builder::StepperMotorBuilder;
use super::driver::{PositionEvent, StepperMotor};

/// A facade for managing the motors and displays of one configuration.
///
/// # Example
///
/// ```rust,ignore
/// use flap_motion::{load_config, MotorSystem};
///
/// let config = load_config("flaps.toml")?;
/// let mut system = MotorSystem::from_config(config)?;
/// let mut events = system.subscribe();
///
/// system.display_mut("hours").unwrap().set_flap("7", false).await?;
/// system.close().await;
/// ```
pub struct MotorSystem {
    config: SystemConfig,
    events: broadcast::Sender<PositionEvent>,
    motors: FnvIndexMap<String<32>, StepperMotor, 8>,
    simulators: FnvIndexMap<String<32>, SimulatedMotor, 8>,
    displays: FnvIndexMap<String<32>, FlapDisplay, 8>,
}

impl MotorSystem {
    /// Build every motor and display in `config`.
    ///
    /// Hardware motors open their sysfs GPIO pins; simulated motors get a
    /// fresh [`SimulatedMotor`]. Displays with a `calibrate` label start
    /// out showing it. Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, a pin cannot be opened, or no
    /// runtime is running.
    pub fn from_config(config: SystemConfig) -> Result<Self> {
        validate_config(&config)?;

        let (events, _) = broadcast::channel(config.event_capacity);
        let mut motors = FnvIndexMap::new();
        let mut simulators = FnvIndexMap::new();

        for (name, motor_config) in config.motors.iter() {
            let motor = if motor_config.simulated {
                let sim = SimulatedMotor::new(motor_config.total_steps)?;
                let motor = StepperMotorBuilder::new()
                    .from_motor_config(motor_config)
                    .simulated(&sim)
                    .events(events.clone())
                    .build()?;
                // Map capacity equals the config's motor map capacity
                let _ = simulators.insert(name.clone(), sim);
                motor
            } else {
                build_hardware(name, motor_config, &events)?
            };

            info!(
                motor = name.as_str(),
                index = motor_config.index,
                total_steps = motor_config.total_steps,
                simulated = motor_config.simulated,
                "motor ready"
            );
            let _ = motors.insert(name.clone(), motor);
        }

        let mut displays = FnvIndexMap::new();
        for (name, display_config) in config.displays.iter() {
            let motor = motors
                .get(&display_config.motor)
                .cloned()
                .ok_or_else(|| {
                    Error::Config(ConfigError::MotorNotFound(display_config.motor.clone()))
                })?;

            let mut display = FlapDisplay::new(
                display_config.label_strs(),
                display_config.total_positions,
                display_config.period_secs,
                motor,
            )?;
            if let Some(label) = &display_config.calibrate {
                display.calibrate(label)?;
            }

            info!(
                display = name.as_str(),
                motor = display_config.motor.as_str(),
                labels = display_config.labels.len(),
                "display ready"
            );
            let _ = displays.insert(name.clone(), display);
        }

        Ok(Self {
            config,
            events,
            motors,
            simulators,
            displays,
        })
    }

    /// Get the system configuration.
    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Subscribe to notifications from every motor.
    pub fn subscribe(&self) -> broadcast::Receiver<PositionEvent> {
        self.events.subscribe()
    }

    /// Get a motor handle by name.
    pub fn motor(&self, name: &str) -> Option<&StepperMotor> {
        self.motors
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// Get the simulated motor behind a simulated motor's pins.
    pub fn simulator(&self, name: &str) -> Option<&SimulatedMotor> {
        self.simulators
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// Get a display by name.
    pub fn display(&self, name: &str) -> Option<&FlapDisplay> {
        self.displays
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// Get a display by name, for moving it.
    pub fn display_mut(&mut self, name: &str) -> Option<&mut FlapDisplay> {
        self.displays
            .iter_mut()
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

    /// Drive every display with a blank label to it.
    ///
    /// All motors move at the same time. Displays without a blank label are
    /// skipped. Returns the first error after every move has finished.
    pub async fn blank_all(&mut self) -> Result<()> {
        let mut pending = Vec::new();
        for (name, display) in self.displays.iter() {
            let Ok(planned) = display.plan(crate::flap::BLANK_LABEL) else {
                continue;
            };
            let steps = i32::try_from(planned.steps).map_err(|_| {
                Error::Config(ConfigError::InvalidTotalSteps(display.motor().total_steps()))
            })?;
            let moving = display.motor().step(steps, planned.duration);
            pending.push((name.clone(), planned.index, moving));
        }

        let mut first_error = None;
        for (name, index, moving) in pending {
            match moving.await {
                Ok(()) => {
                    if let Some(display) = self.displays.get_mut(&name) {
                        display.commit(index);
                    }
                }
                Err(e) => {
                    warn!(display = name.as_str(), error = %e, "blanking failed");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Finish queued commands on every motor, then release all pins.
    pub async fn close(self) {
        for (name, motor) in self.motors.iter() {
            motor.close().await;
            info!(motor = name.as_str(), position = motor.current_position(), "motor closed");
        }
    }
}

impl core::fmt::Debug for MotorSystem {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MotorSystem")
            .field("motors", &self.motors)
            .field("displays", &self.displays.len())
            .finish()
    }
}

#[cfg(feature = "sysfs")]
fn build_hardware(
    name: &str,
    config: &MotorConfig,
    events: &broadcast::Sender<PositionEvent>,
) -> Result<StepperMotor> {
    use crate::pin::SysfsPin;

    let gpios = config
        .phase_pins()
        .ok_or(Error::Config(ConfigError::PinCount(config.pins.len())))?;

    let mut pins = Vec::with_capacity(gpios.len());
    for gpio in gpios {
        let pin = SysfsPin::open(gpio).map_err(|e| {
            warn!(motor = name, gpio, error = %e, "failed to open GPIO pin");
            Error::Config(ConfigError::IoError(bounded(&e.to_string())))
        })?;
        pins.push(pin);
    }

    StepperMotorBuilder::new()
        .from_motor_config(config)
        .pins(pins)
        .events(events.clone())
        .build()
}

#[cfg(not(feature = "sysfs"))]
fn build_hardware(
    name: &str,
    _config: &MotorConfig,
    _events: &broadcast::Sender<PositionEvent>,
) -> Result<StepperMotor> {
    Err(Error::Config(ConfigError::PinSource(bounded(name))))
}
