//! Builder pattern for StepperMotor.

use std::time::Duration;

use embedded_hal::digital::OutputPin;
use tokio::sync::broadcast;

use crate::config::MotorConfig;
use crate::error::{ConfigError, Error, Result};
use crate::motion::{EventThrottle, DEFAULT_THROTTLE};
use crate::sim::{SimulatedMotor, SimulatedPin};

use super::driver::{PositionEvent, StepperMotor};

/// Default capacity of a notification channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Builder for creating StepperMotor instances.
pub struct StepperMotorBuilder<P>
where
    P: OutputPin + Send + 'static,
{
    id: u8,
    total_steps: Option<u32>,
    pins: Option<Vec<P>>,
    simulated_steps: Option<u32>,
    events: Option<broadcast::Sender<PositionEvent>>,
    event_capacity: usize,
    throttle: Duration,
}

impl<P> Default for StepperMotorBuilder<P>
where
    P: OutputPin + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P> StepperMotorBuilder<P>
where
    P: OutputPin + Send + 'static,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            id: 0,
            total_steps: None,
            pins: None,
            simulated_steps: None,
            events: None,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            throttle: DEFAULT_THROTTLE,
        }
    }

    /// Set the motor index carried by notifications.
    pub fn id(mut self, id: u8) -> Self {
        self.id = id;
        self
    }

    /// Set steps per full revolution.
    pub fn total_steps(mut self, steps: u32) -> Self {
        self.total_steps = Some(steps);
        self
    }

    /// Set the phase pins, in energization order.
    pub fn pins<I>(mut self, pins: I) -> Self
    where
        I: IntoIterator<Item = P>,
    {
        self.pins = Some(pins.into_iter().collect());
        self
    }

    /// Publish notifications on an existing channel instead of a private one.
    ///
    /// Lets several motors feed a single status stream.
    pub fn events(mut self, sender: broadcast::Sender<PositionEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Capacity of the private notification channel.
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Minimum time between intermediate notifications.
    pub fn throttle(mut self, interval: Duration) -> Self {
        self.throttle = interval;
        self
    }

    /// Configure from a MotorConfig.
    pub fn from_motor_config(mut self, config: &MotorConfig) -> Self {
        self.id = config.index;
        self.total_steps = Some(config.total_steps);
        if let Some(ms) = config.throttle_ms {
            self.throttle = Duration::from_millis(ms);
        }
        self
    }

    /// Build the StepperMotor and spawn its worker task.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing, the pin count is not
    /// four, the step count is out of range or disagrees with a substituted
    /// simulated motor, or no tokio runtime is running.
    pub fn build(self) -> Result<StepperMotor> {
        let total_steps = self.total_steps.ok_or_else(|| {
            Error::Config(ConfigError::ParseError(
                crate::error::bounded("total_steps is required"),
            ))
        })?;

        if total_steps == 0 || total_steps > i32::MAX as u32 {
            return Err(Error::Config(ConfigError::InvalidTotalSteps(total_steps)));
        }

        if let Some(simulated) = self.simulated_steps {
            if simulated != total_steps {
                return Err(Error::Config(ConfigError::StepCountMismatch {
                    expected: total_steps,
                    simulated,
                }));
            }
        }

        let pins = self.pins.unwrap_or_default();
        let pins: [P; 4] = pins
            .try_into()
            .map_err(|rest: Vec<P>| Error::Config(ConfigError::PinCount(rest.len())))?;

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| Error::Config(ConfigError::NoRuntime))?;

        let events = self
            .events
            .unwrap_or_else(|| broadcast::channel(self.event_capacity.max(1)).0);

        Ok(StepperMotor::spawn(
            self.id,
            pins,
            total_steps,
            events,
            EventThrottle::new(self.throttle),
            &runtime,
        ))
    }
}

impl StepperMotorBuilder<SimulatedPin> {
    /// Drive a simulated motor instead of hardware pins.
    ///
    /// The build fails unless the simulated motor has the same step count.
    pub fn simulated(mut self, motor: &SimulatedMotor) -> Self {
        self.pins = Some(motor.pins().into());
        self.simulated_steps = Some(motor.total_steps());
        self
    }
}

impl StepperMotor {
    /// Build a motor driving `simulated`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::StepCountMismatch` if `simulated` was created
    /// with a different step count.
    pub fn simulated(total_steps: u32, simulated: &SimulatedMotor) -> Result<Self> {
        StepperMotorBuilder::new()
            .total_steps(total_steps)
            .simulated(simulated)
            .build()
    }
}
