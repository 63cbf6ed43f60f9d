//! Simulated motor and its pins.

use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tracing::{trace, warn};

use crate::error::ConfigError;
use crate::motor::phase::{PhaseRow, PHASE_COUNT};

use super::tracker::{Movement, PhaseTracker};

/// A stepper motor that infers its rotor position from pin writes.
///
/// Writes to the four pins arrive one at a time but describe a single
/// transition. They are coalesced into frames: a frame is evaluated once,
/// as soon as all four pins have been written, when a pin is written twice,
/// or when the coalescing window passes without further writes.
///
/// Cloning yields another handle to the same motor.
#[derive(Clone)]
pub struct SimulatedMotor {
    shared: Arc<Shared>,
}

struct Shared {
    state: Mutex<SimState>,
    settled: Notify,
    window: Duration,
}

struct SimState {
    tracker: PhaseTracker,
    /// Pins written since the last evaluation.
    dirty: [bool; PHASE_COUNT],
    /// Bumped on every write.
    generation: u64,
    /// A deferred evaluation task is scheduled.
    pending: bool,
    transitions: u64,
    rejected: u64,
}

impl SimState {
    fn evaluate(&mut self) {
        if !self.dirty.iter().any(|d| *d) {
            return;
        }
        self.dirty = [false; PHASE_COUNT];

        match self.tracker.evaluate() {
            Movement::Stepped(direction) => {
                self.transitions += 1;
                trace!(
                    position = self.tracker.position(),
                    ?direction,
                    "simulated rotor moved"
                );
            }
            Movement::Holding => {}
            Movement::Unrecognized => {
                self.rejected += 1;
                warn!(
                    pins = ?self.tracker.pins(),
                    position = self.tracker.position(),
                    "pin pattern matches no adjacent phase"
                );
            }
        }
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SimulatedMotor {
    /// Create a simulated motor at position 0 with all coils off.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTotalSteps` if `total_steps` is zero.
    pub fn new(total_steps: u32) -> Result<Self, ConfigError> {
        Self::with_window(total_steps, Duration::ZERO)
    }

    /// Create a simulated motor with an explicit coalescing window.
    ///
    /// A zero window defers evaluation by a single scheduler yield.
    pub fn with_window(total_steps: u32, window: Duration) -> Result<Self, ConfigError> {
        if total_steps == 0 || total_steps > i32::MAX as u32 {
            return Err(ConfigError::InvalidTotalSteps(total_steps));
        }
        Ok(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(SimState {
                    tracker: PhaseTracker::new(total_steps),
                    dirty: [false; PHASE_COUNT],
                    generation: 0,
                    pending: false,
                    transitions: 0,
                    rejected: 0,
                }),
                settled: Notify::new(),
                window,
            }),
        })
    }

    /// Steps per revolution.
    pub fn total_steps(&self) -> u32 {
        self.shared.lock().tracker.total_steps()
    }

    /// Position inferred from the evaluated pin frames.
    pub fn inferred_position(&self) -> u32 {
        self.shared.lock().tracker.position()
    }

    /// Latest level written to each pin.
    pub fn pin_states(&self) -> PhaseRow {
        self.shared.lock().tracker.pins()
    }

    /// Number of frames that moved the rotor.
    pub fn transitions(&self) -> u64 {
        self.shared.lock().transitions
    }

    /// Number of frames that matched no adjacent phase.
    pub fn rejected(&self) -> u64 {
        self.shared.lock().rejected
    }

    /// Pin handles feeding this motor, in phase order.
    pub fn pins(&self) -> [SimulatedPin; PHASE_COUNT] {
        core::array::from_fn(|index| SimulatedPin {
            shared: Arc::clone(&self.shared),
            index,
        })
    }

    /// Wait until every write has been evaluated.
    pub async fn settle(&self) {
        loop {
            let notified = self.shared.settled.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let state = self.shared.lock();
                if !state.pending && !state.dirty.iter().any(|d| *d) {
                    return;
                }
            }
            notified.await;
        }
    }

    fn on_write(shared: &Arc<Shared>, pin: usize, level: bool) {
        let mut state = shared.lock();

        // Writing a pin twice means the previous frame is over.
        if state.dirty[pin] {
            state.evaluate();
        }
        state.tracker.record(pin, level);
        state.dirty[pin] = true;
        state.generation += 1;

        if state.dirty.iter().all(|d| *d) {
            state.evaluate();
            drop(state);
            shared.settled.notify_waiters();
            return;
        }

        if state.pending {
            return;
        }
        match Handle::try_current() {
            Ok(handle) => {
                state.pending = true;
                drop(state);
                handle.spawn(Self::debounce(Arc::clone(shared)));
            }
            Err(_) => {
                // Nothing to defer onto.
                state.evaluate();
            }
        }
    }

    async fn debounce(shared: Arc<Shared>) {
        loop {
            let seen = shared.lock().generation;
            if shared.window.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(shared.window).await;
            }

            let mut state = shared.lock();
            if state.generation != seen {
                continue;
            }
            state.evaluate();
            state.pending = false;
            drop(state);
            shared.settled.notify_waiters();
            return;
        }
    }
}

impl core::fmt::Debug for SimulatedMotor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.shared.lock();
        f.debug_struct("SimulatedMotor")
            .field("position", &state.tracker.position())
            .field("pins", &state.tracker.pins())
            .field("transitions", &state.transitions)
            .finish()
    }
}

/// One phase pin of a [`SimulatedMotor`].
pub struct SimulatedPin {
    shared: Arc<Shared>,
    index: usize,
}

impl SimulatedPin {
    /// Phase index of this pin.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl core::fmt::Debug for SimulatedPin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SimulatedPin")
            .field("index", &self.index)
            .finish()
    }
}

impl ErrorType for SimulatedPin {
    type Error = Infallible;
}

impl OutputPin for SimulatedPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        SimulatedMotor::on_write(&self.shared, self.index, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        SimulatedMotor::on_write(&self.shared, self.index, true);
        Ok(())
    }
}

impl StatefulOutputPin for SimulatedPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.shared.lock().tracker.pins()[self.index])
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        self.is_set_high().map(|high| !high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motor::phase::phase_for;
    use embedded_hal::digital::PinState;

    fn write_row(pins: &mut [SimulatedPin; PHASE_COUNT], row: PhaseRow) {
        for (pin, level) in pins.iter_mut().zip(row) {
            pin.set_state(PinState::from(level)).unwrap();
        }
    }

    #[test]
    fn test_rejects_zero_steps() {
        assert!(matches!(
            SimulatedMotor::new(0),
            Err(ConfigError::InvalidTotalSteps(0))
        ));
    }

    #[test]
    fn test_full_frames_without_runtime() {
        let motor = SimulatedMotor::new(200).unwrap();
        let mut pins = motor.pins();

        for p in 1..=5 {
            write_row(&mut pins, phase_for(p));
        }
        assert_eq!(motor.inferred_position(), 5);
        assert_eq!(motor.transitions(), 5);
        assert_eq!(motor.rejected(), 0);
        assert_eq!(motor.pin_states(), phase_for(5));
    }

    #[tokio::test]
    async fn test_partial_frame_is_debounced() {
        let motor = SimulatedMotor::new(200).unwrap();
        let mut pins = motor.pins();

        // From all coils off, a partial frame matches no phase.
        pins[0].set_low().unwrap();
        pins[2].set_high().unwrap();
        assert_eq!(motor.inferred_position(), 0);

        motor.settle().await;
        assert_eq!(motor.inferred_position(), 0);
        assert_eq!(motor.rejected(), 1);

        // The all-off start state needs a full frame to lock in.
        pins[1].set_high().unwrap();
        motor.settle().await;
        assert_eq!(motor.pin_states(), phase_for(1));
        assert_eq!(motor.inferred_position(), 1);
    }

    #[tokio::test]
    async fn test_rewriting_a_pin_closes_the_frame() {
        let motor = SimulatedMotor::new(200).unwrap();
        let mut pins = motor.pins();
        write_row(&mut pins, phase_for(1));

        // 1 -> 2 only changes pins 1 and 3. The second write to pin 1
        // closes that frame before anything is deferred.
        pins[1].set_low().unwrap();
        pins[3].set_high().unwrap();
        pins[1].set_low().unwrap();
        assert_eq!(motor.inferred_position(), 2);
        motor.settle().await;
        assert_eq!(motor.inferred_position(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_coalesces_writes() {
        let motor = SimulatedMotor::with_window(200, Duration::from_millis(5)).unwrap();
        let mut pins = motor.pins();
        write_row(&mut pins, phase_for(1));

        // 1 -> 0 changes pins 0 and 2, written 2ms apart.
        pins[0].set_high().unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;
        pins[2].set_low().unwrap();
        motor.settle().await;

        assert_eq!(motor.inferred_position(), 0);
        assert_eq!(motor.transitions(), 2);
    }
}
