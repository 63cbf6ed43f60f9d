//! Stepper motor driver.
//!
//! The four phase pins are owned by a worker task spawned when the motor is
//! built. [`StepperMotor`] is a cheap, cloneable handle that submits
//! commands to that worker. Commands are queued in submission order and
//! executed one at a time, so two step sequences never interleave their pin
//! writes.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use embedded_hal::digital::OutputPin;
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::error::{MotorError, Result};
use crate::motion::{EventThrottle, StepCommand, StepPacer};
use crate::pin::write_phase;

use super::builder::StepperMotorBuilder;
use super::phase::{phase_for, PHASE_COUNT};
use super::position::Position;

/// Position-change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PositionEvent {
    /// Index of the motor that moved.
    pub motor: u8,
    /// Its new position.
    pub position: u32,
}

type Reply = oneshot::Sender<core::result::Result<(), MotorError>>;
type PendingReply = oneshot::Receiver<core::result::Result<(), MotorError>>;

enum Request {
    Step { command: StepCommand, reply: Reply },
    Close { reply: oneshot::Sender<()> },
}

/// Handle to a four-phase stepper motor.
///
/// Cloning the handle shares the same motor. The worker task exits, and the
/// pins are released, once [`StepperMotor::close`] is called or every handle
/// has been dropped.
#[derive(Clone)]
pub struct StepperMotor {
    id: u8,
    total_steps: u32,
    position: Arc<AtomicU32>,
    requests: mpsc::UnboundedSender<Request>,
    events: broadcast::Sender<PositionEvent>,
}

impl StepperMotor {
    /// Create a builder.
    pub fn builder<P>() -> StepperMotorBuilder<P>
    where
        P: OutputPin + Send + 'static,
    {
        StepperMotorBuilder::new()
    }

    /// Build a motor at position 0 from exactly four pins.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::PinCount` unless exactly four pins are given and
    /// `ConfigError::InvalidTotalSteps` if `total_steps` is out of range.
    pub fn new<P, I>(total_steps: u32, pins: I) -> Result<Self>
    where
        P: OutputPin + Send + 'static,
        I: IntoIterator<Item = P>,
    {
        StepperMotorBuilder::new()
            .total_steps(total_steps)
            .pins(pins)
            .build()
    }

    pub(crate) fn spawn<P>(
        id: u8,
        pins: [P; PHASE_COUNT],
        total_steps: u32,
        events: broadcast::Sender<PositionEvent>,
        throttle: EventThrottle,
        runtime: &tokio::runtime::Handle,
    ) -> Self
    where
        P: OutputPin + Send + 'static,
    {
        let (requests, receiver) = mpsc::unbounded_channel();
        let position = Arc::new(AtomicU32::new(0));

        let worker = Worker {
            id,
            pins,
            position: Position::new(total_steps),
            shared: Arc::clone(&position),
            requests: receiver,
            events: events.clone(),
            throttle,
        };
        runtime.spawn(worker.run());

        Self {
            id,
            total_steps,
            position,
            requests,
            events,
        }
    }

    /// Motor index carried by its notifications.
    #[inline]
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Steps per full revolution.
    #[inline]
    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    /// Position after the last performed transition.
    #[inline]
    pub fn current_position(&self) -> u32 {
        self.position.load(Ordering::Acquire)
    }

    /// Subscribe to position-change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<PositionEvent> {
        self.events.subscribe()
    }

    /// Whether the worker has stopped accepting commands.
    pub fn is_closed(&self) -> bool {
        self.requests.is_closed()
    }

    /// Move `steps` steps (sign is direction) over `duration` seconds.
    ///
    /// The command is queued when this method is called, not when the
    /// returned future is first polled. It runs to completion even if the
    /// future is dropped. A zero-step command resolves immediately without
    /// queueing and without notifications.
    ///
    /// # Errors
    ///
    /// - `MotorError::InvalidDuration` for a negative, non-finite or
    ///   oversized duration (not checked for zero steps)
    /// - `MotorError::HardwareIo` if a pin write failed mid-command
    /// - `MotorError::Closed` if the motor was closed
    pub fn step(
        &self,
        steps: i32,
        duration: f64,
    ) -> impl Future<Output = Result<()>> + Send + 'static {
        let submitted = self.submit(steps, duration);
        async move {
            let reply = match submitted {
                Ok(Some(reply)) => reply,
                Ok(None) => return Ok(()),
                Err(e) => return Err(e.into()),
            };
            reply.await.map_err(|_| MotorError::Closed)??;
            Ok(())
        }
    }

    fn submit(
        &self,
        steps: i32,
        duration: f64,
    ) -> core::result::Result<Option<PendingReply>, MotorError> {
        // A zero-step command never runs, so its duration is not checked.
        if steps == 0 {
            return Ok(None);
        }
        let command = StepCommand::new(steps, duration)?;

        let (reply, receiver) = oneshot::channel();
        self.requests
            .send(Request::Step { command, reply })
            .map_err(|_| MotorError::Closed)?;
        Ok(Some(receiver))
    }

    /// Finish every queued command, then release the pins.
    ///
    /// Commands submitted after this call fail with `MotorError::Closed`.
    pub async fn close(&self) {
        let (reply, receiver) = oneshot::channel();
        if self.requests.send(Request::Close { reply }).is_err() {
            return;
        }
        let _ = receiver.await;
    }
}

impl core::fmt::Debug for StepperMotor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StepperMotor")
            .field("id", &self.id)
            .field("total_steps", &self.total_steps)
            .field("position", &self.current_position())
            .finish()
    }
}

/// Single consumer of a motor's command queue. Owns the pins.
struct Worker<P> {
    id: u8,
    pins: [P; PHASE_COUNT],
    position: Position,
    shared: Arc<AtomicU32>,
    requests: mpsc::UnboundedReceiver<Request>,
    events: broadcast::Sender<PositionEvent>,
    throttle: EventThrottle,
}

impl<P: OutputPin> Worker<P> {
    async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            match request {
                Request::Step { command, reply } => {
                    let result = self.execute(&command).await;
                    // The caller may have stopped waiting.
                    let _ = reply.send(result);
                }
                Request::Close { reply } => {
                    self.requests.close();
                    while let Ok(late) = self.requests.try_recv() {
                        if let Request::Step { reply, .. } = late {
                            let _ = reply.send(Err(MotorError::Closed));
                        }
                    }
                    debug!(motor = self.id, position = self.position.steps(), "motor closed");
                    drop(self);
                    let _ = reply.send(());
                    return;
                }
            }
        }
        debug!(motor = self.id, "all handles dropped, releasing pins");
    }

    async fn execute(&mut self, command: &StepCommand) -> core::result::Result<(), MotorError> {
        if command.is_zero() {
            return Ok(());
        }

        let direction = command.direction();
        let mut pacer = StepPacer::start(command);
        debug!(
            motor = self.id,
            steps = command.steps,
            duration = ?command.duration,
            from = self.position.steps(),
            "step command started"
        );

        let mut result = Ok(());
        while !pacer.is_complete() {
            pacer.wait().await;

            // Bookkeeping first: a failed write is reported, not rolled back.
            let position = self.position.advance(direction);
            self.shared.store(position, Ordering::Release);
            pacer.advance();

            if let Err(e) = write_phase(&mut self.pins, phase_for(position)) {
                warn!(
                    motor = self.id,
                    position,
                    error = %e,
                    "phase write failed, aborting command"
                );
                result = Err(e);
                break;
            }
            trace!(motor = self.id, position, "step");

            if !pacer.is_complete() && self.throttle.ready(Instant::now()) {
                self.emit(position);
            }
        }

        self.throttle.force(Instant::now());
        self.emit(self.position.steps());

        debug!(
            motor = self.id,
            position = self.position.steps(),
            elapsed = ?pacer.elapsed(),
            ok = result.is_ok(),
            "step command finished"
        );
        result
    }

    fn emit(&self, position: u32) {
        // No subscribers is fine.
        let _ = self.events.send(PositionEvent {
            motor: self.id,
            position,
        });
    }
}
