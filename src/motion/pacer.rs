//! Drift-corrected step pacing.
//!
//! Deadlines are anchored to the start of the command: step `k` is due at
//! `start + duration * k / n`. Each wait only covers the time still missing
//! until the next deadline, so a late wake-up shortens the following wait
//! instead of pushing every later step back.

use std::time::Duration;

use tokio::time::Instant;

use super::command::StepCommand;

/// Shortest wait worth handing to the timer. Below this the pacer yields.
pub const TIMER_RESOLUTION: Duration = Duration::from_millis(1);

/// Per-command pacing state.
#[derive(Debug, Clone)]
pub struct StepPacer {
    /// When the command started executing.
    start: Instant,
    /// Total time budget.
    duration: Duration,
    /// Number of transitions in the command.
    total: u32,
    /// Transitions already performed.
    current: u32,
}

impl StepPacer {
    /// Start pacing `command` now.
    pub fn start(command: &StepCommand) -> Self {
        Self::start_at(command, Instant::now())
    }

    /// Start pacing `command` from an explicit instant.
    pub fn start_at(command: &StepCommand, start: Instant) -> Self {
        Self {
            start,
            duration: command.duration,
            total: command.magnitude(),
            current: 0,
        }
    }

    /// Check if every transition has been performed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.current >= self.total
    }

    /// Transitions already performed.
    #[inline]
    pub fn current_step(&self) -> u32 {
        self.current
    }

    /// Get steps remaining.
    #[inline]
    pub fn steps_remaining(&self) -> u32 {
        self.total.saturating_sub(self.current)
    }

    /// Deadline of the next transition.
    pub fn next_deadline(&self) -> Instant {
        if self.total == 0 {
            return self.start;
        }
        let k = (self.current + 1).min(self.total) as f64;
        // k <= total, so the offset never exceeds the command duration.
        let offset = self.duration.mul_f64(k / self.total as f64);
        self.start.checked_add(offset).unwrap_or(self.start)
    }

    /// Suspend until the next transition is due.
    ///
    /// Sleeps on the timer when enough time remains, otherwise yields once so
    /// other motors sharing the scheduler still make progress.
    pub async fn wait(&self) {
        let deadline = self.next_deadline();
        let now = Instant::now();
        if deadline > now && deadline - now >= TIMER_RESOLUTION {
            tokio::time::sleep_until(deadline).await;
        } else {
            tokio::task::yield_now().await;
        }
    }

    /// Record one performed transition.
    #[inline]
    pub fn advance(&mut self) {
        if !self.is_complete() {
            self.current += 1;
        }
    }

    /// Time since the command started.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Get progress as a fraction (0.0 to 1.0).
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}
