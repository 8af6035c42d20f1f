//! Countdown state machine
//!
//! The engine owns no clock. Whoever drives it calls [`TimerEngine::advance`]
//! once per second; the session in [`super::AppState`] does this from the
//! ticker task.
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |
//!            v
//!        Completed -> (reset) -> Idle
//! ```

use super::{TimerPhase, TimerState};

/// Result of advancing the countdown by one second
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    /// Not running, nothing changed
    Skipped,
    /// One second elapsed
    Tick(TimerState),
    /// The final second elapsed; subscribers see a tick followed by completion
    Finished(TimerState),
}

#[derive(Debug, Clone, Default)]
pub struct TimerEngine {
    phase: TimerPhase,
    total_seconds: u64,
    remaining_seconds: u64,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn state(&self) -> TimerState {
        TimerState::snapshot(self.phase, self.total_seconds, self.remaining_seconds)
    }

    /// Begin a fresh countdown, discarding whatever run came before
    pub fn start(&mut self, total_seconds: u64) -> TimerState {
        self.total_seconds = total_seconds;
        self.remaining_seconds = total_seconds;
        self.phase = TimerPhase::Running;
        self.state()
    }

    pub fn advance(&mut self) -> Advance {
        if self.phase != TimerPhase::Running {
            return Advance::Skipped;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.phase = TimerPhase::Completed;
            return Advance::Finished(self.state());
        }
        Advance::Tick(self.state())
    }

    /// Flip between running and paused. Returns the new paused flag, or
    /// `None` when there is no countdown to pause.
    pub fn toggle_pause(&mut self) -> Option<bool> {
        self.phase = match self.phase {
            TimerPhase::Running => TimerPhase::Paused,
            TimerPhase::Paused => TimerPhase::Running,
            TimerPhase::Idle | TimerPhase::Completed => return None,
        };
        Some(self.phase == TimerPhase::Paused)
    }

    pub fn reset(&mut self) -> TimerState {
        *self = Self::default();
        self.state()
    }
}
