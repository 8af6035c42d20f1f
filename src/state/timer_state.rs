//! Timer state structure and management

use serde::{Deserialize, Serialize};

/// Lifecycle phase of the countdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
}

/// Point-in-time view of the countdown, handed to subscribers on every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: TimerPhase,
    pub total_seconds: u64,
    pub remaining_seconds: u64,
    pub elapsed_seconds: u64,
    pub paused: bool,
    /// True while a countdown is in progress, paused or not
    pub running: bool,
    /// Percentage of the countdown elapsed, 0 when nothing is configured
    pub progress: f64,
}

impl TimerState {
    /// Create an idle timer state
    pub fn new() -> Self {
        Self::snapshot(TimerPhase::Idle, 0, 0)
    }

    /// Derive the full view from the engine's counters
    pub fn snapshot(phase: TimerPhase, total_seconds: u64, remaining_seconds: u64) -> Self {
        let elapsed_seconds = total_seconds.saturating_sub(remaining_seconds);
        let progress = if total_seconds > 0 {
            elapsed_seconds as f64 / total_seconds as f64 * 100.0
        } else {
            0.0
        };

        Self {
            phase,
            total_seconds,
            remaining_seconds,
            elapsed_seconds,
            paused: phase == TimerPhase::Paused,
            running: matches!(phase, TimerPhase::Running | TimerPhase::Paused),
            progress,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}
