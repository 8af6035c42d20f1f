//! Events published to subscribers of the countdown

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TimerState;
use crate::nudge::{NudgeConfig, TriggerSet};

/// Every change to the session produces an event. `run` identifies the
/// countdown the event belongs to; it changes on each start and reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    Started {
        run: u64,
        nudge: NudgeConfig,
        triggers: TriggerSet,
        state: TimerState,
        at: DateTime<Utc>,
    },
    Tick {
        run: u64,
        state: TimerState,
        at: DateTime<Utc>,
    },
    /// One or more nudges became due
    Nudged {
        run: u64,
        offsets: Vec<u64>,
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    Paused {
        run: u64,
        state: TimerState,
        at: DateTime<Utc>,
    },
    Resumed {
        run: u64,
        state: TimerState,
        at: DateTime<Utc>,
    },
    Completed {
        run: u64,
        state: TimerState,
        at: DateTime<Utc>,
    },
    Reset {
        run: u64,
        at: DateTime<Utc>,
    },
}

impl TimerEvent {
    /// Event name used for the SSE `event:` field
    pub fn name(&self) -> &'static str {
        match self {
            TimerEvent::Started { .. } => "started",
            TimerEvent::Tick { .. } => "tick",
            TimerEvent::Nudged { .. } => "nudged",
            TimerEvent::Paused { .. } => "paused",
            TimerEvent::Resumed { .. } => "resumed",
            TimerEvent::Completed { .. } => "completed",
            TimerEvent::Reset { .. } => "reset",
        }
    }
}
