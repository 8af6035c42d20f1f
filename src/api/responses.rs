//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    nudge::{NextTrigger, NudgeConfig},
    presentation::{format_clock, next_nudge_label, ProgressView},
    state::{SessionSnapshot, TimerPhase, TimerState},
};

/// Full view of the countdown for the browser
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub phase: TimerPhase,
    pub timer: TimerState,
    /// Remaining time as `M:SS`
    pub clock: String,
    pub nudge: Option<NudgeConfig>,
    pub triggers: Vec<u64>,
    pub fired: Vec<u64>,
    pub next: NextTrigger,
    pub next_label: String,
    pub progress: ProgressView,
    pub timestamp: DateTime<Utc>,
}

impl From<SessionSnapshot> for StatusResponse {
    fn from(snapshot: SessionSnapshot) -> Self {
        let timer = snapshot.timer;
        let progress = ProgressView::render(
            &snapshot.triggers,
            timer.total_seconds,
            timer.progress,
            timer.elapsed_seconds,
        );

        Self {
            phase: timer.phase,
            clock: format_clock(timer.remaining_seconds),
            nudge: snapshot.nudge,
            triggers: snapshot.triggers.offsets().to_vec(),
            fired: snapshot.fired,
            next: snapshot.next,
            next_label: next_nudge_label(snapshot.next),
            progress,
            timer,
            timestamp: Utc::now(),
        }
    }
}

/// Marker layout for a configuration that has not started
#[derive(Debug, Clone, Serialize)]
pub struct PreviewResponse {
    pub total_seconds: u64,
    pub nudge: NudgeConfig,
    pub triggers: Vec<u64>,
    pub progress: ProgressView,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok(uptime: String) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime,
        }
    }
}
