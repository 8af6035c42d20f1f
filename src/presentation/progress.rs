//! Progress and nudge-marker geometry for the linear bar and the circular
//! ring

use std::f64::consts::PI;
use serde::Serialize;

use crate::nudge::{NextTrigger, TriggerSet};

pub const CIRCLE_RADIUS: f64 = 80.0;
/// The ring is drawn in a 200x200 viewbox
pub const CIRCLE_CENTER: f64 = 100.0;
/// Progress shown by previews before a countdown starts
pub const PREVIEW_PROGRESS: f64 = 50.0;

pub fn circle_circumference() -> f64 {
    2.0 * PI * CIRCLE_RADIUS
}

/// One nudge marker, positioned on both progress displays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub offset: u64,
    /// Position along the linear bar
    pub left_percent: f64,
    pub cx: f64,
    pub cy: f64,
    /// The countdown has reached this marker
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressView {
    pub progress: f64,
    pub elapsed_seconds: u64,
    /// Stroke offset of the ring's progress arc
    pub stroke_dashoffset: f64,
    pub markers: Vec<Marker>,
}

impl ProgressView {
    pub fn render(triggers: &TriggerSet, total_seconds: u64, progress: f64, elapsed_seconds: u64) -> Self {
        let markers = triggers
            .iter()
            .map(|offset| {
                let fraction = if total_seconds > 0 {
                    offset as f64 / total_seconds as f64
                } else {
                    0.0
                };
                let angle = fraction * 2.0 * PI;

                Marker {
                    offset,
                    left_percent: fraction * 100.0,
                    cx: CIRCLE_CENTER + CIRCLE_RADIUS * angle.cos(),
                    cy: CIRCLE_CENTER + CIRCLE_RADIUS * angle.sin(),
                    completed: elapsed_seconds >= offset,
                }
            })
            .collect();

        let circumference = circle_circumference();
        Self {
            progress,
            elapsed_seconds,
            stroke_dashoffset: circumference - progress / 100.0 * circumference,
            markers,
        }
    }

    /// How a configuration looks halfway through, before anything runs
    pub fn preview(triggers: &TriggerSet, total_seconds: u64) -> Self {
        let elapsed = (total_seconds as f64 * PREVIEW_PROGRESS / 100.0) as u64;
        Self::render(triggers, total_seconds, PREVIEW_PROGRESS, elapsed)
    }
}

/// `M:SS`
pub fn format_clock(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

pub fn next_nudge_label(next: NextTrigger) -> String {
    match next {
        NextTrigger::Upcoming { seconds_until, .. } => {
            format!("Next nudge in {}", format_clock(seconds_until))
        }
        NextTrigger::AllFired => "All nudges completed".to_string(),
        NextTrigger::NoneUpcoming => String::new(),
    }
}
