//! Presentation data handed to the browser: progress, marker geometry and
//! display strings.

pub mod progress;

pub use progress::{format_clock, next_nudge_label, Marker, ProgressView};
