//! Nudge O'Clock - A countdown timer that nudges you along the way
//!
//! This library schedules evenly spaced or percentage-based nudges over a
//! countdown, fires each one exactly once as the countdown advances, and
//! drives chimes, desktop notifications and a browser progress display.

pub mod api;
pub mod config;
pub mod error;
pub mod nudge;
pub mod presentation;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{AppError, ValidationError};
pub use nudge::{NudgeConfig, TriggerSet};
pub use state::AppState;
pub use utils::signals::shutdown_signal;
