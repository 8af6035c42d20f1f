//! State management module
//!
//! This module contains the countdown state machine, the events it
//! publishes and the session that ties them to the nudge scheduler.

pub mod app_state;
pub mod events;
pub mod timer_engine;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, SessionSnapshot, TickerControl};
pub use events::TimerEvent;
pub use timer_engine::{Advance, TimerEngine};
pub use timer_state::{TimerPhase, TimerState};
