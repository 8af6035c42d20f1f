//! Nudge scheduling
//!
//! Turns a countdown length and a [`NudgeConfig`] into trigger offsets and
//! tracks which of them have fired.

pub mod config;
pub mod scheduler;

pub use config::{duration_seconds, NudgeConfig, MAX_MINUTES};
pub use scheduler::{
    check_triggers, compute_triggers, next_trigger, NextTrigger, TriggerSet, TriggerState,
};
