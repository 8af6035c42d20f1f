//! Background tasks module
//!
//! This module contains the countdown ticker and the nudge dispatcher that
//! run alongside the HTTP server.

pub mod nudge_dispatch;
pub mod ticker;

// Re-export main functions
pub use nudge_dispatch::{nudge_dispatch_task, spawn_nudge_dispatcher, Effects};
pub use ticker::ticker_task;
