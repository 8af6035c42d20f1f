//! Once-per-second countdown ticker

use std::{sync::Arc, time::Duration};
use tokio::time::{interval_at, Instant};
use tracing::{debug, error};

use crate::state::{AppState, TickerControl};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Advance the countdown of `run` every second until it completes, is
/// reset, or is replaced by a newer run
pub async fn ticker_task(state: Arc<AppState>, run: u64) {
    debug!("Ticker for run {} started", run);

    // First tick one period out; an immediate tick would cost the user a second
    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);

    loop {
        interval.tick().await;

        match state.advance(run) {
            Ok(TickerControl::Continue) => {}
            Ok(TickerControl::Stop) => break,
            Err(e) => {
                error!("Ticker for run {} failed to advance: {}", run, e);
                break;
            }
        }
    }

    debug!("Ticker for run {} stopped", run);
}
