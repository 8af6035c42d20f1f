//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::Utc;
use serde::Serialize;
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{debug, info};

use super::{Advance, TimerEngine, TimerEvent, TimerPhase, TimerState};
use crate::{
    error::AppError,
    nudge::{self, NextTrigger, NudgeConfig, TriggerSet, TriggerState},
    services::ThemeStore,
    tasks::ticker_task,
};

/// What the ticker should do after advancing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerControl {
    Continue,
    Stop,
}

/// Everything belonging to one countdown. Only ever touched under the
/// session lock, so a start or reset swaps all of it at once.
#[derive(Debug, Default)]
struct Session {
    engine: TimerEngine,
    nudge: Option<NudgeConfig>,
    triggers: TriggerSet,
    fired: TriggerState,
    /// Bumped on every start and reset; tickers and queries from older runs
    /// are ignored
    run: u64,
    ticker: Option<JoinHandle<()>>,
}

impl Session {
    fn cancel_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            debug!("Cancelling ticker for run {}", self.run);
            handle.abort();
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        let timer = self.engine.state();
        SessionSnapshot {
            run: self.run,
            timer,
            nudge: self.nudge,
            triggers: self.triggers.clone(),
            fired: self.fired.fired(),
            next: nudge::next_trigger(&self.triggers, &self.fired, timer.elapsed_seconds),
        }
    }
}

/// Consistent copy of the session taken under one lock
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub run: u64,
    pub timer: TimerState,
    pub nudge: Option<NudgeConfig>,
    pub triggers: TriggerSet,
    pub fired: Vec<u64>,
    pub next: NextTrigger,
}

/// Main application state shared by the HTTP handlers and background tasks
#[derive(Debug)]
pub struct AppState {
    session: Mutex<Session>,
    /// Persisted dark-mode flag
    pub theme: ThemeStore,
    /// Duration used by previews when the request carries none
    pub preview_minutes: u64,
    pub start_time: Instant,
    /// Channel every timer event is published on
    pub events_tx: broadcast::Sender<TimerEvent>,
}

impl AppState {
    pub fn new(theme: ThemeStore, preview_minutes: u64) -> Self {
        let (events_tx, _) = broadcast::channel(100);

        Self {
            session: Mutex::new(Session::default()),
            theme,
            preview_minutes,
            start_time: Instant::now(),
            events_tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.events_tx.subscribe()
    }

    fn lock_session(&self) -> Result<MutexGuard<'_, Session>, AppError> {
        self.session.lock().map_err(|_| AppError::Poisoned("session"))
    }

    fn publish(&self, event: TimerEvent) {
        // No subscribers is normal when nothing is listening yet
        if self.events_tx.send(event).is_err() {
            debug!("No subscribers for timer event");
        }
    }

    /// Begin a countdown of `total_seconds` with nudges laid out per `nudge`.
    ///
    /// Any previous run is cancelled first, its ticker included, before the
    /// new ticker is spawned.
    pub fn start(self: &Arc<Self>, total_seconds: u64, nudge: NudgeConfig) -> Result<SessionSnapshot, AppError> {
        let mut session = self.lock_session()?;
        session.cancel_ticker();

        session.run += 1;
        session.nudge = Some(nudge);
        session.triggers = nudge::compute_triggers(total_seconds, nudge);
        session.fired.clear();
        let timer = session.engine.start(total_seconds);

        let run = session.run;
        session.ticker = Some(tokio::spawn(ticker_task(Arc::clone(self), run)));

        info!(
            "Started run {}: {}s with nudges at {:?}",
            run,
            total_seconds,
            session.triggers.offsets()
        );
        self.publish(TimerEvent::Started {
            run,
            nudge,
            triggers: session.triggers.clone(),
            state: timer,
            at: Utc::now(),
        });

        Ok(session.snapshot())
    }

    /// Advance the countdown by one second on behalf of the ticker of `run`
    pub fn advance(&self, run: u64) -> Result<TickerControl, AppError> {
        let mut session = self.lock_session()?;
        if session.run != run {
            debug!("Ignoring stale ticker for run {} (current {})", run, session.run);
            return Ok(TickerControl::Stop);
        }

        match session.engine.advance() {
            Advance::Tick(state) => {
                self.publish(TimerEvent::Tick { run, state, at: Utc::now() });
                Ok(TickerControl::Continue)
            }
            Advance::Finished(state) => {
                info!("Run {} completed", run);
                // The ticker calling us is about to exit on its own
                session.ticker = None;
                self.publish(TimerEvent::Tick { run, state, at: Utc::now() });
                self.publish(TimerEvent::Completed { run, state, at: Utc::now() });
                Ok(TickerControl::Stop)
            }
            Advance::Skipped if session.engine.phase() == TimerPhase::Paused => Ok(TickerControl::Continue),
            Advance::Skipped => Ok(TickerControl::Stop),
        }
    }

    /// Fire the nudges due at `tick` and return the newly fired offsets.
    /// Ticks from an older run fire nothing.
    pub fn check_nudges(&self, run: u64, tick: &TimerState) -> Result<Vec<u64>, AppError> {
        let mut session = self.lock_session()?;
        if session.run != run {
            return Ok(Vec::new());
        }

        let session = &mut *session;
        let fired = nudge::check_triggers(&session.triggers, &mut session.fired, tick.elapsed_seconds);
        if !fired.is_empty() {
            self.publish(TimerEvent::Nudged {
                run,
                offsets: fired.clone(),
                remaining_seconds: tick.remaining_seconds,
                at: Utc::now(),
            });
        }
        Ok(fired)
    }

    /// Pause a running countdown or resume a paused one
    pub fn toggle_pause(&self) -> Result<SessionSnapshot, AppError> {
        let mut session = self.lock_session()?;
        let run = session.run;

        match session.engine.toggle_pause() {
            Some(true) => {
                info!("Run {} paused", run);
                self.publish(TimerEvent::Paused { run, state: session.engine.state(), at: Utc::now() });
            }
            Some(false) => {
                info!("Run {} resumed", run);
                self.publish(TimerEvent::Resumed { run, state: session.engine.state(), at: Utc::now() });
            }
            None => debug!("Pause toggled with no countdown in progress"),
        }

        Ok(session.snapshot())
    }

    /// Stop the countdown and clear the timer and its nudges. Safe to call
    /// when nothing is running.
    pub fn reset(&self) -> Result<SessionSnapshot, AppError> {
        let mut session = self.lock_session()?;
        session.cancel_ticker();

        session.run += 1;
        session.engine.reset();
        session.nudge = None;
        session.triggers = TriggerSet::empty();
        session.fired.clear();

        info!("Timer reset");
        self.publish(TimerEvent::Reset { run: session.run, at: Utc::now() });
        Ok(session.snapshot())
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot, AppError> {
        Ok(self.lock_session()?.snapshot())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
