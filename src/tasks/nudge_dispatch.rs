//! Turns timer events into chimes and desktop notifications

use std::sync::Arc;
use tokio::{
    sync::broadcast::{error::RecvError, Receiver},
    task::JoinHandle,
};
use tracing::{debug, error, info, warn};

use crate::{
    services::{
        audio::{self, ToneSink},
        notification::{self, Notifier},
    },
    state::{AppState, TimerEvent, TimerPhase},
};

/// Side-effect facilities driven by the dispatcher
#[derive(Clone)]
pub struct Effects {
    pub tones: Arc<dyn ToneSink>,
    pub notifier: Arc<dyn Notifier>,
}

impl Effects {
    fn nudge(&self, remaining_seconds: u64) {
        tokio::spawn(audio::play_chime(Arc::clone(&self.tones)));
        notification::deliver(self.notifier.as_ref(), &notification::nudge_body(remaining_seconds));
    }

    fn complete(&self) {
        tokio::spawn(audio::play_completion(Arc::clone(&self.tones)));
        notification::deliver(self.notifier.as_ref(), notification::COMPLETE_BODY);
    }
}

/// Subscribe to timer events and spawn the dispatcher. The subscription is
/// taken before spawning so no event published after this call is missed.
pub fn spawn_nudge_dispatcher(state: Arc<AppState>, effects: Effects) -> JoinHandle<()> {
    let events = state.subscribe();
    tokio::spawn(nudge_dispatch_task(state, events, effects))
}

/// Background task that fires nudges as ticks arrive
pub async fn nudge_dispatch_task(state: Arc<AppState>, mut events: Receiver<TimerEvent>, effects: Effects) {
    info!("Starting nudge dispatcher");
    // Last run whose completion was played, so a catch-up and a buffered
    // Completed event never both play it
    let mut completed_run = None;

    loop {
        match events.recv().await {
            Ok(TimerEvent::Tick { run, state: tick, .. }) => match state.check_nudges(run, &tick) {
                Ok(fired) if !fired.is_empty() => {
                    info!(
                        "Nudge at {:?}s with {}s remaining",
                        fired, tick.remaining_seconds
                    );
                    effects.nudge(tick.remaining_seconds);
                }
                Ok(_) => {}
                Err(e) => error!("Failed to check nudges: {}", e),
            },
            Ok(TimerEvent::Completed { run, .. }) => {
                if completed_run != Some(run) {
                    info!("Run {} finished, playing completion", run);
                    completed_run = Some(run);
                    effects.complete();
                }
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                warn!("Nudge dispatcher lagged, {} events skipped", skipped);
                catch_up(&state, &effects, &mut completed_run);
            }
            Err(RecvError::Closed) => {
                debug!("Event channel closed, stopping nudge dispatcher");
                break;
            }
        }
    }
}

/// Fire what the skipped events would have: nudges already due in the
/// current run, and its completion if it finished in the gap
fn catch_up(state: &AppState, effects: &Effects, completed_run: &mut Option<u64>) {
    let snapshot = match state.snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("Failed to read session after lag: {}", e);
            return;
        }
    };
    let timer = snapshot.timer;

    match state.check_nudges(snapshot.run, &timer) {
        Ok(fired) if !fired.is_empty() => {
            info!("Catching up on nudges at {:?}s", fired);
            effects.nudge(timer.remaining_seconds);
        }
        Ok(_) => {}
        Err(e) => error!("Failed to check nudges: {}", e),
    }

    if timer.phase == TimerPhase::Completed && *completed_run != Some(snapshot.run) {
        info!("Run {} finished while lagging, playing completion", snapshot.run);
        *completed_run = Some(snapshot.run);
        effects.complete();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::Mutex,
        time::Duration,
    };
    use tokio::time::sleep;

    use crate::{
        nudge::NudgeConfig,
        services::{notification::Permission, NotifyError, ThemeStore},
    };

    #[derive(Default)]
    struct RecordingTones(Mutex<Vec<u32>>);

    impl ToneSink for RecordingTones {
        fn play_tone(&self, frequency_hz: u32, _duration: Duration) {
            self.0.lock().unwrap().push(frequency_hz);
        }
    }

    struct RecordingNotifier {
        permission: Permission,
        sent: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn new(permission: Permission) -> Self {
            Self { permission, sent: Mutex::new(Vec::new()) }
        }
    }

    impl Notifier for RecordingNotifier {
        fn permission(&self) -> Permission {
            self.permission
        }

        fn request_permission(&self) -> Permission {
            self.permission
        }

        fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
            assert_eq!(title, notification::APP_TITLE);
            self.sent.lock().unwrap().push(body.to_string());
            Ok(())
        }
    }

    fn setup(permission: Permission) -> (Arc<AppState>, Arc<RecordingTones>, Arc<RecordingNotifier>) {
        let state = Arc::new(AppState::new(ThemeStore::in_memory(), 30));
        let tones = Arc::new(RecordingTones::default());
        let notifier = Arc::new(RecordingNotifier::new(permission));
        spawn_nudge_dispatcher(
            Arc::clone(&state),
            Effects { tones: tones.clone(), notifier: notifier.clone() },
        );
        (state, tones, notifier)
    }

    #[tokio::test(start_paused = true)]
    async fn nudge_plays_chime_and_notifies() {
        let (state, tones, notifier) = setup(Permission::Granted);
        state.start(60, NudgeConfig::Count(1)).unwrap();

        sleep(Duration::from_millis(29_500)).await;
        assert!(tones.0.lock().unwrap().is_empty());

        sleep(Duration::from_secs(1)).await;
        assert_eq!(*tones.0.lock().unwrap(), vec![800, 1000]);
        assert_eq!(*notifier.sent.lock().unwrap(), vec!["Time check! 0:30 remaining"]);
        assert_eq!(state.snapshot().unwrap().fired, vec![30]);
    }

    #[tokio::test(start_paused = true)]
    async fn completion_plays_two_chimes() {
        let (state, tones, notifier) = setup(Permission::Granted);
        state.start(60, NudgeConfig::Count(1)).unwrap();

        sleep(Duration::from_millis(61_000)).await;
        assert_eq!(*tones.0.lock().unwrap(), vec![800, 1000, 800, 1000, 800, 1000]);
        assert_eq!(
            *notifier.sent.lock().unwrap(),
            vec!["Time check! 0:30 remaining", "Timer complete!"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn denied_notifications_still_fire_nudges() {
        let (state, tones, notifier) = setup(Permission::Denied);
        state.start(60, NudgeConfig::Percent(50)).unwrap();

        sleep(Duration::from_millis(30_500)).await;
        assert_eq!(*tones.0.lock().unwrap(), vec![800, 1000]);
        assert!(notifier.sent.lock().unwrap().is_empty());
        assert_eq!(state.snapshot().unwrap().fired, vec![30]);
    }

    #[tokio::test(start_paused = true)]
    async fn full_percent_nudges_on_final_tick_before_completion() {
        let (state, tones, notifier) = setup(Permission::Granted);
        state.start(60, NudgeConfig::Percent(100)).unwrap();

        sleep(Duration::from_millis(59_500)).await;
        assert!(notifier.sent.lock().unwrap().is_empty());

        sleep(Duration::from_secs(2)).await;
        assert_eq!(
            *notifier.sent.lock().unwrap(),
            vec!["Time check! 0:00 remaining", "Timer complete!"]
        );
        assert_eq!(tones.0.lock().unwrap().len(), 6);
        assert_eq!(state.snapshot().unwrap().fired, vec![60]);
    }

    #[tokio::test(start_paused = true)]
    async fn lagged_dispatcher_catches_up_on_completion() {
        let state = Arc::new(AppState::new(ThemeStore::in_memory(), 30));
        let tones = Arc::new(RecordingTones::default());
        let notifier = Arc::new(RecordingNotifier::new(Permission::Granted));
        let events = state.subscribe();

        // Finish a run while nobody drains the receiver, then overflow it
        let run = state.start(2, NudgeConfig::Percent(100)).unwrap().run;
        sleep(Duration::from_millis(2_500)).await;
        for _ in 0..150 {
            let _ = state.events_tx.send(TimerEvent::Reset { run: 0, at: chrono::Utc::now() });
        }

        tokio::spawn(nudge_dispatch_task(
            Arc::clone(&state),
            events,
            Effects { tones: tones.clone(), notifier: notifier.clone() },
        ));
        sleep(Duration::from_secs(1)).await;

        assert_eq!(
            *notifier.sent.lock().unwrap(),
            vec!["Time check! 0:00 remaining", "Timer complete!"]
        );
        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.run, run);
        assert_eq!(snapshot.fired, vec![2]);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_before_offset_fires_nothing() {
        let (state, tones, notifier) = setup(Permission::Granted);
        state.start(60, NudgeConfig::Count(1)).unwrap();
        sleep(Duration::from_millis(10_500)).await;
        state.reset().unwrap();

        sleep(Duration::from_secs(60)).await;
        assert!(tones.0.lock().unwrap().is_empty());
        assert!(notifier.sent.lock().unwrap().is_empty());
    }
}
