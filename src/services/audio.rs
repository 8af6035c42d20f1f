//! Chime playback

use std::{
    io::{self, Write},
    sync::Arc,
    time::Duration,
};
use tokio::time::sleep;
use tracing::debug;

pub const CHIME_LOW_HZ: u32 = 800;
pub const CHIME_HIGH_HZ: u32 = 1000;
pub const TONE_DURATION: Duration = Duration::from_millis(500);
/// Delay between the two tones of a chime
pub const CHIME_GAP: Duration = Duration::from_millis(100);
/// Delay between the starts of the two chimes of the completion sound
pub const COMPLETION_GAP: Duration = Duration::from_millis(300);

/// Something that can sound a tone. Must return promptly; playback is fire
/// and forget.
pub trait ToneSink: Send + Sync {
    fn play_tone(&self, frequency_hz: u32, duration: Duration);
}

/// Rings the terminal bell for every tone
#[derive(Debug, Default)]
pub struct TerminalBell;

impl ToneSink for TerminalBell {
    fn play_tone(&self, frequency_hz: u32, duration: Duration) {
        debug!("Tone {} Hz for {:?}", frequency_hz, duration);

        let mut stdout = io::stdout();
        if let Err(e) = stdout.write_all(b"\x07").and_then(|_| stdout.flush()) {
            debug!("Terminal bell unavailable, skipping tone: {}", e);
        }
    }
}

/// Swallows every tone
#[derive(Debug, Default)]
pub struct Muted;

impl ToneSink for Muted {
    fn play_tone(&self, _frequency_hz: u32, _duration: Duration) {}
}

/// Pick the sink for the `--mute` flag
pub fn sink_for(muted: bool) -> Arc<dyn ToneSink> {
    if muted {
        Arc::new(Muted)
    } else {
        Arc::new(TerminalBell)
    }
}

/// Two rising tones
pub async fn play_chime(sink: Arc<dyn ToneSink>) {
    sink.play_tone(CHIME_LOW_HZ, TONE_DURATION);
    sleep(CHIME_GAP).await;
    sink.play_tone(CHIME_HIGH_HZ, TONE_DURATION);
}

/// Two chimes in a row
pub async fn play_completion(sink: Arc<dyn ToneSink>) {
    play_chime(Arc::clone(&sink)).await;
    sleep(COMPLETION_GAP - CHIME_GAP).await;
    play_chime(sink).await;
}
