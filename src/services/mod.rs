//! Side-effect facilities: chimes, desktop notifications and the persisted
//! theme preference.

pub mod audio;
pub mod notification;
pub mod theme;

// Re-export main types
pub use audio::{sink_for, ToneSink};
pub use notification::{DesktopNotifier, Notifier, NotifyError, Permission};
pub use theme::{ThemeError, ThemePreference, ThemeStore};
