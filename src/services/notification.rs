//! Desktop notifications

use std::sync::Mutex;
use notify_rust::Notification;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::presentation::format_clock;

pub const APP_TITLE: &str = "Nudge O'Clock";
pub const COMPLETE_BODY: &str = "Timer complete!";

/// Whether notifications may be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Not decided yet; ask before the first notification
    Default,
    Granted,
    Denied,
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Notifications are not permitted")]
    NotPermitted,

    #[error("Failed to show notification: {0}")]
    Dispatch(String),
}

/// A notification facility. `notify` must not block the caller.
pub trait Notifier: Send + Sync {
    fn permission(&self) -> Permission;
    fn request_permission(&self) -> Permission;
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

pub fn nudge_body(remaining_seconds: u64) -> String {
    format!("Time check! {} remaining", format_clock(remaining_seconds))
}

/// Show `body` if permitted, asking for permission first when undecided.
/// Unavailable or failing notifications are logged and skipped.
pub fn deliver(notifier: &dyn Notifier, body: &str) {
    let permission = match notifier.permission() {
        Permission::Default => notifier.request_permission(),
        decided => decided,
    };

    if permission != Permission::Granted {
        debug!("Notifications not permitted, skipping: {}", body);
        return;
    }

    if let Err(e) = notifier.notify(APP_TITLE, body) {
        warn!("Notification skipped: {}", e);
    }
}

/// Notifications through the desktop's notification server
#[derive(Debug)]
pub struct DesktopNotifier {
    permission: Mutex<Permission>,
}

impl DesktopNotifier {
    /// `enabled = false` pins the permission to denied
    pub fn new(enabled: bool) -> Self {
        let permission = if enabled { Permission::Default } else { Permission::Denied };
        Self { permission: Mutex::new(permission) }
    }
}

fn show(title: &str, body: &str) -> Result<(), NotifyError> {
    Notification::new()
        .appname("nudge-oclock")
        .summary(title)
        .body(body)
        .show()
        .map(|_| ())
        .map_err(|e| NotifyError::Dispatch(e.to_string()))
}

impl Notifier for DesktopNotifier {
    fn permission(&self) -> Permission {
        self.permission.lock().map(|p| *p).unwrap_or(Permission::Denied)
    }

    fn request_permission(&self) -> Permission {
        let Ok(mut permission) = self.permission.lock() else {
            return Permission::Denied;
        };
        // Desktop notification servers do not prompt, so an undecided
        // permission is simply granted
        if *permission == Permission::Default {
            info!("Desktop notifications enabled");
            *permission = Permission::Granted;
        }
        *permission
    }

    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        if self.permission() != Permission::Granted {
            return Err(NotifyError::NotPermitted);
        }

        let (title, body) = (title.to_string(), body.to_string());
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                // Notification servers answer over D-Bus and can stall
                handle.spawn_blocking(move || {
                    if let Err(e) = show(&title, &body) {
                        warn!("{}", e);
                    }
                });
                Ok(())
            }
            Err(_) => show(&title, &body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nudge_body_formats_remaining() {
        assert_eq!(nudge_body(450), "Time check! 7:30 remaining");
        assert_eq!(nudge_body(5), "Time check! 0:05 remaining");
    }

    #[test]
    fn disabled_notifier_stays_denied() {
        let notifier = DesktopNotifier::new(false);
        assert_eq!(notifier.request_permission(), Permission::Denied);
        assert!(matches!(notifier.notify(APP_TITLE, "x"), Err(NotifyError::NotPermitted)));
    }

    #[test]
    fn request_grants_undecided_permission() {
        let notifier = DesktopNotifier::new(true);
        assert_eq!(notifier.permission(), Permission::Default);
        assert_eq!(notifier.request_permission(), Permission::Granted);
        assert_eq!(notifier.permission(), Permission::Granted);
    }

    #[test]
    fn deliver_skips_denied_notifier() {
        // Denied permission never reaches the notification server
        deliver(&DesktopNotifier::new(false), COMPLETE_BODY);
    }
}
