//! Persisted dark-mode preference

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode theme preference: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Theme preference lock poisoned")]
    Poisoned,
}

/// Stored as `{"dark_mode": true}`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePreference {
    pub dark_mode: bool,
}

/// Dark-mode flag restored at startup and saved on every toggle
#[derive(Debug)]
pub struct ThemeStore {
    path: Option<PathBuf>,
    current: Mutex<ThemePreference>,
}

impl ThemeStore {
    /// `<config dir>/nudge-oclock/theme.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("nudge-oclock").join("theme.json"))
    }

    /// Restore the preference from `path`. A missing or unreadable file
    /// means light mode.
    pub fn load(path: PathBuf) -> Self {
        let preference = read_preference(&path);
        info!("Theme: {} (from {})", if preference.dark_mode { "dark" } else { "light" }, path.display());

        Self {
            path: Some(path),
            current: Mutex::new(preference),
        }
    }

    /// A store that never touches disk
    pub fn in_memory() -> Self {
        Self {
            path: None,
            current: Mutex::new(ThemePreference::default()),
        }
    }

    pub fn current(&self) -> Result<ThemePreference, ThemeError> {
        self.current.lock().map(|p| *p).map_err(|_| ThemeError::Poisoned)
    }

    /// Flip dark mode and persist it. The in-memory flag only changes once
    /// the write succeeded.
    pub fn toggle(&self) -> Result<ThemePreference, ThemeError> {
        let mut current = self.current.lock().map_err(|_| ThemeError::Poisoned)?;
        let next = ThemePreference { dark_mode: !current.dark_mode };

        if let Some(path) = &self.path {
            write_preference(path, next)?;
        }
        *current = next;

        info!("Dark mode {}", if next.dark_mode { "on" } else { "off" });
        Ok(next)
    }
}

fn read_preference(path: &Path) -> ThemePreference {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) => {
            debug!("No theme preference at {}: {}", path.display(), e);
            return ThemePreference::default();
        }
    };

    serde_json::from_str(&data).unwrap_or_else(|e| {
        warn!("Ignoring malformed theme preference {}: {}", path.display(), e);
        ThemePreference::default()
    })
}

fn write_preference(path: &Path, preference: ThemePreference) -> Result<(), ThemeError> {
    let data = serde_json::to_string_pretty(&preference)?;
    let io_err = |source| ThemeError::Write { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, data).map_err(io_err)
}
