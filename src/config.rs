//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "nudge-oclock")]
#[command(about = "A countdown timer that nudges you with chimes and desktop notifications")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Duration in minutes used for nudge previews when none is given
    #[arg(short, long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..=crate::nudge::MAX_MINUTES))]
    pub minutes: u64,

    /// Do not ring the terminal bell
    #[arg(long)]
    pub mute: bool,

    /// Never show desktop notifications
    #[arg(long)]
    pub no_notifications: bool,

    /// Where the dark-mode preference is stored
    #[arg(long)]
    pub theme_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Theme file from the command line, else the platform config directory
    pub fn theme_path(&self) -> Option<PathBuf> {
        self.theme_file.clone().or_else(crate::services::ThemeStore::default_path)
    }
}
