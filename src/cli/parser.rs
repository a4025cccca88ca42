use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for autopunch
/// CLI application that fills missing timesheet hours on an HR portal
#[derive(Parser)]
#[command(
    name = "autopunch",
    version = env!("CARGO_PKG_VERSION"),
    about = "Fill missing timesheet hours on your HR portal with a headless browser",
    long_about = None
)]
pub struct Cli {
    /// Override config file path (useful for tests or multiple accounts)
    #[arg(global = true, long = "config")]
    pub config: Option<PathBuf>,

    /// Show the browser window instead of running headless
    #[arg(global = true, long = "headful")]
    pub headful: bool,

    /// Per-operation timeout in seconds
    #[arg(global = true, long = "timeout")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the default configuration file
    Setup {
        #[arg(long, help = "Overwrite an existing configuration file")]
        force: bool,
    },

    /// Verify that the configured credentials can log in
    Login,

    /// Fill today's missing hours using the configured defaults
    LogToday,

    /// Fill every day of the current week still showing missing hours
    LogWeek,

    /// Fill one day with explicit times
    LogCustom {
        /// Date of the entry (YYYY-MM-DD)
        date: String,

        /// Start time (HH:MM)
        #[arg(long = "in", help = "Start time (HH:MM)")]
        start: Option<String>,

        /// End time (HH:MM)
        #[arg(long = "out", help = "End time (HH:MM)")]
        end: Option<String>,

        /// Break duration in minutes
        #[arg(long = "break", help = "Break duration in minutes")]
        break_min: Option<u32>,

        /// Free-text description for the entry
        #[arg(long = "desc", help = "Description for the entry")]
        description: Option<String>,
    },

    /// Fill the first row with missing hours, whatever its date
    LogAny,

    /// Dump a diagnostic snapshot of the timesheet table
    Debug {
        #[arg(long, value_name = "FILE", help = "Where to save the screenshot")]
        screenshot: Option<PathBuf>,
    },
}
