//! autopunch library root.
//! Exposes CLI parser, high-level run() function, and internal modules.

pub mod browser;
pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod logging;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub async fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Setup { .. } => cli::commands::setup::handle(&cli.command),
        Commands::Login => cli::commands::login::handle(cli, cfg).await,
        Commands::LogToday
        | Commands::LogWeek
        | Commands::LogCustom { .. }
        | Commands::LogAny => cli::commands::log::handle(&cli.command, cli, cfg).await,
        Commands::Debug { .. } => cli::commands::debug::handle(&cli.command, cli, cfg).await,
    }
}

/// Entry point used by main.rs
pub async fn run() -> AppResult<()> {
    // 1. parse CLI
    let cli = Cli::parse();

    // 2. logging before anything else, so early failures are visible
    logging::init();

    // 3. load config ONCE, then apply env overrides on top
    let mut cfg = Config::load(cli.config.as_deref())?;
    cfg.apply_env_overrides();

    // 4. CLI timeout override beats both file and env
    if let Some(secs) = cli.timeout {
        cfg.op_timeout_secs = secs;
    }

    // 5. hand everything to the dispatcher
    dispatch(&cli, &cfg).await
}
