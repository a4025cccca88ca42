use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::logic;
use crate::core::rows;
use crate::errors::AppResult;
use crate::ui::messages;
use crate::utils::colors::{CYAN, GREY, RESET};
use std::path::PathBuf;

/// Handle the `debug` command: log in, dump what the row scanner sees, and
/// save a screenshot. This is the first thing to run when the vendor ships a
/// new frontend and the selectors in core::selectors need a review.
pub async fn handle(cmd: &Commands, cli: &Cli, cfg: &Config) -> AppResult<()> {
    let screenshot = match cmd {
        Commands::Debug { screenshot } => screenshot
            .clone()
            .unwrap_or_else(|| PathBuf::from("autopunch-debug.png")),
        _ => return Ok(()),
    };

    messages::info(format!("Opening {}…", cfg.timesheet_url()));
    let session = logic::open_timesheet(cfg, cli.headful).await?;

    let result = dump(&session, &screenshot).await;
    session.close().await;
    result
}

async fn dump(session: &crate::browser::Session, screenshot: &PathBuf) -> AppResult<()> {
    if let Some(url) = session.current_url().await? {
        println!("{GREY}URL:{RESET} {url}");
    }

    let snapshot = rows::scan(session).await?;
    println!();
    println!("{CYAN}idx  toggle  marker  text{RESET}");
    for row in &snapshot {
        let marker = match rows::missing_marker(&row.text) {
            Some(m) => format!("-{}h", m.hours),
            None => "·".to_string(),
        };
        let toggle = if row.has_toggle { "yes" } else { "·" };
        let mut text = row.text.replace('\n', " ");
        if text.chars().count() > 60 {
            text = text.chars().take(57).collect::<String>() + "…";
        }
        println!("{:<4} {:<7} {:<7} {}", row.index, toggle, marker, text);
    }
    println!();

    match rows::locate_missing_row(&snapshot) {
        Some(row) => messages::info(format!(
            "Row {} would be picked{}",
            row.index,
            rows::date_hint(&row.text)
                .map(|h| format!(" ({h})"))
                .unwrap_or_default()
        )),
        None => messages::info("No fillable row found."),
    }

    session.screenshot(screenshot).await?;
    messages::success(format!("Screenshot saved: {}", screenshot.display()));
    Ok(())
}
