use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::entry::WorkEntry;
use crate::core::logic::{self, Outcome};
use crate::errors::{AppError, AppResult};
use crate::ui::messages;
use crate::utils::date;
use crate::utils::time::{parse_optional_time, parse_time};

/// Handle log-today / log-week / log-custom / log-any.
pub async fn handle(cmd: &Commands, cli: &Cli, cfg: &Config) -> AppResult<()> {
    //
    // 1. Build and validate the entry BEFORE any browser is launched.
    //    Bad input must never cost a Chromium startup.
    //
    let entry = build_entry(cmd, cfg)?;

    //
    // 2. Launch, authenticate, land on the timesheet.
    //
    if matches!(cmd, Commands::LogWeek) {
        let days = date::weekdays_of(date::today());
        messages::info(format!("Filling week {} to {}", days[0], days[4]));
    }
    messages::info(format!("Opening {}…", cfg.timesheet_url()));
    let session = logic::open_timesheet(cfg, cli.headful).await?;

    //
    // 3. Run the fill pipeline, always closing the browser afterwards.
    //
    // log-today and log-custom name a specific day, so the located row's
    // date hint is checked against it; log-any and log-week take any row.
    let target = match cmd {
        Commands::LogToday | Commands::LogCustom { .. } => Some(entry.date),
        _ => None,
    };
    let result = match cmd {
        Commands::LogWeek => logic::fill_week(&session, &entry).await.map(Some),
        _ => logic::fill_missing_day(&session, &entry, target)
            .await
            .map(|o| Some(vec![o])),
    };
    session.close().await;

    //
    // 4. Report.
    //
    let outcomes = result?.unwrap_or_default();
    report(cmd, &entry, &outcomes);
    Ok(())
}

fn build_entry(cmd: &Commands, cfg: &Config) -> AppResult<WorkEntry> {
    match cmd {
        Commands::LogCustom {
            date: raw_date,
            start,
            end,
            break_min,
            description,
        } => {
            let d = date::parse_date(raw_date)
                .ok_or_else(|| AppError::InvalidDate(raw_date.to_string()))?;

            let start = match parse_optional_time(start.as_ref())? {
                Some(t) => t,
                None => parse_time(&cfg.default_start)
                    .ok_or_else(|| AppError::InvalidTime(cfg.default_start.clone()))?,
            };
            let end = match parse_optional_time(end.as_ref())? {
                Some(t) => t,
                None => parse_time(&cfg.default_end)
                    .ok_or_else(|| AppError::InvalidTime(cfg.default_end.clone()))?,
            };

            let entry = WorkEntry {
                date: d,
                start,
                end,
                break_min: (*break_min).or(Some(cfg.default_break_min)),
                description: description.clone(),
            };
            entry.validate()?;
            Ok(entry)
        }
        _ => WorkEntry::from_defaults(cfg, date::today()),
    }
}

fn report(cmd: &Commands, entry: &WorkEntry, outcomes: &[Outcome]) {
    let filled: Vec<&Outcome> = outcomes
        .iter()
        .filter(|o| **o != Outcome::NothingToDo)
        .collect();
    if filled.is_empty() {
        messages::info("Nothing to do: no missing hours found.");
        return;
    }

    for outcome in filled {
        match outcome {
            Outcome::Filled { date_hint } => {
                let day = date_hint.clone().unwrap_or_else(|| {
                    format!("{} ({})", entry.date, date::weekday_str(entry.date))
                });
                messages::success(format!(
                    "Filled {day}: {} to {}",
                    entry.start_hhmm(),
                    entry.end_hhmm()
                ));
            }
            Outcome::VerifyUncertain { date_hint } => {
                let day = date_hint.clone().unwrap_or_else(|| entry.date.to_string());
                messages::warning(format!(
                    "Submitted {day}, but the missing-hours marker is still visible; check the portal."
                ));
            }
            Outcome::DateMismatch { date_hint, target } => {
                messages::warning(format!(
                    "Skipped row ({date_hint}): it does not look like {target}. Use log-any to fill it anyway."
                ));
            }
            Outcome::NothingToDo => {}
        }
    }

    if matches!(cmd, Commands::LogWeek) {
        let n = outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Filled { .. }))
            .count();
        messages::info(format!("Week done: {n} day(s) filled."));
    }
}
