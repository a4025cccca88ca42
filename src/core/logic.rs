//! The sequential pipeline: locate a missing row, open its editor, fill,
//! submit, verify. One page, one thread of control, no retries beyond the
//! selector cascades themselves.

use crate::browser::Session;
use crate::config::Config;
use crate::core::entry::WorkEntry;
use crate::core::popup::{fill_entry, PagePopup};
use crate::core::rows;
use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use std::future::Future;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Filled { date_hint: Option<String> },
    /// No row carries a missing-hours marker. Treated as success.
    NothingToDo,
    /// Submit went through but the marker is still there. The marker is a
    /// heuristic, not a vendor contract, so this is not a hard failure.
    VerifyUncertain { date_hint: Option<String> },
    /// A specific date was requested but the first marked row reads as some
    /// other day. The row is left untouched.
    DateMismatch {
        date_hint: String,
        target: NaiveDate,
    },
}

/// Fill the first missing row on the already-open timesheet page. When a
/// `target` date is given, the row's date hint must not contradict it;
/// a row that reads as a different day is skipped rather than written to.
pub async fn fill_missing_day(
    session: &Session,
    entry: &WorkEntry,
    target: Option<NaiveDate>,
) -> AppResult<Outcome> {
    let snapshot = rows::scan(session).await?;
    let Some(row) = rows::locate_missing_row(&snapshot) else {
        info!("no missing-hours marker found, nothing to do");
        return Ok(Outcome::NothingToDo);
    };

    let date_hint = rows::date_hint(&row.text);
    match &date_hint {
        Some(hint) => info!("missing hours on row {} ({hint})", row.index),
        None => info!("missing hours on row {}", row.index),
    }

    if let (Some(target), Some(hint)) = (target, date_hint.as_deref()) {
        if !rows::hint_matches_date(hint, target) {
            warn!("row {} reads as {hint:?}, not {target}; leaving it alone", row.index);
            return Ok(Outcome::DateMismatch {
                date_hint: hint.to_string(),
                target,
            });
        }
    }

    if !rows::open_row(session, row.index).await? {
        return Err(AppError::Other(format!(
            "row {} disappeared before it could be opened",
            row.index
        )));
    }

    let popup = PagePopup::open(session).await?;
    fill_entry(&popup, entry).await?;
    session.settle().await;

    let after = rows::row_text(session, row.index).await?;
    if rows::row_is_complete(&after) {
        Ok(Outcome::Filled { date_hint })
    } else {
        warn!("marker still present after submit, treating as uncertain");
        Ok(Outcome::VerifyUncertain { date_hint })
    }
}

/// Launch, authenticate and land on the timesheet page.
pub async fn open_timesheet(cfg: &Config, headful: bool) -> AppResult<Session> {
    let password = Config::password()?;
    let session = Session::launch(cfg, headful).await?;

    match crate::core::auth::login(&session, cfg, &password).await {
        Ok(()) => {}
        Err(e) => {
            session.close().await;
            return Err(e);
        }
    }

    if let Err(e) = session.goto(&cfg.timesheet_url()).await {
        session.close().await;
        return Err(e);
    }
    session.settle().await;
    Ok(session)
}

/// Keep filling until the table reports nothing to do, bounded by one
/// iteration per weekday plus slack.
pub const WEEK_FILL_BOUND: usize = 7;

pub async fn fill_week(session: &Session, entry: &WorkEntry) -> AppResult<Vec<Outcome>> {
    drain_missing(|| async move {
        let outcome = fill_missing_day(session, entry, None).await?;
        if matches!(outcome, Outcome::Filled { .. }) {
            session.settle().await;
        }
        Ok(outcome)
    })
    .await
}

/// Loop driver behind fill_week. Only a clean Filled justifies another pass:
/// VerifyUncertain (and any other non-progress outcome) leaves the same row
/// at the top of the table, so looping again would resubmit it.
async fn drain_missing<F, Fut>(mut fill: F) -> AppResult<Vec<Outcome>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<Outcome>>,
{
    let mut outcomes = Vec::new();
    for _ in 0..WEEK_FILL_BOUND {
        match fill().await? {
            Outcome::NothingToDo => break,
            outcome @ Outcome::Filled { .. } => outcomes.push(outcome),
            outcome => {
                outcomes.push(outcome);
                break;
            }
        }
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn filled() -> Outcome {
        Outcome::Filled { date_hint: None }
    }

    /// Runs the week loop over a scripted outcome sequence; rows past the end
    /// of the script read as NothingToDo. Returns the collected outcomes and
    /// how many fills were attempted.
    async fn run_week(script: Vec<Outcome>) -> (Vec<Outcome>, usize) {
        let queue = Mutex::new(VecDeque::from(script));
        let calls = Mutex::new(0usize);
        let outcomes = drain_missing(|| {
            *calls.lock().unwrap() += 1;
            let next = queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Outcome::NothingToDo);
            async move { Ok(next) }
        })
        .await
        .unwrap();
        let n = *calls.lock().unwrap();
        (outcomes, n)
    }

    #[tokio::test]
    async fn week_fills_until_table_is_clean() {
        let (outcomes, calls) = run_week(vec![filled(), filled()]).await;
        assert_eq!(outcomes, vec![filled(), filled()]);
        assert_eq!(calls, 3); // two fills plus the NothingToDo that ends it
    }

    #[tokio::test]
    async fn week_does_not_resubmit_after_uncertain_verification() {
        let uncertain = Outcome::VerifyUncertain { date_hint: None };
        let (outcomes, calls) =
            run_week(vec![filled(), uncertain.clone(), filled(), filled()]).await;
        // The uncertain row would still be the first marked row on the next
        // pass, so the loop must stop instead of submitting it again.
        assert_eq!(outcomes, vec![filled(), uncertain]);
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn week_loop_is_bounded() {
        let (outcomes, calls) = run_week(vec![filled(); 20]).await;
        assert_eq!(outcomes.len(), WEEK_FILL_BOUND);
        assert_eq!(calls, WEEK_FILL_BOUND);
    }

    #[tokio::test]
    async fn empty_week_attempts_once_and_reports_nothing() {
        let (outcomes, calls) = run_week(Vec::new()).await;
        assert!(outcomes.is_empty());
        assert_eq!(calls, 1);
    }
}
