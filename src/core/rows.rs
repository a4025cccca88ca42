//! Timesheet row location.
//!
//! The page is snapshotted once (a single JS evaluate returning plain facts
//! about every row); everything after that is pure logic over the snapshot,
//! so row selection is testable without a browser.

use crate::browser::Session;
use crate::core::selectors::{ROW_TOGGLE, ROW_UNIVERSE};
use crate::errors::{AppError, AppResult};
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
pub struct RowSnapshot {
    pub index: usize,
    pub text: String,
    pub has_toggle: bool,
}

/// A "-Nh" style marker, e.g. "-8h" or "-7.5h".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissingMarker {
    pub hours: f64,
}

fn marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-(\d+(?:[.,]\d+)?)h").unwrap())
}

/// Parse the missing-hours marker out of a row's text, if present.
pub fn missing_marker(text: &str) -> Option<MissingMarker> {
    let caps = marker_re().captures(text)?;
    let hours: f64 = caps[1].replace(',', ".").parse().ok()?;
    Some(MissingMarker { hours })
}

/// First row that carries a marker AND owns a toggle control. Header and
/// summary rows show marker-like totals but have no toggle, so they lose.
/// First match in document order wins; no ranking beyond that.
pub fn locate_missing_row(rows: &[RowSnapshot]) -> Option<&RowSnapshot> {
    rows.iter()
        .find(|r| r.has_toggle && missing_marker(&r.text).is_some())
}

/// Best-effort date-ish token pulled from the row text. Markers are stripped
/// first so "-7.5h" never reads as a numeric date.
pub fn date_hint(text: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:mon|tue|wed|thu|fri|sat|sun)[a-z]*,?\s+\d{1,2}(?:\s+\w+)?|\b\d{1,2}[./-]\d{1,2}(?:[./-]\d{2,4})?")
            .unwrap()
    });
    let cleaned = marker_re().replace_all(text, " ");
    re.find(&cleaned).map(|m| m.as_str().trim().to_string())
}

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Does the row's date hint plausibly describe `date`? Every token the hint
/// exposes (weekday name, month name, day number) must agree; a hint with no
/// recognizable tokens cannot disprove anything and passes. Used to keep a
/// date-targeted command from writing into some other day's row.
pub fn hint_matches_date(hint: &str, date: chrono::NaiveDate) -> bool {
    use chrono::Datelike;

    let h = hint.to_lowercase();

    static WEEKDAY: OnceLock<Regex> = OnceLock::new();
    let weekday = WEEKDAY
        .get_or_init(|| Regex::new(r"\b(mon|tue|wed|thu|fri|sat|sun)").unwrap());
    if let Some(caps) = weekday.captures(&h) {
        if caps[1] != crate::utils::date::weekday_str(date).to_lowercase() {
            return false;
        }
    }

    let months_seen: Vec<u32> = MONTHS
        .iter()
        .enumerate()
        .filter(|(_, m)| h.contains(*m))
        .map(|(i, _)| i as u32 + 1)
        .collect();
    if !months_seen.is_empty() && !months_seen.contains(&date.month()) {
        return false;
    }

    static NUM: OnceLock<Regex> = OnceLock::new();
    let num = NUM.get_or_init(|| Regex::new(r"\d{1,4}").unwrap());
    let numbers: Vec<u32> = num
        .find_iter(&h)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();
    if !numbers.is_empty() && !numbers.contains(&date.day()) {
        return false;
    }

    true
}

/// The submit is considered verified when no marker text remains in the row.
/// Best-effort: the vendor gives no contract that the marker updates
/// synchronously, so a surviving marker means "uncertain", not "failed".
pub fn row_is_complete(text_after: &str) -> bool {
    missing_marker(text_after).is_none()
}

/// Snapshot every row currently in the DOM. Uses the same ROW_UNIVERSE /
/// ROW_TOGGLE selectors as the click-by-index helpers below, so the two views
/// agree on element ordering.
pub async fn scan(session: &Session) -> AppResult<Vec<RowSnapshot>> {
    let script = format!(
        r#"(() => {{
            const rows = Array.from(document.querySelectorAll("{ROW_UNIVERSE}"));
            return rows.map((el, i) => ({{
                index: i,
                text: (el.innerText || el.textContent || '').trim(),
                has_toggle: !!el.querySelector("{ROW_TOGGLE}")
            }}));
        }})()"#
    );
    let rows: Vec<RowSnapshot> = session
        .page()
        .evaluate(script)
        .await?
        .into_value()
        .map_err(|e| AppError::Other(format!("failed to decode row snapshot: {e}")))?;
    debug!("scanned {} rows", rows.len());
    Ok(rows)
}

/// Re-read the text of a single row by snapshot index.
pub async fn row_text(session: &Session, index: usize) -> AppResult<String> {
    let script = format!(
        r#"(() => {{
            const rows = Array.from(document.querySelectorAll("{ROW_UNIVERSE}"));
            const r = rows[{index}];
            return r ? (r.innerText || r.textContent || '').trim() : '';
        }})()"#
    );
    session
        .page()
        .evaluate(script)
        .await?
        .into_value()
        .map_err(|e| AppError::Other(format!("failed to decode row text: {e}")))
}

/// Click the row's toggle control (or the row itself when the toggle is the
/// whole row). Returns false when the index no longer exists.
pub async fn open_row(session: &Session, index: usize) -> AppResult<bool> {
    let script = format!(
        r#"(() => {{
            const rows = Array.from(document.querySelectorAll("{ROW_UNIVERSE}"));
            const r = rows[{index}];
            if (!r) return false;
            const t = r.querySelector("{ROW_TOGGLE}");
            (t || r).click();
            return true;
        }})()"#
    );
    session
        .page()
        .evaluate(script)
        .await?
        .into_value()
        .map_err(|e| AppError::Other(format!("failed to decode toggle result: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(index: usize, text: &str, has_toggle: bool) -> RowSnapshot {
        RowSnapshot {
            index,
            text: text.to_string(),
            has_toggle,
        }
    }

    #[test]
    fn marker_parses_whole_and_fractional_hours() {
        assert_eq!(missing_marker("Mon, 1 Sep  -8h").unwrap().hours, 8.0);
        assert_eq!(missing_marker("Tue -7.5h").unwrap().hours, 7.5);
        assert_eq!(missing_marker("Tue -7,5h").unwrap().hours, 7.5);
    }

    #[test]
    fn marker_ignores_positive_hours() {
        assert!(missing_marker("Mon, 1 Sep  8h").is_none());
        assert!(missing_marker("worked 8h of 8h").is_none());
        assert!(missing_marker("").is_none());
    }

    #[test]
    fn locator_picks_the_marked_row_with_a_toggle() {
        let rows = vec![
            row(0, "Day  Hours  Balance -8h", false), // header, no toggle
            row(1, "Mon, 1 Sep  8h", true),
            row(2, "Tue, 2 Sep  -8h", true),
            row(3, "Wed, 3 Sep  -8h", true),
        ];
        let hit = locate_missing_row(&rows).unwrap();
        assert_eq!(hit.index, 2);
    }

    #[test]
    fn locator_rejects_header_rows_lacking_a_toggle() {
        let rows = vec![row(0, "Total missing -16h", false)];
        assert!(locate_missing_row(&rows).is_none());
    }

    #[test]
    fn empty_table_is_nothing_to_do() {
        assert!(locate_missing_row(&[]).is_none());
    }

    #[test]
    fn verification_tracks_marker_disappearance() {
        assert!(row_is_complete("Tue, 2 Sep  8h 30m"));
        assert!(!row_is_complete("Tue, 2 Sep  -8h"));
    }

    #[test]
    fn date_hint_grabs_something_readable() {
        assert_eq!(date_hint("Tue, 2 Sep  -8h").as_deref(), Some("Tue, 2 Sep"));
        assert_eq!(date_hint("02/09/2025  -8h").as_deref(), Some("02/09/2025"));
        assert!(date_hint("no dates here").is_none());
    }

    #[test]
    fn date_hint_never_reads_the_marker_as_a_date() {
        assert!(date_hint("Tue -7.5h").is_none());
        assert!(date_hint("-8h").is_none());
    }

    fn d(y: i32, m: u32, day: u32) -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn hint_match_accepts_the_day_it_describes() {
        // 2025-09-02 is a Tuesday
        assert!(hint_matches_date("Tue, 2 Sep", d(2025, 9, 2)));
        assert!(hint_matches_date("02/09/2025", d(2025, 9, 2)));
        assert!(hint_matches_date("Tuesday 2", d(2025, 9, 2)));
    }

    #[test]
    fn hint_match_rejects_a_different_day() {
        assert!(!hint_matches_date("Tue, 2 Sep", d(2025, 9, 3)));
        assert!(!hint_matches_date("Mon, 1 Sep", d(2025, 9, 2)));
        assert!(!hint_matches_date("02/09/2025", d(2025, 9, 3)));
        assert!(!hint_matches_date("Tue, 2 Oct", d(2025, 9, 2)));
    }

    #[test]
    fn hint_match_passes_when_it_cannot_tell() {
        assert!(hint_matches_date("today", d(2025, 9, 2)));
        assert!(hint_matches_date("", d(2025, 9, 2)));
    }
}
