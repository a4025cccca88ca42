//! The one value flowing through the system: a single day's work entry.
//! Built from config defaults or CLI flags, validated, used once, discarded.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::utils::time::{hhmm, minutes_between, parse_time};
use chrono::{NaiveDate, NaiveTime};

#[derive(Debug, Clone, PartialEq)]
pub struct WorkEntry {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub break_min: Option<u32>,
    pub description: Option<String>,
}

impl WorkEntry {
    /// Entry for `date` using the configured default times.
    pub fn from_defaults(cfg: &Config, date: NaiveDate) -> AppResult<Self> {
        let start = parse_time(&cfg.default_start)
            .ok_or_else(|| AppError::InvalidTime(cfg.default_start.clone()))?;
        let end = parse_time(&cfg.default_end)
            .ok_or_else(|| AppError::InvalidTime(cfg.default_end.clone()))?;
        let entry = Self {
            date,
            start,
            end,
            break_min: Some(cfg.default_break_min),
            description: None,
        };
        entry.validate()?;
        Ok(entry)
    }

    pub fn validate(&self) -> AppResult<()> {
        let span = minutes_between(self.start, self.end);
        if span <= 0 {
            return Err(AppError::InvalidEntry(format!(
                "start {} must be before end {}",
                hhmm(self.start),
                hhmm(self.end)
            )));
        }
        if let Some(brk) = self.break_min {
            if i64::from(brk) >= span {
                return Err(AppError::InvalidEntry(format!(
                    "break of {brk} min does not fit in a {span} min day"
                )));
            }
        }
        Ok(())
    }

    pub fn start_hhmm(&self) -> String {
        hhmm(self.start)
    }

    pub fn end_hhmm(&self) -> String {
        hhmm(self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(start: &str, end: &str, break_min: Option<u32>) -> WorkEntry {
        WorkEntry {
            date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            start: parse_time(start).unwrap(),
            end: parse_time(end).unwrap(),
            break_min,
            description: None,
        }
    }

    #[test]
    fn defaults_produce_a_valid_entry() {
        let cfg = Config::default();
        let e =
            WorkEntry::from_defaults(&cfg, NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()).unwrap();
        assert_eq!(e.start_hhmm(), "09:00");
        assert_eq!(e.end_hhmm(), "17:30");
        assert_eq!(e.break_min, Some(60));
    }

    #[test]
    fn end_before_start_is_rejected() {
        assert!(entry("17:00", "09:00", None).validate().is_err());
        assert!(entry("09:00", "09:00", None).validate().is_err());
    }

    #[test]
    fn oversized_break_is_rejected() {
        assert!(entry("09:00", "10:00", Some(60)).validate().is_err());
        assert!(entry("09:00", "17:00", Some(60)).validate().is_ok());
    }
}
