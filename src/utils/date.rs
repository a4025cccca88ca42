use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Monday..Friday of the week containing `d`.
pub fn weekdays_of(d: NaiveDate) -> Vec<NaiveDate> {
    let monday = d - Duration::days(d.weekday().num_days_from_monday() as i64);
    (0..5).map(|i| monday + Duration::days(i)).collect()
}

pub fn weekday_str(d: NaiveDate) -> &'static str {
    match d.weekday() {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}
