use chrono::{Local, NaiveDate};

const VIEWING_DATE_FORMAT: &str = "%Y-%m-%d";
// %B also accepts the three-letter abbreviation when parsing.
const DIARY_DATE_FORMAT: &str = "%d %B %Y";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn format_viewing_date(date: NaiveDate) -> String {
    date.format(VIEWING_DATE_FORMAT).to_string()
}

pub fn parse_diary_date(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    let composite = format!("{} {} {}", day.trim(), month.trim(), year.trim());
    NaiveDate::parse_from_str(&composite, DIARY_DATE_FORMAT).ok()
}
