//! Defensive date parsing and reporting windows
//!
//! Marketplace exports carry dates as free text in several layouts. Parsing
//! never fails loudly: unparseable values yield `None` and the caller simply
//! leaves the record out of the bucket that needed the date.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::error::{EngineError, EngineResult};

const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

const FREE_FORM_DATETIME_FORMATS: &[&str] = &[
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%b %d, %Y %H:%M:%S",
];

const FREE_FORM_DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%d.%m.%Y", "%b %d, %Y", "%d %b %Y", "%B %d, %Y"];

/// Parse a marketplace date string
///
/// Accepts `YYYY-MM-DD[ T]HH:MM[:SS]`, RFC 3339, `DD/MM/YYYY [HH:MM[:SS]]`,
/// `DD-MM-YYYY [HH:MM[:SS]]`, and a handful of free-form layouts.
pub fn parse_loose(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if starts_with_iso_date(s) {
        return parse_iso(s);
    }

    parse_day_first(s).or_else(|| parse_free_form(s))
}

/// Date part only
pub fn parse_loose_date(raw: &str) -> Option<NaiveDate> {
    parse_loose(raw).map(|dt| dt.date())
}

/// Calendar-day bucket key (`YYYY-MM-DD`)
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a caller-supplied window bound; unlike record dates this is strict
pub fn parse_bound(field: &'static str, raw: Option<&str>) -> EngineResult<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => parse_loose_date(value).map(Some).ok_or_else(|| EngineError::InvalidDate {
            field,
            value: value.to_string(),
        }),
    }
}

fn starts_with_iso_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 10 && b[..4].iter().all(u8::is_ascii_digit) && b[4] == b'-' && b[7] == b'-'
}

fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    if let Some(dt) = ISO_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    // Trailing noise after the date part ("2024-05-01 (GMT+7)")
    s.get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// `DD/MM/YYYY` or `DD-MM-YYYY`, optionally followed by a time
fn parse_day_first(s: &str) -> Option<NaiveDateTime> {
    let mut parts = s.splitn(2, char::is_whitespace);
    let date_part = parts.next()?;
    let time_part = parts.next().map(str::trim).filter(|t| !t.is_empty());

    let sep = if date_part.contains('/') { '/' } else { '-' };
    let fields: Vec<&str> = date_part.split(sep).collect();
    let [day, month, year] = fields.as_slice() else {
        return None;
    };
    if year.len() != 4 {
        return None;
    }
    let date = NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)?;

    let time = match time_part {
        None => NaiveTime::MIN,
        Some(t) => TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(t, fmt).ok())?,
    };
    Some(date.and_time(time))
}

fn parse_free_form(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    FREE_FORM_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            FREE_FORM_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Inclusive calendar-day window `[start 00:00:00, end 23:59:59.999]`
///
/// A missing bound is open-ended; a window with neither bound admits
/// everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> EngineResult<Self> {
        match (start, end) {
            (Some(s), Some(e)) if s > e => Err(EngineError::InvalidWindow {
                start: s.to_string(),
                end: e.to_string(),
            }),
            _ => Ok(Self { start, end }),
        }
    }

    /// Both bounds, checked
    pub fn between(start: NaiveDate, end: NaiveDate) -> EngineResult<Self> {
        Self::new(Some(start), Some(end))
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn from_strs(start: Option<&str>, end: Option<&str>) -> EngineResult<Self> {
        Self::new(parse_bound("startDate", start)?, parse_bound("endDate", end)?)
    }

    /// No date restriction at all
    pub fn is_unrestricted(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Both bounds present
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.start.zip(self.end)
    }

    pub fn contains(&self, dt: &NaiveDateTime) -> bool {
        let day = dt.date();
        self.start.is_none_or(|s| day >= s) && self.end.is_none_or(|e| day <= e)
    }

    /// Parse `raw` and test it; unparseable text is never inside
    pub fn contains_raw(&self, raw: &str) -> bool {
        parse_loose(raw).is_some_and(|dt| self.contains(&dt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        ymd(y, m, d).and_hms_opt(h, mi, s).unwrap()
    }

    #[test]
    fn parses_iso_layouts() {
        assert_eq!(parse_loose("2024-05-01"), Some(ymd_hms(2024, 5, 1, 0, 0, 0)));
        assert_eq!(parse_loose("2024-05-01 13:45"), Some(ymd_hms(2024, 5, 1, 13, 45, 0)));
        assert_eq!(parse_loose("2024-05-01 13:45:10"), Some(ymd_hms(2024, 5, 1, 13, 45, 10)));
        assert_eq!(parse_loose("2024-05-01T13:45:10"), Some(ymd_hms(2024, 5, 1, 13, 45, 10)));
        assert_eq!(
            parse_loose("2024-05-01T13:45:10+07:00"),
            Some(ymd_hms(2024, 5, 1, 13, 45, 10))
        );
        assert_eq!(parse_loose("2024-05-01 (GMT+7)"), Some(ymd_hms(2024, 5, 1, 0, 0, 0)));
    }

    #[test]
    fn parses_day_first_layouts() {
        assert_eq!(parse_loose("03/04/2024"), Some(ymd_hms(2024, 4, 3, 0, 0, 0)));
        assert_eq!(parse_loose("03-04-2024 08:30"), Some(ymd_hms(2024, 4, 3, 8, 30, 0)));
        assert_eq!(parse_loose("31/12/2023 23:59:59"), Some(ymd_hms(2023, 12, 31, 23, 59, 59)));
    }

    #[test]
    fn parses_free_form() {
        assert_eq!(parse_loose("2024/05/01"), Some(ymd_hms(2024, 5, 1, 0, 0, 0)));
        assert_eq!(parse_loose("01.05.2024"), Some(ymd_hms(2024, 5, 1, 0, 0, 0)));
        assert_eq!(parse_loose("May 01, 2024"), Some(ymd_hms(2024, 5, 1, 0, 0, 0)));
    }

    #[test]
    fn garbage_is_none() {
        for raw in ["", "   ", "n/a", "32/13/2024", "2024-13-45", "31/02/2024"] {
            assert_eq!(parse_loose(raw), None, "{raw:?}");
        }
    }

    #[test]
    fn window_is_inclusive_of_whole_end_day() {
        let window = DateWindow::between(ymd(2024, 5, 1), ymd(2024, 5, 31)).unwrap();
        assert!(window.contains(&ymd_hms(2024, 5, 1, 0, 0, 0)));
        assert!(window.contains(&ymd_hms(2024, 5, 31, 23, 59, 59)));
        assert!(!window.contains(&ymd_hms(2024, 6, 1, 0, 0, 0)));
        assert!(!window.contains(&ymd_hms(2024, 4, 30, 23, 59, 59)));
    }

    #[test]
    fn open_ended_windows() {
        let from = DateWindow::new(Some(ymd(2024, 5, 1)), None).unwrap();
        assert!(from.contains(&ymd_hms(2099, 1, 1, 0, 0, 0)));
        assert!(!from.contains(&ymd_hms(2024, 4, 30, 0, 0, 0)));

        let until = DateWindow::new(None, Some(ymd(2024, 5, 1))).unwrap();
        assert!(until.contains(&ymd_hms(1999, 1, 1, 0, 0, 0)));
        assert!(!until.contains(&ymd_hms(2024, 5, 2, 0, 0, 0)));

        assert!(DateWindow::unbounded().is_unrestricted());
    }

    #[test]
    fn rejects_inverted_window_and_bad_bounds() {
        assert!(matches!(
            DateWindow::between(ymd(2024, 5, 2), ymd(2024, 5, 1)),
            Err(EngineError::InvalidWindow { .. })
        ));
        assert!(matches!(
            DateWindow::from_strs(Some("soon"), None),
            Err(EngineError::InvalidDate { field: "startDate", .. })
        ));
        let window = DateWindow::from_strs(Some("01/05/2024"), Some(" ")).unwrap();
        assert_eq!(window.start, Some(ymd(2024, 5, 1)));
        assert_eq!(window.end, None);
    }

    #[test]
    fn contains_raw_excludes_unparseable() {
        let window = DateWindow::unbounded();
        assert!(window.contains_raw("2024-05-01"));
        assert!(!window.contains_raw("pending"));
    }
}
