//! Time-range presets used by the dashboard filters

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::dates::DateWindow;
use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "30d")]
    Last30Days,
    /// Month to date
    #[serde(rename = "month")]
    Month,
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "custom")]
    Custom,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Last7Days => "7d",
            Self::Last30Days => "30d",
            Self::Month => "month",
            Self::All => "all",
            Self::Custom => "custom",
        }
    }

    /// Resolve to an inclusive window relative to `today`
    ///
    /// `custom` takes the caller's bounds; with neither bound it falls back
    /// to `today`.
    pub fn resolve(
        &self,
        today: NaiveDate,
        custom_start: Option<&str>,
        custom_end: Option<&str>,
    ) -> EngineResult<DateWindow> {
        let trailing = |days: u64| -> EngineResult<DateWindow> {
            let start = today.checked_sub_days(Days::new(days - 1)).unwrap_or(NaiveDate::MIN);
            DateWindow::between(start, today)
        };
        match self {
            Self::Today => DateWindow::between(today, today),
            Self::Last7Days => trailing(7),
            Self::Last30Days => trailing(30),
            Self::Month => DateWindow::between(today.with_day(1).unwrap_or(today), today),
            Self::All => Ok(DateWindow::unbounded()),
            Self::Custom => {
                let window = DateWindow::from_strs(custom_start, custom_end)?;
                if window.is_unrestricted() {
                    DateWindow::between(today, today)
                } else {
                    Ok(window)
                }
            }
        }
    }
}

impl FromStr for TimeRange {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(Self::Today),
            "7d" | "week" => Ok(Self::Last7Days),
            "30d" => Ok(Self::Last30Days),
            "month" => Ok(Self::Month),
            "all" | "" => Ok(Self::All),
            "custom" => Ok(Self::Custom),
            other => Err(EngineError::UnknownTimeRange(other.to_string())),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
