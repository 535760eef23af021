//! Accounting cycle representation
//!
//! A cycle is defined by a start date and a type (weekly, monthly, yearly).
//! The cycle type alone determines the display label and the start of the
//! following cycle.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of an accounting cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CycleType {
    /// Seven days from the start date
    Weekly,
    /// One calendar month from the start date (default)
    #[default]
    Monthly,
    /// One calendar year from the start date
    Yearly,
}

impl CycleType {
    /// All cycle types in display order
    pub const ALL: &'static [CycleType] = &[Self::Weekly, Self::Monthly, Self::Yearly];

    /// Lowercase identifier, also the persisted form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Human-readable description used in settings output
    pub fn description(&self) -> &'static str {
        match self {
            Self::Weekly => "Weekly (7 days)",
            Self::Monthly => "Monthly (Calendar month)",
            Self::Yearly => "Yearly (365 days)",
        }
    }

    /// Display label for the cycle starting on `start`
    ///
    /// - Weekly: "Week of Jan 15 - Jan 21"
    /// - Monthly: "January 2024"
    /// - Yearly: "Year 2024"
    pub fn label(&self, start: NaiveDate) -> String {
        match self {
            Self::Weekly => {
                let end = start.checked_add_days(Days::new(6)).unwrap_or(start);
                format!(
                    "Week of {} - {}",
                    start.format("%b %-d"),
                    end.format("%b %-d")
                )
            }
            Self::Monthly => start.format("%B %Y").to_string(),
            Self::Yearly => format!("Year {}", start.year()),
        }
    }

    /// Start date of the cycle that follows the one starting on `start`
    ///
    /// Monthly and yearly steps keep the day of month. When that day does not
    /// exist in the target month the surplus days roll into the next month,
    /// so Jan 31 advances to Mar 2 (Mar 3 in non-leap years) and Feb 29
    /// advances to Mar 1 of the following year. Always strictly later than
    /// `start`.
    pub fn next_start(&self, start: NaiveDate) -> NaiveDate {
        match self {
            Self::Weekly => start
                .checked_add_days(Days::new(7))
                .unwrap_or(NaiveDate::MAX),
            Self::Monthly => add_months_with_rollover(start, 1),
            Self::Yearly => add_months_with_rollover(start, 12),
        }
    }

    /// Apply `next_start` `count` times
    pub fn advance(&self, start: NaiveDate, count: u32) -> NaiveDate {
        (0..count).fold(start, |date, _| self.next_start(date))
    }

    /// Last day (inclusive) of the cycle starting on `start`
    pub fn end_date(&self, start: NaiveDate) -> NaiveDate {
        self.next_start(start).pred_opt().unwrap_or(start)
    }
}

/// Today's date in local time
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Month arithmetic that overflows into the following month instead of clamping
fn add_months_with_rollover(date: NaiveDate, months: u32) -> NaiveDate {
    let surplus_days = Days::new(u64::from(date.day0()));
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(months)))
        .and_then(|first| first.checked_add_days(surplus_days))
        .unwrap_or(NaiveDate::MAX)
}

impl fmt::Display for CycleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for CycleType {
    type Err = CycleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            "yearly" | "year" | "annual" => Ok(Self::Yearly),
            _ => Err(CycleParseError::InvalidType(s.to_string())),
        }
    }
}

/// The live accounting cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleState {
    pub cycle_type: CycleType,
    pub cycle_start: NaiveDate,
}

impl CycleState {
    pub fn new(cycle_type: CycleType, cycle_start: NaiveDate) -> Self {
        Self {
            cycle_type,
            cycle_start,
        }
    }

    /// A cycle of the given type starting today
    pub fn starting_today(cycle_type: CycleType) -> Self {
        Self::new(cycle_type, today())
    }

    pub fn label(&self) -> String {
        self.cycle_type.label(self.cycle_start)
    }

    pub fn next_start(&self) -> NaiveDate {
        self.cycle_type.next_start(self.cycle_start)
    }

    pub fn end_date(&self) -> NaiveDate {
        self.cycle_type.end_date(self.cycle_start)
    }

    /// Check if a date falls within this cycle
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.cycle_start && date <= self.end_date()
    }

    /// Move the start date forward by one cycle
    pub fn advance(&mut self) -> NaiveDate {
        self.cycle_start = self.next_start();
        self.cycle_start
    }
}

/// Error type for cycle parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleParseError {
    InvalidType(String),
}

impl fmt::Display for CycleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleParseError::InvalidType(s) => write!(
                f,
                "Invalid cycle type '{}': expected weekly, monthly or yearly",
                s
            ),
        }
    }
}

impl std::error::Error for CycleParseError {}
