use castplan_core::Result;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::HashSet;
use std::path::Path;

/// Business-day arithmetic over the plant calendar. A business day is
/// Monday through Friday and not a holiday.
#[derive(Debug, Clone, Default)]
pub struct BusinessCalendar {
    holidays: HashSet<NaiveDate>,
}

impl BusinessCalendar {
    pub fn new(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Loads the holiday set from a YAML list of ISO dates.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let holidays: Vec<NaiveDate> = serde_yaml::from_str(text)?;
        Ok(Self::new(holidays))
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.is_holiday(date)
    }

    pub fn next_business_day(&self, date: NaiveDate) -> NaiveDate {
        let mut day = date + Duration::days(1);
        while !self.is_business_day(day) {
            day = day + Duration::days(1);
        }
        day
    }

    pub fn prev_business_day(&self, date: NaiveDate) -> NaiveDate {
        let mut day = date - Duration::days(1);
        while !self.is_business_day(day) {
            day = day - Duration::days(1);
        }
        day
    }

    /// Walks `|n|` business days from `start` in the direction of the sign
    /// of `n`, not counting `start` itself. `n = 0` returns `start`.
    pub fn add_business_days(&self, start: NaiveDate, n: i64) -> NaiveDate {
        let step = Duration::days(if n >= 0 { 1 } else { -1 });
        let mut current = start;
        let mut counted = 0;
        while counted < n.abs() {
            current = current + step;
            if self.is_business_day(current) {
                counted += 1;
            }
        }
        current
    }

    pub fn add_calendar_days(&self, start: NaiveDate, n: i64) -> NaiveDate {
        start + Duration::days(n)
    }
}
