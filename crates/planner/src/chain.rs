use crate::calendar::BusinessCalendar;
use chrono::NaiveDate;

/// Phase dates derived from a single molding day. Cooling runs on calendar
/// days (furnaces do not rest on weekends); molding, pouring and shakeout
/// only happen on business days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChain {
    pub molding: NaiveDate,
    pub staging: NaiveDate,
    pub pouring: NaiveDate,
    pub cooling_ends: NaiveDate,
    pub shakeout: NaiveDate,
}

impl PhaseChain {
    pub fn derive(calendar: &BusinessCalendar, molding_day: NaiveDate, cooling_days: u32) -> Self {
        let staging = calendar.add_calendar_days(molding_day, 1);
        let pouring = if calendar.is_business_day(staging) {
            staging
        } else {
            calendar.next_business_day(staging)
        };
        let cooling_ends = calendar.add_calendar_days(pouring, cooling_days as i64);
        let shakeout = if calendar.is_business_day(cooling_ends) {
            cooling_ends
        } else {
            calendar.next_business_day(cooling_ends)
        };
        Self {
            molding: molding_day,
            staging,
            pouring,
            cooling_ends,
            shakeout,
        }
    }

    /// The flask is occupied from the molding day through shakeout.
    pub fn flask_release(&self) -> NaiveDate {
        self.shakeout
    }

    /// First finishing day after the terminal shakeout.
    pub fn finishing_start(&self, calendar: &BusinessCalendar) -> NaiveDate {
        calendar.next_business_day(self.shakeout)
    }
}
