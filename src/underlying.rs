//! The linear calendar that anchors epoch days and performs date arithmetic.
//!
//! Month and year steps are delegated here, so end-of-month clamping and leap
//! day insertion follow this calendar's rules rather than solar ones.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::DateError;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// A calendar addressable by epoch day (1970-01-01 = 0) that can add days,
/// months and years to its own dates.
pub trait LinearCalendar: Copy {
    /// Date for the given epoch day.
    ///
    /// # Errors
    /// Returns `DateError::Overflow` if the calendar cannot represent the day.
    fn from_epoch_day(epoch_day: i64) -> Result<Self, DateError>;

    /// Epoch day of this date
    fn to_epoch_day(self) -> i64;

    /// # Errors
    /// Returns `DateError::Overflow` if the result is not representable.
    fn plus_days(self, days: i64) -> Result<Self, DateError>;

    /// Adds calendar months, clamping the day to the end of the target month.
    ///
    /// # Errors
    /// Returns `DateError::Overflow` if the result is not representable.
    fn plus_months(self, months: i64) -> Result<Self, DateError>;

    /// # Errors
    /// Returns `DateError::Overflow` if the result is not representable.
    fn plus_years(self, years: i64) -> Result<Self, DateError> {
        let months = years.checked_mul(12).ok_or(DateError::Overflow)?;
        self.plus_months(months)
    }
}

impl LinearCalendar for NaiveDate {
    fn from_epoch_day(epoch_day: i64) -> Result<Self, DateError> {
        epoch_day
            .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
            .and_then(|days| i32::try_from(days).ok())
            .and_then(Self::from_num_days_from_ce_opt)
            .ok_or(DateError::Overflow)
    }

    fn to_epoch_day(self) -> i64 {
        i64::from(self.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE
    }

    fn plus_days(self, days: i64) -> Result<Self, DateError> {
        let step = Days::new(days.unsigned_abs());
        if days >= 0 {
            self.checked_add_days(step)
        } else {
            self.checked_sub_days(step)
        }
        .ok_or(DateError::Overflow)
    }

    fn plus_months(self, months: i64) -> Result<Self, DateError> {
        let step = u32::try_from(months.unsigned_abs())
            .map(Months::new)
            .map_err(|_| DateError::Overflow)?;
        if months >= 0 {
            self.checked_add_months(step)
        } else {
            self.checked_sub_months(step)
        }
        .ok_or(DateError::Overflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::iso;

    #[test]
    fn test_epoch_day_round_trip() {
        assert_eq!(iso(1970, 1, 1).to_epoch_day(), 0);
        assert_eq!(iso(1970, 1, 2).to_epoch_day(), 1);
        assert_eq!(iso(621, 3, 22).to_epoch_day(), crate::SOLAR_EPOCH_DAY);
        assert_eq!(NaiveDate::from_epoch_day(-1), Ok(iso(1969, 12, 31)));
    }

    #[test]
    fn test_from_epoch_day_overflow() {
        assert_eq!(NaiveDate::from_epoch_day(i64::MAX), Err(DateError::Overflow));
        assert_eq!(NaiveDate::from_epoch_day(i64::from(i32::MAX)), Err(DateError::Overflow));
    }

    #[test]
    fn test_plus_months_clamps_to_month_end() {
        assert_eq!(iso(2019, 1, 31).plus_months(1), Ok(iso(2019, 2, 28)));
        assert_eq!(iso(2020, 3, 31).plus_months(-1), Ok(iso(2020, 2, 29)));
        assert_eq!(iso(2020, 2, 29).plus_years(1), Ok(iso(2021, 2, 28)));
        assert_eq!(iso(2020, 2, 29).plus_years(-4), Ok(iso(2016, 2, 29)));
    }

    #[test]
    fn test_plus_days_both_directions() {
        assert_eq!(iso(2019, 3, 20).plus_days(1), Ok(iso(2019, 3, 21)));
        assert_eq!(iso(2019, 3, 1).plus_days(-1), Ok(iso(2019, 2, 28)));
        assert_eq!(iso(2019, 3, 1).plus_days(i64::MIN), Err(DateError::Overflow));
    }

    #[test]
    fn test_plus_years_overflow() {
        assert_eq!(iso(2019, 3, 1).plus_years(i64::MAX), Err(DateError::Overflow));
        assert_eq!(iso(2019, 3, 1).plus_months(i64::from(u32::MAX) + 1), Err(DateError::Overflow));
    }
}
