use crate::consts::{
    DAYS_IN_COMMON_YEAR, DAYS_IN_LEAP_YEAR, DAYS_IN_MONTH, ESFAND, ESFAND_DAYS_LEAP, MAX_MONTH, MAX_YEAR,
    MIN_DAY, MIN_YEAR,
};
use crate::leap::leap_years;
use crate::{DateError, Field, prelude::*};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU8;

/// A proleptic year guaranteed to be covered by the leap-year table (`0..=1483`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Year(i32);

impl Year {
    /// The epoch year
    pub const MIN: Self = Self(MIN_YEAR);
    /// Last year covered by the leap-year table
    pub const MAX: Self = Self(MAX_YEAR);

    /// Creates a new Year, validating it against the leap-year table
    ///
    /// # Errors
    /// Returns `DateError::OutOfTableRange` if the table does not cover `value`.
    pub fn new(value: i64) -> Result<Self, DateError> {
        if !leap_years().covers(value) {
            return Err(DateError::OutOfTableRange(value));
        }
        i32::try_from(value)
            .map(Self)
            .map_err(|_| DateError::OutOfTableRange(value))
    }

    /// Returns the proleptic year value
    #[inline]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Whether this year carries a 30th day of Esfand
    pub fn is_leap(self) -> bool {
        leap_years().lists(self.into())
    }

    /// 365 or 366
    pub fn length(self) -> i64 {
        if self.is_leap() {
            DAYS_IN_LEAP_YEAR
        } else {
            DAYS_IN_COMMON_YEAR
        }
    }

    /// Era this year falls in
    pub const fn era(self) -> Era {
        if self.0 >= 1 { Era::Ah } else { Era::Bh }
    }

    /// Year number within its era: the year itself after the epoch, `1 - year` before it
    pub const fn year_of_era(self) -> i32 {
        if self.0 >= 1 { self.0 } else { 1 - self.0 }
    }
}

impl TryFrom<i64> for Year {
    type Error = DateError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Year> for i64 {
    fn from(year: Year) -> Self {
        Self::from(year.0)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A month value guaranteed to be in the range `1..=MAX_MONTH` (1..=12)
/// Uses `NonZeroU8` internally, so 0 is not a valid month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(NonZeroU8);

impl Month {
    pub const FARVARDIN: Self = Self(NonZeroU8::MIN);
    pub const ESFAND: Self = Self(NonZeroU8::MIN.saturating_add(ESFAND - 1));

    /// Creates a new Month, validating that it's non-zero and <= `MAX_MONTH`
    ///
    /// # Errors
    /// Returns `DateError::InvalidFieldValue` if the value is 0 or > `MAX_MONTH`.
    pub fn new(value: i64) -> Result<Self, DateError> {
        let invalid = || DateError::invalid(Field::MonthOfYear, value, 1, i64::from(MAX_MONTH));
        let narrowed = u8::try_from(value).map_err(|_| invalid())?;
        let non_zero = NonZeroU8::new(narrowed).ok_or_else(invalid)?;
        if narrowed > MAX_MONTH {
            return Err(invalid());
        }
        Ok(Self(non_zero))
    }

    /// Returns the month value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Month {
    type Error = DateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value.into())
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0.get()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A day value guaranteed to be valid for a given year and month
/// Uses `NonZeroU8` internally, so 0 is not a valid day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Day(NonZeroU8);

impl Day {
    pub const FIRST: Self = Self(NonZeroU8::MIN);
    /// 30 Esfand, the last day of a leap year
    pub(crate) const LEAP_YEAR_END: Self = Self(NonZeroU8::MIN.saturating_add(ESFAND_DAYS_LEAP - 1));

    /// Creates a new Day, validating that it's non-zero and valid for the given year and month
    ///
    /// # Errors
    /// Returns `DateError::InvalidFieldValue` if the value is 0 or past the end of the month.
    pub fn new(value: i64, year: Year, month: Month) -> Result<Self, DateError> {
        let max_day = days_in_month(year, month);
        let invalid = || DateError::invalid(Field::DayOfMonth, value, 1, i64::from(max_day));
        let narrowed = u8::try_from(value).map_err(|_| invalid())?;
        let non_zero = NonZeroU8::new(narrowed).ok_or_else(invalid)?;
        if narrowed > max_day {
            return Err(invalid());
        }
        Ok(Self(non_zero))
    }

    /// Returns the day value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Day {
    type Error = DateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        // Can't validate without year/month context, so just check the longest month
        let max_day = DAYS_IN_MONTH[1];
        NonZeroU8::new(value)
            .filter(|_| value <= max_day)
            .map(Self)
            .ok_or_else(|| {
                DateError::invalid(Field::DayOfMonth, value.into(), MIN_DAY.into(), max_day.into())
            })
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.0.get()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Civil decomposition of a linear day offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CivilDate {
    pub year:        Year,
    pub month:       Month,
    pub day:         Day,
    /// 1-based position within the year
    pub day_of_year: u16,
}

/// The two eras of the calendar, split at 1 Farvardin 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
pub enum Era {
    /// Before Hijrah: proleptic years `<= 0`
    #[display(fmt = "BH")]
    Bh,
    /// After Hijrah: proleptic years `>= 1`
    #[display(fmt = "AH")]
    Ah,
}

impl Era {
    /// Era from its numeric field value (0 = BH, 1 = AH).
    ///
    /// # Errors
    /// Returns `DateError::InvalidEra` for any other value.
    pub const fn of(value: i64) -> Result<Self, DateError> {
        match value {
            0 => Ok(Self::Bh),
            1 => Ok(Self::Ah),
            _ => Err(DateError::InvalidEra(value)),
        }
    }

    /// Numeric field value (0 = BH, 1 = AH)
    pub const fn value(self) -> i64 {
        match self {
            Self::Bh => 0,
            Self::Ah => 1,
        }
    }

    /// Proleptic year of `year_of_era` in this era.
    ///
    /// # Errors
    /// Returns `DateError::Overflow` if the year cannot be represented.
    pub fn proleptic_year(self, year_of_era: i64) -> Result<i64, DateError> {
        match self {
            Self::Ah => Ok(year_of_era),
            Self::Bh => 1_i64.checked_sub(year_of_era).ok_or(DateError::Overflow),
        }
    }
}

// Helper functions

/// Length of `month` in `year`: 31 for the first six months, 30 for the next
/// five, 29 or 30 for Esfand depending on the leap-year table.
pub fn days_in_month(year: Year, month: Month) -> u8 {
    if month.get() == ESFAND && year.is_leap() {
        ESFAND_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month.get() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_new_valid() {
        assert!(Year::new(0).is_ok());
        assert!(Year::new(1397).is_ok());
        assert!(Year::new(MAX_YEAR.into()).is_ok());
    }

    #[test]
    fn test_year_new_out_of_table() {
        assert_eq!(Year::new(-1), Err(DateError::OutOfTableRange(-1)));
        assert_eq!(Year::new(1484), Err(DateError::OutOfTableRange(1484)));
        assert_eq!(Year::new(i64::MIN), Err(DateError::OutOfTableRange(i64::MIN)));
    }

    #[test]
    fn test_year_era() {
        let year = Year::new(1397).unwrap();
        assert_eq!(year.era(), Era::Ah);
        assert_eq!(year.year_of_era(), 1397);

        let year = Year::new(MIN_YEAR.into()).unwrap();
        assert_eq!(year.era(), Era::Bh);
        assert_eq!(year.year_of_era(), 1);
    }

    #[test]
    fn test_year_length() {
        assert_eq!(Year::new(1395).unwrap().length(), 366);
        assert_eq!(Year::new(1396).unwrap().length(), 365);
        assert_eq!(Year::new(0).unwrap().length(), 365);
    }

    #[test]
    fn test_year_serde() {
        let year = Year::new(1397).unwrap();
        let json = serde_json::to_string(&year).unwrap();
        assert_eq!(json, "1397");

        let parsed: Year = serde_json::from_str(&json).unwrap();
        assert_eq!(year, parsed);

        let result: Result<Year, _> = serde_json::from_str("1500");
        assert!(result.is_err());
    }

    #[test]
    fn test_month_new_valid() {
        for m in 1..=12 {
            assert!(Month::new(m).is_ok(), "Month {m} should be valid");
        }
    }

    #[test]
    fn test_month_new_invalid() {
        for value in [0, 13, 255, -1, 1 << 40] {
            assert_eq!(
                Month::new(value),
                Err(DateError::InvalidFieldValue {
                    field: Field::MonthOfYear,
                    value,
                    min: 1,
                    max: 12,
                })
            );
        }
    }

    #[test]
    fn test_month_serde() {
        let month = Month::new(6).unwrap();
        let json = serde_json::to_string(&month).unwrap();
        assert_eq!(json, "6");

        let parsed: Month = serde_json::from_str(&json).unwrap();
        assert_eq!(month, parsed);
    }

    #[test]
    fn test_day_new() {
        let leap = Year::new(1395).unwrap();
        let common = Year::new(1396).unwrap();
        let month = |m| Month::new(m).unwrap();

        // First half - 31 days
        assert!(Day::new(31, common, month(1)).is_ok());
        assert!(Day::new(31, common, month(6)).is_ok());
        assert!(Day::new(32, common, month(6)).is_err());

        // Second half - 30 days
        assert!(Day::new(30, common, month(7)).is_ok());
        assert!(Day::new(31, common, month(7)).is_err());

        // Esfand
        assert!(Day::new(29, common, month(12)).is_ok());
        assert!(Day::new(30, common, month(12)).is_err());
        assert!(Day::new(30, leap, month(12)).is_ok());
        assert!(Day::new(31, leap, month(12)).is_err());

        assert!(Day::new(0, leap, month(1)).is_err());
    }

    #[test]
    fn test_day_invalid_reports_month_length() {
        let result = Day::new(30, Year::new(1396).unwrap(), Month::new(12).unwrap());
        assert_eq!(
            result,
            Err(DateError::InvalidFieldValue {
                field: Field::DayOfMonth,
                value: 30,
                min:   1,
                max:   29,
            })
        );
    }

    #[test]
    fn test_day_try_from_u8() {
        let day: Day = 31.try_into().unwrap();
        assert_eq!(day.get(), 31);

        assert!(Day::try_from(0).is_err());
        assert!(Day::try_from(32).is_err());
    }

    #[test]
    fn test_days_in_month_all_months() {
        let leap = Year::new(1399).unwrap();
        let common = Year::new(1400).unwrap();
        let expected = [0, 31, 31, 31, 31, 31, 31, 30, 30, 30, 30, 30, 29];
        for m in 1..=12u8 {
            let month = Month::new(m.into()).unwrap();
            assert_eq!(days_in_month(common, month), expected[m as usize], "Month {m}");
        }
        assert_eq!(days_in_month(leap, Month::new(12).unwrap()), 30);
    }

    #[test]
    fn test_month_lengths_sum_to_year_length() {
        for y in MIN_YEAR..=MAX_YEAR {
            let year = Year::new(y.into()).unwrap();
            let total: i64 = (1..=12)
                .map(|m| i64::from(days_in_month(year, Month::new(m).unwrap())))
                .sum();
            assert_eq!(total, year.length(), "year {y}");
            assert_eq!(year.length() == 366, year.is_leap(), "year {y}");
        }
    }

    #[test]
    fn test_era_values() {
        assert_eq!(Era::of(0), Ok(Era::Bh));
        assert_eq!(Era::of(1), Ok(Era::Ah));
        assert_eq!(Era::of(2), Err(DateError::InvalidEra(2)));
        assert_eq!(Era::Ah.value(), 1);
        assert_eq!(Era::Bh.to_string(), "BH");
        assert_eq!(Era::Bh.proleptic_year(1), Ok(0));
        assert_eq!(Era::Bh.proleptic_year(i64::MIN), Err(DateError::Overflow));
        assert_eq!(Era::Ah.proleptic_year(1397), Ok(1397));
    }
}
