//! Dates in the Solar Hijri calendar, with leap years taken from a table.
//!
//! A [`SolarDate`] is a linear day offset; its year, month and day are derived
//! from that offset through the leap-year table. Dates can also be assembled
//! from a partial set of fields with [`FieldResolver`].

mod arithmetic;
mod consts;
mod convert;
mod field;
mod leap;
mod prelude;
mod resolve;
mod types;
mod underlying;

pub use consts::*;
pub use convert::{linear_from_year_day, to_civil, to_linear};
pub use field::{Field, FieldValues, Strictness};
pub use leap::{LeapYearTable, leap_years};
pub use resolve::FieldResolver;
pub use types::{CivilDate, Day, Era, Month, Year, days_in_month};
pub use underlying::LinearCalendar;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Error type for every date operation in this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// A field value is outside its valid range in context.
    #[error("Invalid value for {field}: {value} (valid values {min}..={max})")]
    InvalidFieldValue {
        field: Field,
        value: i64,
        min:   i64,
        max:   i64,
    },

    /// Era value other than 0 (BH) or 1 (AH).
    #[error("Invalid era: {0} (must be 0 or 1)")]
    InvalidEra(i64),

    /// A resolved or derived value disagrees with one given explicitly.
    #[error("Conflicting {field}: expected {expected}, found {actual}")]
    DateMismatch {
        field:    Field,
        expected: i64,
        actual:   i64,
    },

    /// Field name outside the set this calendar understands.
    #[error("Unsupported field: {0}")]
    UnsupportedField(String),

    /// Year the leap-year table does not cover.
    #[error("Year {0} is outside the leap-year table ({min}..={max})", min = MIN_YEAR, max = MAX_YEAR)]
    OutOfTableRange(i64),

    /// Linear day offset past either end of the leap-year table.
    #[error("Day offset {0} is outside the leap-year table (0..={max})", max = MAX_LINEAR_DAY)]
    OffsetOutOfRange(i64),

    #[error("Date arithmetic overflowed")]
    Overflow,

    /// The fields given do not locate a single day.
    #[error("Not enough fields to resolve a date")]
    Incomplete,

    #[error("Invalid date format: {0}")]
    InvalidFormat(String),
}

impl DateError {
    pub(crate) const fn invalid(field: Field, value: i64, min: i64, max: i64) -> Self {
        Self::InvalidFieldValue { field, value, min, max }
    }
}

/// A date in the Solar Hijri calendar.
///
/// The linear day offset is canonical: equality, ordering and hashing use it
/// alone. The civil fields are derived from it once, at construction.
#[derive(Debug, Clone, Copy)]
pub struct SolarDate {
    offset: i64,
    civil:  CivilDate,
}

impl SolarDate {
    /// 1 Farvardin 0, offset 0
    pub const MIN: Self = Self {
        offset: 0,
        civil:  CivilDate {
            year:        Year::MIN,
            month:       Month::FARVARDIN,
            day:         Day::FIRST,
            day_of_year: 1,
        },
    };

    /// 30 Esfand 1483, the last day the leap-year table covers
    pub const MAX: Self = Self {
        offset: MAX_LINEAR_DAY,
        civil:  CivilDate {
            year:        Year::MAX,
            month:       Month::ESFAND,
            day:         Day::LEAP_YEAR_END,
            day_of_year: 366,
        },
    };

    /// Creates a date from its linear day offset.
    ///
    /// # Errors
    /// Returns `DateError::OffsetOutOfRange` if the offset falls outside the
    /// leap-year table.
    pub fn from_linear_day(offset: i64) -> Result<Self, DateError> {
        let civil = convert::to_civil(offset)?;
        Ok(Self { offset, civil })
    }

    /// Creates a date from proleptic year, month and day.
    ///
    /// # Errors
    /// Returns `DateError::OutOfTableRange` for an uncovered year and
    /// `DateError::InvalidFieldValue` for a month or day out of range.
    pub fn from_civil(year: i64, month: i64, day: i64) -> Result<Self, DateError> {
        let year = Year::new(year)?;
        let month = Month::new(month)?;
        let day = Day::new(day, year, month)?;
        Ok(Self::from_validated(year, month, day))
    }

    /// Creates a date from year and 1-based day-of-year.
    ///
    /// # Errors
    /// Returns `DateError::InvalidFieldValue` if `day_of_year` is past the end
    /// of the year.
    pub fn from_year_day(year: i64, day_of_year: i64) -> Result<Self, DateError> {
        let offset = convert::linear_from_year_day(Year::new(year)?, day_of_year)?;
        Self::from_linear_day(offset)
    }

    /// Creates a date from era, year-of-era, month and day.
    ///
    /// # Errors
    /// As [`SolarDate::from_civil`].
    pub fn from_era(era: Era, year_of_era: i64, month: i64, day: i64) -> Result<Self, DateError> {
        Self::from_civil(era.proleptic_year(year_of_era)?, month, day)
    }

    /// Creates a date from a Unix epoch day (1970-01-01 = 0).
    ///
    /// # Errors
    /// Returns `DateError::OffsetOutOfRange` if the day is outside the table,
    /// `DateError::Overflow` if it cannot be shifted onto the solar epoch.
    pub fn from_epoch_day(epoch_day: i64) -> Result<Self, DateError> {
        let offset = epoch_day
            .checked_sub(SOLAR_EPOCH_DAY)
            .ok_or(DateError::Overflow)?;
        Self::from_linear_day(offset)
    }

    /// Creates a date from the same day in an underlying calendar.
    ///
    /// # Errors
    /// Returns `DateError::OffsetOutOfRange` if the day is outside the table.
    pub fn from_underlying<C: LinearCalendar>(date: C) -> Result<Self, DateError> {
        Self::from_epoch_day(date.to_epoch_day())
    }

    /// Today's date from the system clock, in the local time zone.
    ///
    /// # Errors
    /// Returns `DateError::OffsetOutOfRange` past the end of the table.
    pub fn today() -> Result<Self, DateError> {
        Self::from_underlying(Local::now().date_naive())
    }

    /// Resolves a set of fields into a date; see [`FieldResolver`].
    ///
    /// # Errors
    /// Returns `DateError::Incomplete` if the fields do not locate a day, or
    /// whatever validation error the resolver raises.
    pub fn from_fields(values: &FieldValues, strictness: Strictness) -> Result<Self, DateError> {
        FieldResolver::new(strictness)
            .resolve(values)?
            .ok_or(DateError::Incomplete)
    }

    pub(crate) fn from_validated(year: Year, month: Month, day: Day) -> Self {
        let offset = convert::to_linear(year, month, day);
        let day_of_year = offset - convert::year_start(year) + 1;
        Self {
            offset,
            civil: CivilDate {
                year,
                month,
                day,
                // at most 366
                day_of_year: u16::try_from(day_of_year).unwrap_or(u16::MAX),
            },
        }
    }

    /// Same day expressed in an underlying calendar.
    ///
    /// # Errors
    /// Returns `DateError::Overflow` if `C` cannot represent the day.
    pub fn to_underlying<C: LinearCalendar>(self) -> Result<C, DateError> {
        C::from_epoch_day(self.epoch_day())
    }

    /// Same day in the proleptic ISO calendar.
    ///
    /// # Errors
    /// Returns `DateError::Overflow` if chrono cannot represent the day.
    pub fn to_iso(self) -> Result<NaiveDate, DateError> {
        self.to_underlying()
    }

    /// Days since 1 Farvardin 0
    pub const fn linear_day(self) -> i64 {
        self.offset
    }

    /// Days since 1970-01-01
    pub const fn epoch_day(self) -> i64 {
        self.offset + SOLAR_EPOCH_DAY
    }

    pub const fn civil(self) -> CivilDate {
        self.civil
    }

    pub const fn year(self) -> i32 {
        self.civil.year.get()
    }

    pub const fn month(self) -> u8 {
        self.civil.month.get()
    }

    pub const fn day(self) -> u8 {
        self.civil.day.get()
    }

    pub const fn day_of_year(self) -> u16 {
        self.civil.day_of_year
    }

    pub const fn year_typed(self) -> Year {
        self.civil.year
    }

    pub const fn month_typed(self) -> Month {
        self.civil.month
    }

    pub const fn day_typed(self) -> Day {
        self.civil.day
    }

    pub const fn era(self) -> Era {
        self.civil.year.era()
    }

    pub const fn year_of_era(self) -> i32 {
        self.civil.year.year_of_era()
    }

    /// ISO numbering, Monday = 1 through Sunday = 7
    pub const fn day_of_week(self) -> u8 {
        // 1970-01-01 was a Thursday
        (self.epoch_day() + 3).rem_euclid(7) as u8 + 1
    }

    pub fn is_leap_year(self) -> bool {
        self.civil.year.is_leap()
    }

    pub fn length_of_month(self) -> u8 {
        days_in_month(self.civil.year, self.civil.month)
    }

    pub fn length_of_year(self) -> i64 {
        self.civil.year.length()
    }

    /// Converts to storage columns: (year, month, day)
    pub const fn to_columns(self) -> (i32, u8, u8) {
        (self.year(), self.month(), self.day())
    }

    /// Creates from storage columns: (year, month, day), with full validation.
    ///
    /// # Errors
    /// As [`SolarDate::from_civil`].
    pub fn from_columns(year: i32, month: u8, day: u8) -> Result<Self, DateError> {
        Self::from_civil(year.into(), month.into(), day.into())
    }
}

impl PartialEq for SolarDate {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset
    }
}

impl Eq for SolarDate {}

impl Hash for SolarDate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.offset.hash(state);
    }
}

impl PartialOrd for SolarDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SolarDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.offset.cmp(&other.offset)
    }
}

impl fmt::Display for SolarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year(), self.month(), self.day())
    }
}

impl FromStr for SolarDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).map(str::trim).collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(DateError::InvalidFormat(format!(
                "Expected YYYY{DATE_SEPARATOR}MM{DATE_SEPARATOR}DD, found {trimmed:?}"
            )));
        };
        let number = |part: &str| {
            part.parse::<i64>()
                .map_err(|_| DateError::InvalidFormat(part.to_owned()))
        };
        Self::from_civil(number(*year)?, number(*month)?, number(*day)?)
    }
}

impl TryFrom<NaiveDate> for SolarDate {
    type Error = DateError;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        Self::from_underlying(date)
    }
}

impl TryFrom<(i32, u8, u8)> for SolarDate {
    type Error = DateError;

    fn try_from(value: (i32, u8, u8)) -> Result<Self, Self::Error> {
        Self::from_columns(value.0, value.1, value.2)
    }
}

impl Serialize for SolarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SolarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{from_iso, iso, solar};

    #[test]
    fn test_iso_correspondence() {
        struct TestCase {
            iso:      (i32, u32, u32),
            expected: (i32, u8, u8),
        }

        let cases = [
            TestCase { iso: (1986, 8, 25), expected: (1365, 6, 3) },
            TestCase { iso: (2017, 3, 20), expected: (1395, 12, 30) },
            TestCase { iso: (2017, 3, 21), expected: (1396, 1, 1) },
            TestCase { iso: (2018, 10, 30), expected: (1397, 8, 8) },
            TestCase { iso: (1871, 9, 22), expected: (1250, 6, 31) },
            TestCase { iso: (1871, 9, 23), expected: (1250, 7, 1) },
            TestCase { iso: (1911, 9, 23), expected: (1290, 6, 31) },
            TestCase { iso: (1911, 9, 24), expected: (1290, 7, 1) },
            TestCase { iso: (2019, 3, 20), expected: (1397, 12, 29) },
            TestCase { iso: (2019, 3, 21), expected: (1398, 1, 1) },
            TestCase { iso: (2019, 4, 21), expected: (1398, 2, 1) },
            TestCase { iso: (1947, 3, 21), expected: (1325, 12, 30) },
            TestCase { iso: (1947, 3, 22), expected: (1326, 1, 1) },
            TestCase { iso: (2020, 11, 7), expected: (1399, 8, 17) },
            TestCase { iso: (1981, 9, 21), expected: (1360, 6, 30) },
            TestCase { iso: (2018, 3, 21), expected: (1397, 1, 1) },
            TestCase { iso: (2018, 10, 1), expected: (1397, 7, 9) },
            TestCase { iso: (2018, 10, 23), expected: (1397, 8, 1) },
            TestCase { iso: (1970, 1, 1), expected: (1348, 10, 11) },
            TestCase { iso: (622, 3, 22), expected: (1, 1, 1) },
        ];

        for case in &cases {
            let (y, m, d) = case.iso;
            let date = from_iso(y, m, d);
            assert_eq!(date.to_columns(), case.expected, "ISO {y:04}-{m:02}-{d:02}");
            assert_eq!(date.to_iso(), Ok(iso(y, m, d)));
        }
    }

    #[test]
    fn test_october_2018_is_mehr_1397() {
        let date = from_iso(2018, 10, 2);
        assert_eq!(date.year(), 1397);
        assert_eq!(date.month(), 7);
    }

    #[test]
    fn test_from_civil_validation() {
        assert!(SolarDate::from_civil(1397, 6, 31).is_ok());
        assert!(matches!(
            SolarDate::from_civil(1397, 7, 31),
            Err(DateError::InvalidFieldValue { field: Field::DayOfMonth, max: 30, .. })
        ));
        assert!(matches!(
            SolarDate::from_civil(1396, 12, 30),
            Err(DateError::InvalidFieldValue { field: Field::DayOfMonth, max: 29, .. })
        ));
        assert!(SolarDate::from_civil(1395, 12, 30).is_ok());
        assert!(matches!(
            SolarDate::from_civil(1397, 13, 1),
            Err(DateError::InvalidFieldValue { field: Field::MonthOfYear, .. })
        ));
        assert_eq!(SolarDate::from_civil(1484, 1, 1), Err(DateError::OutOfTableRange(1484)));
        assert_eq!(SolarDate::from_civil(-1, 1, 1), Err(DateError::OutOfTableRange(-1)));
    }

    #[test]
    fn test_min_max_constants() {
        assert_eq!(SolarDate::from_linear_day(0), Ok(SolarDate::MIN));
        assert_eq!(SolarDate::MIN.civil(), solar(0, 1, 1).civil());
        assert_eq!(SolarDate::from_linear_day(MAX_LINEAR_DAY), Ok(SolarDate::MAX));
        assert_eq!(SolarDate::MAX.civil(), solar(1483, 12, 30).civil());
        assert_eq!(SolarDate::MAX.to_iso(), Ok(iso(2105, 3, 20)));
        assert_eq!(SolarDate::MIN.to_iso(), Ok(iso(621, 3, 22)));
    }

    #[test]
    fn test_out_of_range_underlying_dates() {
        assert_eq!(
            SolarDate::try_from(iso(621, 3, 21)),
            Err(DateError::OffsetOutOfRange(-1))
        );
        assert_eq!(
            SolarDate::try_from(iso(2105, 3, 21)),
            Err(DateError::OffsetOutOfRange(MAX_LINEAR_DAY + 1))
        );
    }

    #[test]
    fn test_extreme_epoch_days() {
        // shifting onto the solar epoch adds 492_632 days
        assert_eq!(SolarDate::from_epoch_day(i64::MAX), Err(DateError::Overflow));
        assert_eq!(
            SolarDate::from_epoch_day(i64::MIN),
            Err(DateError::OffsetOutOfRange(i64::MIN - SOLAR_EPOCH_DAY))
        );
    }

    #[test]
    fn test_from_year_day() {
        assert_eq!(SolarDate::from_year_day(1397, 1), Ok(solar(1397, 1, 1)));
        assert_eq!(SolarDate::from_year_day(1397, 187), Ok(solar(1397, 7, 1)));
        assert_eq!(SolarDate::from_year_day(1395, 366), Ok(solar(1395, 12, 30)));
        assert!(SolarDate::from_year_day(1396, 366).is_err());
    }

    #[test]
    fn test_eras() {
        let date = solar(1397, 6, 31);
        assert_eq!(date.era(), Era::Ah);
        assert_eq!(date.year_of_era(), 1397);
        assert_eq!(SolarDate::from_era(Era::Ah, 1397, 6, 31), Ok(date));

        let before = SolarDate::from_era(Era::Bh, 1, 12, 29).unwrap();
        assert_eq!(before.year(), 0);
        assert_eq!(before.era(), Era::Bh);
        assert_eq!(before.year_of_era(), 1);
        assert_eq!(SolarDate::from_era(Era::Bh, 2, 1, 1), Err(DateError::OutOfTableRange(-1)));
    }

    #[test]
    fn test_lengths() {
        let leap = solar(1395, 12, 1);
        assert!(leap.is_leap_year());
        assert_eq!(leap.length_of_month(), 30);
        assert_eq!(leap.length_of_year(), 366);

        let common = solar(1396, 12, 1);
        assert!(!common.is_leap_year());
        assert_eq!(common.length_of_month(), 29);
        assert_eq!(common.length_of_year(), 365);

        assert_eq!(solar(1396, 6, 1).length_of_month(), 31);
        assert_eq!(solar(1396, 7, 1).length_of_month(), 30);
    }

    #[test]
    fn test_day_of_week() {
        // ISO 2018-10-01 was a Monday
        assert_eq!(from_iso(2018, 10, 1).day_of_week(), 1);
        assert_eq!(from_iso(1970, 1, 1).day_of_week(), 4);
        assert_eq!(from_iso(1986, 8, 24).day_of_week(), 7);
    }

    #[test]
    fn test_equality_and_ordering_follow_offset() {
        let a = solar(1397, 6, 31);
        let b = solar(1397, 7, 1);
        assert!(a < b);
        assert_eq!(a.linear_day() + 1, b.linear_day());
        assert_eq!(a, SolarDate::from_linear_day(a.linear_day()).unwrap());
        assert_eq!(a.cmp(&a), Ordering::Equal);
    }

    #[test]
    fn test_monotonic_over_whole_table() {
        let mut previous = SolarDate::MIN;
        for offset in 1..=MAX_LINEAR_DAY {
            let current = SolarDate::from_linear_day(offset).unwrap();
            assert!(previous < current);
            assert!(previous.to_columns() < current.to_columns(), "offset {offset}");
            previous = current;
        }
    }

    #[test]
    fn test_round_trip_through_civil() {
        for offset in (0..=MAX_LINEAR_DAY).step_by(17) {
            let date = SolarDate::from_linear_day(offset).unwrap();
            let (y, m, d) = date.to_columns();
            assert_eq!(SolarDate::from_columns(y, m, d), Ok(date));
        }
    }

    #[test]
    fn test_display_and_parse() {
        let date = solar(1397, 6, 31);
        assert_eq!(date.to_string(), "1397-06-31");
        assert_eq!("1397-06-31".parse::<SolarDate>(), Ok(date));
        assert_eq!(" 1397-6-31 ".parse::<SolarDate>(), Ok(date));
        assert_eq!(SolarDate::MIN.to_string(), "0000-01-01");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("1397-06".parse::<SolarDate>(), Err(DateError::InvalidFormat(_))));
        assert!(matches!("1397-06-31-1".parse::<SolarDate>(), Err(DateError::InvalidFormat(_))));
        assert!(matches!("1397-XX-01".parse::<SolarDate>(), Err(DateError::InvalidFormat(_))));
        assert!(matches!("".parse::<SolarDate>(), Err(DateError::InvalidFormat(_))));
        assert!(matches!(
            "1397-07-31".parse::<SolarDate>(),
            Err(DateError::InvalidFieldValue { .. })
        ));
    }

    #[test]
    fn test_serde_string_format() {
        let date = solar(1395, 12, 30);
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, r#""1395-12-30""#);
        let parsed: SolarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(date, parsed);
    }

    #[test]
    fn test_serde_validation() {
        let result: Result<SolarDate, _> = serde_json::from_str(r#""1396-12-30""#);
        assert!(result.is_err());

        let result: Result<SolarDate, _> = serde_json::from_str(r#""1500-01-01""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_columns_round_trip() {
        let date = solar(1250, 6, 31);
        assert_eq!(date.to_columns(), (1250, 6, 31));
        assert_eq!(SolarDate::try_from((1250, 6, 31)), Ok(date));
        assert!(SolarDate::from_columns(1250, 7, 31).is_err());
    }

    #[test]
    fn test_from_fields_incomplete() {
        let values = FieldValues::new().with(Field::Year, 1397);
        assert_eq!(
            SolarDate::from_fields(&values, Strictness::Smart),
            Err(DateError::Incomplete)
        );
    }

    #[test]
    fn test_today_is_in_table() {
        let today = SolarDate::today().unwrap();
        assert!(today.year() >= 1403);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            DateError::OutOfTableRange(1500).to_string(),
            "Year 1500 is outside the leap-year table (0..=1483)"
        );
        assert_eq!(
            DateError::OffsetOutOfRange(-1).to_string(),
            "Day offset -1 is outside the leap-year table (0..=542018)"
        );
        assert_eq!(
            DateError::invalid(Field::DayOfMonth, 32, 1, 31).to_string(),
            "Invalid value for day-of-month: 32 (valid values 1..=31)"
        );
    }
}
