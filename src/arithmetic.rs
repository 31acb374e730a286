//! Field reads, field writes and date arithmetic.
//!
//! Day, month and year steps run in the underlying calendar and the result is
//! decoded again, so `plus_months` follows that calendar's month lengths and
//! end-of-month clamping. Writes to a single solar field stay in solar terms.

use std::ops::RangeInclusive;

use chrono::NaiveDate;

use crate::consts::{
    DAYS_PER_WEEK, MAX_ALIGNED_WEEK_OF_MONTH, MAX_ALIGNED_WEEK_OF_YEAR, MAX_LINEAR_DAY, MAX_MONTH, MAX_YEAR,
    MIN_YEAR, SOLAR_EPOCH_DAY,
};
use crate::types::{Day, Era, Month, Year, days_in_month};
use crate::{DateError, Field, FieldValues, LinearCalendar, SolarDate};

impl SolarDate {
    /// Moves this date into the underlying calendar `C`, applies `step`
    /// there and decodes the result.
    ///
    /// # Errors
    /// Propagates the step's error, or `DateError::OffsetOutOfRange` if the
    /// result leaves the leap-year table.
    pub fn via<C: LinearCalendar>(
        self,
        step: impl FnOnce(C) -> Result<C, DateError>,
    ) -> Result<Self, DateError> {
        Self::from_underlying(step(self.to_underlying::<C>()?)?)
    }

    /// # Errors
    /// Returns `DateError::OffsetOutOfRange` if the result leaves the table,
    /// `DateError::Overflow` if the step itself overflows.
    pub fn plus_days(self, days: i64) -> Result<Self, DateError> {
        self.via(|date: NaiveDate| date.plus_days(days))
    }

    /// # Errors
    /// As [`SolarDate::plus_days`].
    pub fn minus_days(self, days: i64) -> Result<Self, DateError> {
        self.plus_days(days.checked_neg().ok_or(DateError::Overflow)?)
    }

    /// Adds ISO months. The day is clamped to the end of the ISO month
    /// reached, then decoded back to the solar calendar.
    ///
    /// # Errors
    /// As [`SolarDate::plus_days`].
    pub fn plus_months(self, months: i64) -> Result<Self, DateError> {
        self.via(|date: NaiveDate| date.plus_months(months))
    }

    /// # Errors
    /// As [`SolarDate::plus_days`].
    pub fn minus_months(self, months: i64) -> Result<Self, DateError> {
        self.plus_months(months.checked_neg().ok_or(DateError::Overflow)?)
    }

    /// Adds ISO years, clamping 29 February to 28 February in common years.
    ///
    /// # Errors
    /// As [`SolarDate::plus_days`].
    pub fn plus_years(self, years: i64) -> Result<Self, DateError> {
        self.via(|date: NaiveDate| date.plus_years(years))
    }

    /// # Errors
    /// As [`SolarDate::plus_days`].
    pub fn minus_years(self, years: i64) -> Result<Self, DateError> {
        self.plus_years(years.checked_neg().ok_or(DateError::Overflow)?)
    }

    /// Value of `field` for this date.
    pub fn get(self, field: Field) -> i64 {
        let day = i64::from(self.day());
        let day_of_year = i64::from(self.day_of_year());
        match field {
            Field::Era => self.era().value(),
            Field::Year => self.year().into(),
            Field::YearOfEra => self.year_of_era().into(),
            Field::ProlepticMonth => i64::from(self.year()) * 12 + i64::from(self.month()) - 1,
            Field::MonthOfYear => self.month().into(),
            Field::DayOfMonth => day,
            Field::DayOfYear => day_of_year,
            Field::AlignedWeekOfMonth => (day - 1) / DAYS_PER_WEEK + 1,
            Field::AlignedDayOfWeekInMonth => (day - 1) % DAYS_PER_WEEK + 1,
            Field::AlignedWeekOfYear => (day_of_year - 1) / DAYS_PER_WEEK + 1,
            Field::AlignedDayOfWeekInYear => (day_of_year - 1) % DAYS_PER_WEEK + 1,
            Field::DayOfWeek => self.day_of_week().into(),
            Field::EpochDay => self.epoch_day(),
        }
    }

    /// Values of `fields` for this date.
    pub fn to_fields(self, fields: &[Field]) -> FieldValues {
        fields.iter().map(|&field| (field, self.get(field))).collect()
    }

    /// Valid values of `field` in the context of this date.
    pub fn range(self, field: Field) -> RangeInclusive<i64> {
        match field {
            Field::Era => Era::Bh.value()..=Era::Ah.value(),
            Field::Year => i64::from(MIN_YEAR)..=i64::from(MAX_YEAR),
            Field::YearOfEra => match self.era() {
                Era::Ah => 1..=i64::from(MAX_YEAR),
                Era::Bh => 1..=1 - i64::from(MIN_YEAR),
            },
            Field::ProlepticMonth => i64::from(MIN_YEAR) * 12..=i64::from(MAX_YEAR) * 12 + 11,
            Field::MonthOfYear => 1..=i64::from(MAX_MONTH),
            Field::DayOfMonth => 1..=i64::from(self.length_of_month()),
            Field::DayOfYear => 1..=self.length_of_year(),
            // every month and year ends inside its last aligned week
            Field::AlignedWeekOfMonth => 1..=MAX_ALIGNED_WEEK_OF_MONTH,
            Field::AlignedWeekOfYear => 1..=MAX_ALIGNED_WEEK_OF_YEAR,
            Field::AlignedDayOfWeekInMonth | Field::AlignedDayOfWeekInYear | Field::DayOfWeek => {
                1..=DAYS_PER_WEEK
            },
            Field::EpochDay => SOLAR_EPOCH_DAY..=SOLAR_EPOCH_DAY + MAX_LINEAR_DAY,
        }
    }

    /// Returns a copy of this date with `field` set to `value`.
    ///
    /// Day-of-month and day-of-year must fit the current month or year.
    /// Changing the month or year keeps the day, clamped to the end of the
    /// new month. Week and day-of-week fields move by whole days.
    ///
    /// # Errors
    /// `DateError::InvalidFieldValue` for a value outside [`SolarDate::range`],
    /// `DateError::InvalidEra` for an era other than 0 or 1, and
    /// `DateError::OutOfTableRange` if the new year is not covered.
    pub fn with_field(self, field: Field, value: i64) -> Result<Self, DateError> {
        let current = self.get(field);
        if current == value {
            return Ok(self);
        }
        match field {
            Field::Era => {
                Era::of(value)?;
                self.with_year_clamped(1 - i64::from(self.year()), self.month().into())
            },
            Field::Year => self.with_year_clamped(value, self.month().into()),
            Field::YearOfEra => {
                if value < 1 {
                    return Err(out_of_range(field, value, &self.range(field)));
                }
                self.with_year_clamped(self.era().proleptic_year(value)?, self.month().into())
            },
            _ if !self.range(field).contains(&value) => Err(out_of_range(field, value, &self.range(field))),
            Field::ProlepticMonth => self.with_year_clamped(value.div_euclid(12), value.rem_euclid(12) + 1),
            Field::MonthOfYear => self.with_year_clamped(self.year().into(), value),
            Field::DayOfMonth => Self::from_civil(self.year().into(), self.month().into(), value),
            Field::DayOfYear => Self::from_year_day(self.year().into(), value),
            Field::AlignedWeekOfMonth | Field::AlignedWeekOfYear => {
                self.plus_days((value - current) * DAYS_PER_WEEK)
            },
            Field::AlignedDayOfWeekInMonth | Field::AlignedDayOfWeekInYear | Field::DayOfWeek => {
                self.plus_days(value - current)
            },
            Field::EpochDay => Self::from_epoch_day(value),
        }
    }

    fn with_year_clamped(self, year: i64, month: i64) -> Result<Self, DateError> {
        let year = Year::new(year)?;
        let month = Month::new(month)?;
        let day = self.day().min(days_in_month(year, month));
        Ok(Self::from_validated(year, month, Day::new(day.into(), year, month)?))
    }
}

fn out_of_range(field: Field, value: i64, range: &RangeInclusive<i64>) -> DateError {
    DateError::invalid(field, value, *range.start(), *range.end())
}
