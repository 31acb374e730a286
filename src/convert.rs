//! Conversion between linear day offsets and civil fields.
//!
//! Offset 0 is the first day of year 0, one year before 1 Farvardin 1.
//! A year `y` starts at `y * 365 + leap_years_before(y)`.

use tracing::trace;

use crate::consts::{DAYS_IN_COMMON_YEAR, DAYS_IN_FIRST_HALF, MAX_LINEAR_DAY, MEHR};
use crate::leap::leap_years;
use crate::types::{CivilDate, Day, Month, Year};
use crate::{DateError, Field};

/// Decodes a linear day offset into `(year, month, day, day-of-year)`.
///
/// # Errors
/// Returns `DateError::OffsetOutOfRange` if `offset` falls outside the years
/// covered by the leap-year table.
pub fn to_civil(offset: i64) -> Result<CivilDate, DateError> {
    if !(0..=MAX_LINEAR_DAY).contains(&offset) {
        return Err(DateError::OffsetOutOfRange(offset));
    }
    let table = leap_years();

    // The leap count depends on the year being estimated, so estimate twice.
    let mut year = offset / DAYS_IN_COMMON_YEAR;
    let leaps = table.count_before(year);
    year = (offset - leaps) / DAYS_IN_COMMON_YEAR;
    let leaps = table.count_before(year);
    year += leaps / DAYS_IN_COMMON_YEAR;

    // 0-based from here on
    let mut day_of_year = offset - year * DAYS_IN_COMMON_YEAR - leaps;
    if day_of_year >= DAYS_IN_COMMON_YEAR && !table.lists(year) {
        trace!(offset, year, day_of_year, "year estimate one short, carrying");
        year += 1;
        day_of_year -= DAYS_IN_COMMON_YEAR;
    }

    let (month, day) = if day_of_year < DAYS_IN_FIRST_HALF {
        (day_of_year / 31 + 1, day_of_year % 31 + 1)
    } else {
        let rest = day_of_year - DAYS_IN_FIRST_HALF;
        (rest / 30 + i64::from(MEHR), rest % 30 + 1)
    };

    let year = Year::new(year)?;
    let month = Month::new(month)?;
    Ok(CivilDate {
        year,
        month,
        day: Day::new(day, year, month)?,
        day_of_year: u16::try_from(day_of_year + 1).map_err(|_| DateError::Overflow)?,
    })
}

/// Linear day offset of a validated civil date.
pub fn to_linear(year: Year, month: Month, day: Day) -> i64 {
    year_start(year) + days_before_month(month) + i64::from(day.get()) - 1
}

/// Linear day offset of the `day_of_year`-th day (1-based) of `year`.
///
/// # Errors
/// Returns `DateError::InvalidFieldValue` if `day_of_year` is outside
/// `1..=length of year`.
pub fn linear_from_year_day(year: Year, day_of_year: i64) -> Result<i64, DateError> {
    if !(1..=year.length()).contains(&day_of_year) {
        return Err(DateError::invalid(Field::DayOfYear, day_of_year, 1, year.length()));
    }
    Ok(year_start(year) + day_of_year - 1)
}

/// Linear day offset of 1 Farvardin of `year`.
pub(crate) fn year_start(year: Year) -> i64 {
    let year = i64::from(year);
    year * DAYS_IN_COMMON_YEAR + leap_years().count_before(year)
}

fn days_before_month(month: Month) -> i64 {
    let index = i64::from(month.get()) - 1;
    if month.get() < MEHR {
        index * 31
    } else {
        DAYS_IN_FIRST_HALF + (index - 6) * 30
    }
}
