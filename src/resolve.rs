//! Resolution of a partial set of field values into a single date.
//!
//! Resolution runs in three stages. An `epoch-day` short-circuits
//! everything. Otherwise `proleptic-month` and `era`/`year-of-era` are first
//! folded into `year` and `month-of-year`, and the first rule in `RULES`
//! whose fields are all present builds the date. Under strict and smart
//! resolution any field left over after that is cross-checked against the
//! result.

use std::ops::RangeInclusive;

use tracing::debug;

use crate::consts::{
    DAYS_PER_WEEK, MAX_ALIGNED_WEEK_OF_MONTH, MAX_ALIGNED_WEEK_OF_YEAR, MAX_YEAR, MIN_YEAR,
};
use crate::types::{Era, Month, Year, days_in_month};
use crate::{DateError, Field, FieldValues, SolarDate, Strictness};

/// Largest day-of-month any month can hold, checked before the month is known
const MAX_DAY_OF_MONTH: i64 = 31;

type Build = fn(&mut FieldValues, Year, Strictness) -> Result<SolarDate, DateError>;

/// A group of fields that locates a day within a known year.
struct Rule {
    name:     &'static str,
    requires: &'static [Field],
    build:    Build,
}

impl Rule {
    fn applies(&self, fields: &FieldValues) -> bool {
        self.requires.iter().all(|field| fields.contains_key(field))
    }
}

/// Tried in order; the first rule whose fields are all present wins.
const RULES: [Rule; 6] = [
    Rule {
        name:     "month-day",
        requires: &[Field::MonthOfYear, Field::DayOfMonth],
        build:    month_day,
    },
    Rule {
        name:     "month-aligned-week-day",
        requires: &[Field::MonthOfYear, Field::AlignedWeekOfMonth, Field::AlignedDayOfWeekInMonth],
        build:    month_aligned_day,
    },
    Rule {
        name:     "month-aligned-week-day-of-week",
        requires: &[Field::MonthOfYear, Field::AlignedWeekOfMonth, Field::DayOfWeek],
        build:    month_day_of_week,
    },
    Rule {
        name:     "day-of-year",
        requires: &[Field::DayOfYear],
        build:    year_day,
    },
    Rule {
        name:     "year-aligned-week-day",
        requires: &[Field::AlignedWeekOfYear, Field::AlignedDayOfWeekInYear],
        build:    year_aligned_day,
    },
    Rule {
        name:     "year-aligned-week-day-of-week",
        requires: &[Field::AlignedWeekOfYear, Field::DayOfWeek],
        build:    year_day_of_week,
    },
];

/// Resolves field values into a date under a fixed [`Strictness`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldResolver {
    strictness: Strictness,
}

impl FieldResolver {
    pub const fn new(strictness: Strictness) -> Self {
        Self { strictness }
    }

    pub const fn strictness(self) -> Strictness {
        self.strictness
    }

    /// Resolves `values` into a date.
    ///
    /// Returns `Ok(None)` when the values do not contain a year together with
    /// a group of fields that locates a day in it. The input is never
    /// modified; resolution works on a private copy.
    ///
    /// # Errors
    /// - `DateError::InvalidFieldValue` for an out-of-range value (never under
    ///   lenient resolution)
    /// - `DateError::InvalidEra` for an era other than 0 or 1
    /// - `DateError::DateMismatch` when two fields disagree, or when strict
    ///   resolution lands outside the requested month or year
    /// - `DateError::OutOfTableRange` if the year is not covered
    /// - `DateError::OffsetOutOfRange` if an `epoch-day` or a lenient carry
    ///   lands outside the table
    pub fn resolve(self, values: &FieldValues) -> Result<Option<SolarDate>, DateError> {
        let mut fields = values.clone();
        if let Some(epoch_day) = fields.remove(Field::EpochDay) {
            debug!(epoch_day, "resolving from epoch day");
            return SolarDate::from_epoch_day(epoch_day).map(Some);
        }

        self.fold_proleptic_month(&mut fields)?;
        self.fold_era(&mut fields)?;

        let Some(&year) = fields.get(&Field::Year) else {
            debug!(strictness = %self.strictness, "no year to resolve against");
            return Ok(None);
        };
        let Some(rule) = RULES.iter().find(|rule| rule.applies(&fields)) else {
            debug!(year, strictness = %self.strictness, "no field group locates a day");
            return Ok(None);
        };

        fields.remove(Field::Year);
        debug!(rule = rule.name, year, strictness = %self.strictness, "resolving field group");
        let date = (rule.build)(&mut fields, Year::new(year)?, self.strictness)?;

        if self.strictness != Strictness::Lenient {
            cross_check(&fields, date)?;
        }
        Ok(Some(date))
    }

    fn fold_proleptic_month(self, fields: &mut FieldValues) -> Result<(), DateError> {
        let Some(proleptic_month) = fields.remove(Field::ProlepticMonth) else {
            return Ok(());
        };
        if self.strictness != Strictness::Lenient {
            let range = i64::from(MIN_YEAR) * 12..=i64::from(MAX_YEAR) * 12 + 11;
            check(Field::ProlepticMonth, proleptic_month, &range)?;
        }
        update(fields, Field::MonthOfYear, proleptic_month.rem_euclid(12) + 1)?;
        update(fields, Field::Year, proleptic_month.div_euclid(12))
    }

    fn fold_era(self, fields: &mut FieldValues) -> Result<(), DateError> {
        let Some(year_of_era) = fields.remove(Field::YearOfEra) else {
            // a lone era stays for the cross-check, but must be valid
            if let Some(&era) = fields.get(&Field::Era) {
                Era::of(era)?;
            }
            return Ok(());
        };
        if self.strictness != Strictness::Lenient {
            check(Field::YearOfEra, year_of_era, &(1..=i64::from(MAX_YEAR)))?;
        }

        let year = match fields.remove(Field::Era) {
            Some(era) => Era::of(era)?.proleptic_year(year_of_era)?,
            None => {
                let known = fields.get(&Field::Year).copied();
                if self.strictness == Strictness::Strict && known.is_none() {
                    // no era to be had without a year
                    fields.insert(Field::YearOfEra, year_of_era);
                    return Ok(());
                }
                let era = if known.is_none_or(|year| year > 0) { Era::Ah } else { Era::Bh };
                era.proleptic_year(year_of_era)?
            },
        };
        update(fields, Field::Year, year)
    }
}

/// Sets a derived value, failing if an explicit one disagrees.
fn update(fields: &mut FieldValues, field: Field, value: i64) -> Result<(), DateError> {
    match fields.insert(field, value) {
        Some(explicit) if explicit != value => Err(DateError::DateMismatch {
            field,
            expected: explicit,
            actual: value,
        }),
        _ => Ok(()),
    }
}

fn cross_check(leftover: &FieldValues, date: SolarDate) -> Result<(), DateError> {
    for (&field, &expected) in leftover.iter() {
        let actual = date.get(field);
        if actual != expected {
            debug!(%field, expected, actual, %date, "leftover field disagrees with resolved date");
            return Err(DateError::DateMismatch { field, expected, actual });
        }
    }
    Ok(())
}

fn check(field: Field, value: i64, range: &RangeInclusive<i64>) -> Result<i64, DateError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(DateError::invalid(field, value, *range.start(), *range.end()))
    }
}

fn take(fields: &mut FieldValues, field: Field) -> Result<i64, DateError> {
    fields.remove(field).ok_or(DateError::Incomplete)
}

/// Zero-based position of a 1-based value
fn zero_based(value: i64) -> Result<i64, DateError> {
    value.checked_sub(1).ok_or(DateError::Overflow)
}

/// 1-based week and day as a day count from the start of the period.
fn week_offset(week: i64, day: i64) -> Result<i64, DateError> {
    zero_based(week)?
        .checked_mul(DAYS_PER_WEEK)
        .zip(zero_based(day).ok())
        .and_then(|(weeks, days)| weeks.checked_add(days))
        .ok_or(DateError::Overflow)
}

/// First day of the month `month_of_year` in `year`, carrying months outside
/// `1..=12` into neighbouring years.
fn carried_month_start(year: Year, month_of_year: i64) -> Result<SolarDate, DateError> {
    let proleptic = (i64::from(year) * 12)
        .checked_add(zero_based(month_of_year)?)
        .ok_or(DateError::Overflow)?;
    SolarDate::from_civil(proleptic.div_euclid(12), proleptic.rem_euclid(12) + 1, 1)
}

fn month_start(fields: &mut FieldValues, year: Year, strictness: Strictness) -> Result<(SolarDate, i64), DateError> {
    let month_of_year = take(fields, Field::MonthOfYear)?;
    let start = if strictness == Strictness::Lenient {
        carried_month_start(year, month_of_year)?
    } else {
        let month = Month::new(month_of_year)?;
        SolarDate::from_civil(year.into(), month.get().into(), 1)?
    };
    Ok((start, month_of_year))
}

fn next_or_same(date: SolarDate, day_of_week: i64) -> Result<SolarDate, DateError> {
    date.plus_days((day_of_week - i64::from(date.day_of_week())).rem_euclid(DAYS_PER_WEEK))
}

/// First `day_of_week` on or after `date`. Lenient resolution carries a value
/// outside `1..=7` into whole weeks before picking the weekday.
fn on_day_of_week(date: SolarDate, day_of_week: i64, strictness: Strictness) -> Result<SolarDate, DateError> {
    if strictness != Strictness::Lenient {
        let day_of_week = check(Field::DayOfWeek, day_of_week, &(1..=DAYS_PER_WEEK))?;
        return next_or_same(date, day_of_week);
    }
    let from_monday = zero_based(day_of_week)?;
    let weeks = from_monday
        .div_euclid(DAYS_PER_WEEK)
        .checked_mul(DAYS_PER_WEEK)
        .ok_or(DateError::Overflow)?;
    next_or_same(date.plus_days(weeks)?, from_monday.rem_euclid(DAYS_PER_WEEK) + 1)
}

fn reject_other_month(date: SolarDate, month_of_year: i64, strictness: Strictness) -> Result<SolarDate, DateError> {
    let actual = i64::from(date.month());
    if strictness == Strictness::Strict && actual != month_of_year {
        debug!(%date, month_of_year, "strict resolution landed in another month");
        return Err(DateError::DateMismatch {
            field: Field::MonthOfYear,
            expected: month_of_year,
            actual,
        });
    }
    Ok(date)
}

fn reject_other_year(date: SolarDate, year: Year, strictness: Strictness) -> Result<SolarDate, DateError> {
    let actual = i64::from(date.year());
    if strictness == Strictness::Strict && actual != i64::from(year) {
        debug!(%date, %year, "strict resolution landed in another year");
        return Err(DateError::DateMismatch {
            field: Field::Year,
            expected: year.into(),
            actual,
        });
    }
    Ok(date)
}

fn month_day(fields: &mut FieldValues, year: Year, strictness: Strictness) -> Result<SolarDate, DateError> {
    let day_of_month = take(fields, Field::DayOfMonth)?;
    if strictness == Strictness::Lenient {
        let (start, _) = month_start(fields, year, strictness)?;
        return start.plus_days(zero_based(day_of_month)?);
    }

    let month = Month::new(take(fields, Field::MonthOfYear)?)?;
    let mut day = check(Field::DayOfMonth, day_of_month, &(1..=MAX_DAY_OF_MONTH))?;
    let length = i64::from(days_in_month(year, month));
    if strictness == Strictness::Smart && day > length {
        debug!(%year, %month, requested = day, clamped = length, "clamping day to end of month");
        day = length;
    }
    SolarDate::from_civil(year.into(), month.get().into(), day)
}

fn month_aligned_day(fields: &mut FieldValues, year: Year, strictness: Strictness) -> Result<SolarDate, DateError> {
    let (start, month_of_year) = month_start(fields, year, strictness)?;
    let mut week = take(fields, Field::AlignedWeekOfMonth)?;
    let mut day = take(fields, Field::AlignedDayOfWeekInMonth)?;
    if strictness != Strictness::Lenient {
        week = check(Field::AlignedWeekOfMonth, week, &(1..=MAX_ALIGNED_WEEK_OF_MONTH))?;
        day = check(Field::AlignedDayOfWeekInMonth, day, &(1..=DAYS_PER_WEEK))?;
    }
    let date = start.plus_days(week_offset(week, day)?)?;
    reject_other_month(date, month_of_year, strictness)
}

fn month_day_of_week(fields: &mut FieldValues, year: Year, strictness: Strictness) -> Result<SolarDate, DateError> {
    let (start, month_of_year) = month_start(fields, year, strictness)?;
    let mut week = take(fields, Field::AlignedWeekOfMonth)?;
    let day_of_week = take(fields, Field::DayOfWeek)?;
    if strictness != Strictness::Lenient {
        week = check(Field::AlignedWeekOfMonth, week, &(1..=MAX_ALIGNED_WEEK_OF_MONTH))?;
    }
    let date = on_day_of_week(start.plus_days(week_offset(week, 1)?)?, day_of_week, strictness)?;
    reject_other_month(date, month_of_year, strictness)
}

fn year_day(fields: &mut FieldValues, year: Year, strictness: Strictness) -> Result<SolarDate, DateError> {
    let day_of_year = take(fields, Field::DayOfYear)?;
    if strictness == Strictness::Lenient {
        return SolarDate::from_year_day(year.into(), 1)?.plus_days(zero_based(day_of_year)?);
    }
    SolarDate::from_year_day(year.into(), day_of_year)
}

fn year_aligned_day(fields: &mut FieldValues, year: Year, strictness: Strictness) -> Result<SolarDate, DateError> {
    let mut week = take(fields, Field::AlignedWeekOfYear)?;
    let mut day = take(fields, Field::AlignedDayOfWeekInYear)?;
    if strictness != Strictness::Lenient {
        week = check(Field::AlignedWeekOfYear, week, &(1..=MAX_ALIGNED_WEEK_OF_YEAR))?;
        day = check(Field::AlignedDayOfWeekInYear, day, &(1..=DAYS_PER_WEEK))?;
    }
    let date = SolarDate::from_year_day(year.into(), 1)?.plus_days(week_offset(week, day)?)?;
    reject_other_year(date, year, strictness)
}

fn year_day_of_week(fields: &mut FieldValues, year: Year, strictness: Strictness) -> Result<SolarDate, DateError> {
    let mut week = take(fields, Field::AlignedWeekOfYear)?;
    let day_of_week = take(fields, Field::DayOfWeek)?;
    if strictness != Strictness::Lenient {
        week = check(Field::AlignedWeekOfYear, week, &(1..=MAX_ALIGNED_WEEK_OF_YEAR))?;
    }
    let start = SolarDate::from_year_day(year.into(), 1)?.plus_days(week_offset(week, 1)?)?;
    reject_other_year(on_day_of_week(start, day_of_week, strictness)?, year, strictness)
}
