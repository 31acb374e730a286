use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{DateError, prelude::*};

/// Date fields understood by this calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum Field {
    #[display(fmt = "era")]
    Era,
    #[display(fmt = "year")]
    Year,
    #[display(fmt = "year-of-era")]
    YearOfEra,
    /// `year * 12 + month - 1`
    #[display(fmt = "proleptic-month")]
    ProlepticMonth,
    #[display(fmt = "month-of-year")]
    MonthOfYear,
    #[display(fmt = "day-of-month")]
    DayOfMonth,
    #[display(fmt = "day-of-year")]
    DayOfYear,
    /// Week within the month, counting from day 1 in blocks of seven
    #[display(fmt = "aligned-week-of-month")]
    AlignedWeekOfMonth,
    #[display(fmt = "aligned-day-of-week-in-month")]
    AlignedDayOfWeekInMonth,
    /// Week within the year, counting from 1 Farvardin in blocks of seven
    #[display(fmt = "aligned-week-of-year")]
    AlignedWeekOfYear,
    #[display(fmt = "aligned-day-of-week-in-year")]
    AlignedDayOfWeekInYear,
    /// ISO numbering, Monday = 1 through Sunday = 7
    #[display(fmt = "day-of-week")]
    DayOfWeek,
    /// Days since 1970-01-01
    #[display(fmt = "epoch-day")]
    EpochDay,
}

impl Field {
    pub const ALL: [Self; 13] = [
        Self::Era,
        Self::Year,
        Self::YearOfEra,
        Self::ProlepticMonth,
        Self::MonthOfYear,
        Self::DayOfMonth,
        Self::DayOfYear,
        Self::AlignedWeekOfMonth,
        Self::AlignedDayOfWeekInMonth,
        Self::AlignedWeekOfYear,
        Self::AlignedDayOfWeekInYear,
        Self::DayOfWeek,
        Self::EpochDay,
    ];
}

impl FromStr for Field {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.to_string() == name)
            .ok_or_else(|| DateError::UnsupportedField(name.to_owned()))
    }
}

impl Serialize for Field {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// How much the resolver trusts its input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Validate every field and cross-check the result; never invent missing context.
    Strict,
    /// Validate, but clamp a day-of-month past the end of its month.
    #[default]
    Smart,
    /// No validation; out-of-range values carry into the next month or year.
    Lenient,
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Strict => "strict",
            Self::Smart => "smart",
            Self::Lenient => "lenient",
        };
        f.write_str(name)
    }
}

impl FromStr for Strictness {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "smart" => Ok(Self::Smart),
            "lenient" => Ok(Self::Lenient),
            _ => Err(DateError::InvalidFormat(format!("Unknown strictness: {s}"))),
        }
    }
}

/// A bag of field values to be resolved into a date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, From, Into, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValues(BTreeMap<Field, i64>);

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, field: Field, value: i64) -> Self {
        self.0.insert(field, value);
        self
    }

    /// Sets `field`, returning the previous value
    pub fn insert(&mut self, field: Field, value: i64) -> Option<i64> {
        self.0.insert(field, value)
    }

    pub(crate) fn remove(&mut self, field: Field) -> Option<i64> {
        self.0.remove(&field)
    }
}

impl FromIterator<(Field, i64)> for FieldValues {
    fn from_iter<I: IntoIterator<Item = (Field, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
