/// First supported proleptic year. Year 0 is the epoch year and is never leap.
pub const MIN_YEAR: i32 = 0;

/// Last supported proleptic year (last entry of the leap-year table)
pub const MAX_YEAR: i32 = 1483;

/// Maximum valid month (Esfand)
pub const MAX_MONTH: u8 = 12;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;

/// Month number for Mehr, the first 30-day month
pub const MEHR: u8 = 7;
/// Month number for Esfand
pub const ESFAND: u8 = 12;

/// Days in Esfand for leap years
pub const ESFAND_DAYS_LEAP: u8 = 30;

/// Days in each month of a common year (index 0 is unused, months are 1-indexed)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // Farvardin
    31, // Ordibehesht
    31, // Khordad
    31, // Tir
    31, // Mordad
    31, // Shahrivar
    30, // Mehr
    30, // Aban
    30, // Azar
    30, // Dey
    30, // Bahman
    29, // Esfand (common year, adjusted by the leap-year table)
];

/// Days in a common year
pub const DAYS_IN_COMMON_YEAR: i64 = 365;
/// Days in a leap year
pub const DAYS_IN_LEAP_YEAR: i64 = 366;

/// Days covered by the six 31-day months at the start of the year
pub(crate) const DAYS_IN_FIRST_HALF: i64 = 31 * 6;

/// Unix epoch day (1970-01-01 = 0) of linear day offset 0, ISO 0621-03-22.
/// That is one year before 1 Farvardin 1 (ISO 0622-03-22).
pub const SOLAR_EPOCH_DAY: i64 = -492_632;

/// Largest valid linear day offset (1483-12-30, ISO 2105-03-20)
pub const MAX_LINEAR_DAY: i64 = 542_018;

/// Days in a week
pub const DAYS_PER_WEEK: i64 = 7;
/// Aligned weeks in the longest month
pub const MAX_ALIGNED_WEEK_OF_MONTH: i64 = 5;
/// Aligned weeks in a leap year
pub const MAX_ALIGNED_WEEK_OF_YEAR: i64 = 53;

/// Date component separator
pub const DATE_SEPARATOR: char = '-';
