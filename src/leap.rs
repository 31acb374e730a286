//! Table of Solar Hijri leap years.
//!
//! Leap years mostly arrive every four years, but the 29, 33 and 37 year
//! sub-cycles push one of them into the fifth year: the first leap year is 4,
//! the second is 9 rather than 8. The placement follows the position of the
//! earth, so it is kept as data and looked up, never computed.

use std::ops::RangeInclusive;
use std::sync::OnceLock;

use crate::{DateError, MIN_YEAR};

#[rustfmt::skip]
const LEAP_YEARS: [i32; 359] = [
    4, 9, 13, 17, 21, 25, 29, 33, 37, 42, 46, 50, 54, 58,
    62, 66, 71, 75, 79, 83, 87, 91, 95, 99, 104, 108, 112, 116,
    120, 124, 128, 132, 137, 141, 145, 149, 153, 157, 161, 165, 170, 174,
    178, 182, 186, 190, 194, 198, 203, 207, 211, 215, 219, 223, 227, 231,
    236, 240, 244, 248, 252, 256, 260, 264, 269, 273, 277, 281, 285, 289,
    293, 297, 302, 306, 310, 314, 318, 322, 326, 331, 335, 339, 343, 347,
    351, 355, 359, 364, 368, 372, 376, 380, 384, 388, 392, 397, 401, 405,
    409, 413, 417, 421, 425, 430, 434, 438, 442, 446, 450, 454, 458, 463,
    467, 471, 475, 479, 483, 487, 491, 496, 500, 504, 508, 512, 516, 520,
    524, 529, 533, 537, 541, 545, 549, 553, 558, 562, 566, 570, 574, 578,
    582, 586, 591, 595, 599, 603, 607, 611, 615, 619, 624, 628, 632, 636,
    640, 644, 648, 652, 656, 661, 665, 669, 673, 677, 681, 685, 690, 694,
    698, 702, 706, 710, 714, 718, 723, 727, 731, 735, 739, 743, 747, 751,
    756, 760, 764, 768, 772, 776, 780, 784, 789, 793, 797, 801, 805, 809,
    813, 817, 822, 826, 830, 834, 838, 842, 846, 850, 855, 859, 863, 867,
    871, 875, 879, 883, 888, 892, 896, 900, 904, 908, 912, 916, 921, 925,
    929, 933, 937, 941, 945, 949, 954, 958, 962, 966, 970, 974, 978, 983,
    987, 991, 995, 999, 1003, 1007, 1011, 1016, 1020, 1024, 1028, 1032, 1036, 1040,
    1044, 1049, 1053, 1057, 1061, 1065, 1069, 1073, 1077, 1082, 1086, 1090, 1094, 1098,
    1102, 1106, 1110, 1115, 1119, 1123, 1127, 1131, 1135, 1139, 1143, 1148, 1152, 1156,
    1160, 1164, 1168, 1172, 1176, 1181, 1185, 1189, 1193, 1197, 1201, 1205, 1209, 1214,
    1218, 1222, 1226, 1230, 1234, 1238, 1243, 1247, 1251, 1255, 1259, 1263, 1267, 1271,
    1275, 1280, 1284, 1288, 1292, 1296, 1300, 1304, 1308, 1313, 1317, 1321, 1325, 1329,
    1333, 1337, 1341, 1346, 1350, 1354, 1358, 1362, 1366, 1370, 1375, 1379, 1383, 1387,
    1391, 1395, 1399, 1403, 1408, 1412, 1416, 1420, 1424, 1428, 1432, 1436, 1441, 1445,
    1449, 1453, 1457, 1461, 1465, 1469, 1473, 1478, 1483,
];

/// Sorted, duplicate-free set of leap years plus the span of years it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeapYearTable {
    years:   Box<[i32]>,
    covered: RangeInclusive<i32>,
}

impl LeapYearTable {
    /// Builds a table from leap years given in any order.
    /// Duplicates are dropped, and so are the epoch year and anything before
    /// it: year 0 is never leap. The covered span runs from the epoch year
    /// through the last leap year listed.
    pub fn from_years<I: IntoIterator<Item = i32>>(years: I) -> Self {
        let mut years: Vec<i32> = years.into_iter().filter(|&y| y > MIN_YEAR).collect();
        years.sort_unstable();
        years.dedup();
        let last = years.last().copied().unwrap_or(MIN_YEAR);
        Self {
            years:   years.into_boxed_slice(),
            covered: MIN_YEAR..=last,
        }
    }

    /// Years this table can classify
    pub fn covered_years(&self) -> RangeInclusive<i32> {
        self.covered.clone()
    }

    /// Whether `year` lies inside the covered span
    pub fn covers(&self, year: i64) -> bool {
        i32::try_from(year).is_ok_and(|y| self.covered.contains(&y))
    }

    /// Number of distinct leap years in the table
    pub fn len(&self) -> usize {
        self.years.len()
    }

    /// Returns true if the table lists no leap year at all
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Returns whether `year` is a leap year.
    ///
    /// # Errors
    /// Returns `DateError::OutOfTableRange` if the table does not cover `year`.
    pub fn is_leap_year(&self, year: i64) -> Result<bool, DateError> {
        self.check(year)?;
        Ok(self.lists(year))
    }

    /// Counts the leap years that end before `year` begins.
    /// The year just past the covered span is accepted and yields the total.
    ///
    /// # Errors
    /// Returns `DateError::OutOfTableRange` if `year` is outside the covered
    /// span extended by one year.
    pub fn leap_years_before(&self, year: i64) -> Result<i64, DateError> {
        if year != i64::from(*self.covered.end()) + 1 {
            self.check(year)?;
        }
        Ok(self.count_before(year))
    }

    fn check(&self, year: i64) -> Result<(), DateError> {
        if self.covers(year) {
            Ok(())
        } else {
            Err(DateError::OutOfTableRange(year))
        }
    }

    /// Unchecked membership, for years already validated by the caller.
    pub(crate) fn lists(&self, year: i64) -> bool {
        i32::try_from(year).is_ok_and(|y| self.years.binary_search(&y).is_ok())
    }

    /// Unchecked count of listed years below `year`.
    pub(crate) fn count_before(&self, year: i64) -> i64 {
        let count = self.years.partition_point(|&y| i64::from(y) < year);
        // At most a few hundred entries.
        i64::try_from(count).unwrap_or(i64::MAX)
    }
}

/// The process-wide leap-year table, built on first use.
pub fn leap_years() -> &'static LeapYearTable {
    static TABLE: OnceLock<LeapYearTable> = OnceLock::new();
    TABLE.get_or_init(|| LeapYearTable::from_years(LEAP_YEARS))
}
