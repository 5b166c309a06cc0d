//! Calendar month selection.

use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::InputError;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month of a given year.
///
/// `month0` is zero-based (`0` = January, `11` = December).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    year: i32,
    month0: u32,
}

impl Period {
    pub fn new(month0: u32, year: i32) -> Result<Self, InputError> {
        if month0 > 11 {
            return Err(InputError::InvalidMonth(month0));
        }
        Ok(Self { year, month0 })
    }

    /// The month containing `now` in the observer's calendar.
    pub fn current<Tz: TimeZone>(tz: &Tz, now: DateTime<Utc>) -> Self {
        let local = now.with_timezone(tz);
        Self {
            year: local.year(),
            month0: local.month0(),
        }
    }

    #[must_use]
    pub const fn month0(self) -> u32 {
        self.month0
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub fn month_name(self) -> &'static str {
        MONTH_NAMES[self.month0 as usize]
    }

    #[must_use]
    pub fn previous(self) -> Self {
        if self.month0 == 0 {
            Self {
                year: self.year - 1,
                month0: 11,
            }
        } else {
            Self {
                year: self.year,
                month0: self.month0 - 1,
            }
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        if self.month0 == 11 {
            Self {
                year: self.year + 1,
                month0: 0,
            }
        } else {
            Self {
                year: self.year,
                month0: self.month0 + 1,
            }
        }
    }

    /// Whether `at` falls in this month, compared in the observer's calendar.
    pub fn contains<Tz: TimeZone>(self, at: &DateTime<Utc>, tz: &Tz) -> bool {
        let local = at.with_timezone(tz);
        local.month0() == self.month0 && local.year() == self.year
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}
