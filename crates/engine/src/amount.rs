use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign},
    str::FromStr,
};

use crate::InputError;

/// Non-negative money amount in whole currency units.
///
/// The ledger has a single currency with no minor units, so amounts are plain
/// integers. Balances can go negative and are therefore kept as `i64`
/// (see [`Amount::signed_diff`]).
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// let amount: Amount = "50.000".parse().unwrap();
/// assert_eq!(amount.value(), 50_000);
/// assert_eq!(amount.to_string(), "Rp 50.000");
/// ```
///
/// Parsing never coerces: signs, fractions and stray characters are errors.
///
/// ```rust
/// use engine::Amount;
///
/// assert!("-5".parse::<Amount>().is_err());
/// assert!("12.5".parse::<Amount>().is_err());
/// assert!("12abc".parse::<Amount>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);
    /// Largest single amount, Rp 1.000.000.000.000.000. Sums of up to 9.000
    /// such amounts still fit in an `i64`.
    pub const MAX: Amount = Amount(1_000_000_000_000_000);

    /// Creates an amount, rejecting negative values and values above [`Amount::MAX`].
    pub fn new(value: i64) -> Result<Self, InputError> {
        if value < 0 {
            return Err(InputError::InvalidAmount(format!(
                "amount must be >= 0, got {value}"
            )));
        }
        if value > Self::MAX.0 {
            return Err(InputError::InvalidAmount(format!(
                "amount must be <= {}, got {value}",
                Self::MAX.0
            )));
        }
        Ok(Self(value))
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// `self - rhs` as a signed value. Both sides are non-negative, so this
    /// cannot overflow.
    #[must_use]
    pub const fn signed_diff(self, rhs: Amount) -> i64 {
        self.0 - rhs.0
    }
}

/// Formats a signed value with `.` as thousands separator (`-1.250.000`).
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rp {}", group_thousands(self.0))
    }
}

impl From<Amount> for i64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl TryFrom<i64> for Amount {
    type Error = InputError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl Add for Amount {
    type Output = Amount;

    /// Saturates at `i64::MAX`.
    fn add(self, rhs: Amount) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        *self = *self + rhs;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl FromStr for Amount {
    type Err = InputError;

    /// Parses free-text input into an amount.
    ///
    /// Validation rules:
    /// - surrounding whitespace is ignored
    /// - only ASCII digits, optionally grouped by `.` in blocks of three
    /// - no sign, no decimal part
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| InputError::InvalidAmount(format!("{reason}: {s:?}"));

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InputError::MissingAmount);
        }
        if trimmed.starts_with('-') {
            return Err(invalid("amount must not be negative"));
        }

        let groups: Vec<&str> = trimmed.split('.').collect();
        if groups.iter().any(|g| g.is_empty() || !g.bytes().all(|b| b.is_ascii_digit())) {
            return Err(invalid("amount must be a whole number"));
        }
        if groups.len() > 1 && (groups[0].len() > 3 || groups[1..].iter().any(|g| g.len() != 3)) {
            return Err(invalid("amount must be a whole number"));
        }

        let digits: String = groups.concat();
        let value: i64 = digits
            .parse()
            .map_err(|_| invalid("amount too large"))?;
        if value > Self::MAX.0 {
            return Err(invalid("amount too large"));
        }
        Ok(Amount(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_groups_thousands() {
        assert_eq!(Amount::ZERO.to_string(), "Rp 0");
        assert_eq!(Amount(999).to_string(), "Rp 999");
        assert_eq!(Amount(1000).to_string(), "Rp 1.000");
        assert_eq!(Amount(1_250_000).to_string(), "Rp 1.250.000");
        assert_eq!(group_thousands(-30_000), "-30.000");
    }

    #[test]
    fn parse_accepts_plain_and_grouped_digits() {
        assert_eq!("0".parse::<Amount>().unwrap().value(), 0);
        assert_eq!("50000".parse::<Amount>().unwrap().value(), 50_000);
        assert_eq!(" 50.000 ".parse::<Amount>().unwrap().value(), 50_000);
        assert_eq!("1.250.000".parse::<Amount>().unwrap().value(), 1_250_000);
    }

    #[test]
    fn parse_rejects_fractions_and_signs() {
        assert!(matches!("12.5".parse::<Amount>(), Err(InputError::InvalidAmount(_))));
        assert!(matches!("1.5000".parse::<Amount>(), Err(InputError::InvalidAmount(_))));
        assert!(matches!("-10".parse::<Amount>(), Err(InputError::InvalidAmount(_))));
        assert!(matches!("+10".parse::<Amount>(), Err(InputError::InvalidAmount(_))));
        assert!(matches!("1e3".parse::<Amount>(), Err(InputError::InvalidAmount(_))));
        assert!(matches!(
            "99999999999999999999".parse::<Amount>(),
            Err(InputError::InvalidAmount(_))
        ));
    }

    #[test]
    fn parse_rejects_amounts_above_max() {
        assert_eq!(
            "1.000.000.000.000.000".parse::<Amount>().unwrap(),
            Amount::MAX
        );
        assert!(matches!(
            "1.000.000.000.000.001".parse::<Amount>(),
            Err(InputError::InvalidAmount(_))
        ));
        assert!(matches!(
            "9223372036854775807".parse::<Amount>(),
            Err(InputError::InvalidAmount(_))
        ));
    }

    #[test]
    fn addition_never_overflows() {
        let big = Amount(i64::MAX);
        assert_eq!(big.checked_add(Amount(1)), None);
        assert_eq!(big + Amount(1), big);
        assert_eq!([big, big, Amount(1)].into_iter().sum::<Amount>(), big);

        let mut acc = Amount(1);
        acc += big;
        assert_eq!(acc, big);
        assert_eq!(Amount::MAX.checked_add(Amount::MAX).unwrap().value(), 2 * Amount::MAX.value());
    }

    #[test]
    fn parse_empty_is_missing() {
        assert_eq!("".parse::<Amount>(), Err(InputError::MissingAmount));
        assert_eq!("   ".parse::<Amount>(), Err(InputError::MissingAmount));
    }

    #[test]
    fn new_rejects_negative_and_oversized() {
        assert!(Amount::new(-1).is_err());
        assert!(Amount::new(i64::MAX).is_err());
        assert_eq!(Amount::new(Amount::MAX.value()), Ok(Amount::MAX));
        assert_eq!(Amount::new(5).unwrap().value(), 5);
    }
}
