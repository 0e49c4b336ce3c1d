use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub},
    str::FromStr,
};

use crate::{Currency, EngineError};

/// Money amount represented as **integer cents**.
///
/// Every monetary value in the engine (entry amounts, totals, balances) uses
/// this type, so sums never drift the way floats do.
///
/// Entry amounts are non-negative; the sign of a movement is carried by
/// [`EntryKind`](crate::EntryKind). Balances can go negative.
///
/// `Display` renders the canonical form produced by the input mask: comma
/// decimal separator, exactly two fraction digits, no digit grouping.
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// let amount = Amount::new(1_234_56);
/// assert_eq!(amount.cents(), 123456);
/// assert_eq!(amount.to_string(), "1234,56");
/// assert_eq!(amount.format_display(), "R$ 1.234,56");
/// ```
///
/// Parsing accepts `,` or `.` as decimal separator and rejects anything that
/// is not a plain number:
///
/// ```rust
/// use engine::Amount;
///
/// assert_eq!("10".parse::<Amount>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<Amount>().unwrap().cents(), 1050);
/// assert!("R$ 10,50".parse::<Amount>().is_err());
/// assert!("12.345".parse::<Amount>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Splits the magnitude into major and minor units.
    fn parts(self) -> (u64, u64) {
        let scale = Currency::default().minor_per_major().unsigned_abs();
        let abs = self.0.unsigned_abs();
        (abs / scale, abs % scale)
    }

    /// Renders the amount for people: currency symbol, digit grouping and
    /// the locale's decimal separator (`R$ 1.234,56`, `-R$ 0,50`).
    #[must_use]
    pub fn format_display(self) -> String {
        let currency = Currency::default();
        let width = usize::from(currency.minor_units());
        let sign = if self.0 < 0 { "-" } else { "" };
        let (major, minor) = self.parts();
        let units = major.to_string();

        let mut grouped = String::with_capacity(units.len() + units.len() / 3);
        for (idx, digit) in units.chars().enumerate() {
            if idx > 0 && (units.len() - idx) % 3 == 0 {
                grouped.push(currency.thousands_separator());
            }
            grouped.push(digit);
        }

        format!(
            "{sign}{} {grouped}{}{minor:0width$}",
            currency.symbol(),
            currency.decimal_separator()
        )
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let currency = Currency::default();
        let width = usize::from(currency.minor_units());
        let sign = if self.0 < 0 { "-" } else { "" };
        let (major, minor) = self.parts();
        let separator = currency.decimal_separator();
        write!(f, "{sign}{major}{separator}{minor:0width$}")
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        Amount(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl FromStr for Amount {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `,` or `.` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - at most as many fractional digits as the currency has (rejects `12,345`)
    /// - no digit grouping, currency symbols or other leftovers
    /// - rejects empty strings and values that overflow `i64` cents
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount(format!("\"{s}\" is not a number"));
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());
        let currency = Currency::default();
        let width = usize::from(currency.minor_units());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let units_str = parts.next().ok_or_else(invalid)?;
        let cents_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: i64 = units_str.parse().map_err(|_| overflow())?;

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                if frac.len() > width {
                    return Err(EngineError::InvalidAmount(
                        "too many decimals".to_string(),
                    ));
                }
                format!("{frac:0<width$}").parse().map_err(|_| invalid())?
            }
        };

        let total = units
            .checked_mul(currency.minor_per_major())
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(overflow)?;

        Ok(Amount(if negative { -total } else { total }))
    }
}
