use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::EngineError;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// A calendar month: the partition every list and aggregate is scoped to.
///
/// The wire form is `YYYY-MM` (what `Display`/`FromStr` and serde use); the
/// human label is `Out/2026`. Both directions parse, so a label picked from a
/// menu maps back to the key without a lookup table.
///
/// Keys order chronologically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Builds a key, rejecting months outside `1..=12` and years outside
    /// `1..=9999`.
    pub fn new(year: i32, month: u32) -> Result<Self, EngineError> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidMonth(format!("month {month} out of range")));
        }
        if !(1..=9999).contains(&year) {
            return Err(EngineError::InvalidMonth(format!("year {year} out of range")));
        }
        Ok(Self { year, month })
    }

    /// Month the given date falls in.
    #[must_use]
    pub fn of_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// Human label, e.g. `Out/2026`.
    #[must_use]
    pub fn label(self) -> String {
        let idx = (self.month - 1) as usize;
        format!("{}/{:04}", MONTH_LABELS[idx], self.year)
    }

    /// Parses a human label (`Out/2026`, case-insensitive).
    pub fn from_label(label: &str) -> Result<Self, EngineError> {
        let invalid = || EngineError::InvalidMonth(label.to_string());

        let (name, year) = label.trim().split_once('/').ok_or_else(invalid)?;
        let month = MONTH_LABELS
            .iter()
            .position(|candidate| candidate.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(invalid)?;
        let year: i32 = year.trim().parse().map_err(|_| invalid())?;

        Self::new(year, month as u32 + 1)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = EngineError;

    /// Parses `YYYY-MM`; a human label is accepted as well.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let Some((year, month)) = trimmed.split_once('-') else {
            return Self::from_label(trimmed);
        };

        let invalid = || EngineError::InvalidMonth(s.to_string());
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Self::new(year, month)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(value: MonthKey) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_form_round_trips() {
        let key: MonthKey = "2026-10".parse().unwrap();
        assert_eq!(key.year(), 2026);
        assert_eq!(key.month(), 10);
        assert_eq!(key.to_string(), "2026-10");
    }

    #[test]
    fn label_round_trips() {
        let key = MonthKey::new(2026, 10).unwrap();
        assert_eq!(key.label(), "Out/2026");
        assert_eq!(MonthKey::from_label("Out/2026").unwrap(), key);
        assert_eq!(MonthKey::from_label("dez/2025").unwrap().to_string(), "2025-12");
        assert_eq!("Fev/2024".parse::<MonthKey>().unwrap().to_string(), "2024-02");
    }

    #[test]
    fn rejects_bad_keys() {
        assert!("2026-13".parse::<MonthKey>().is_err());
        assert!("2026-1".parse::<MonthKey>().is_err());
        assert!("26-01".parse::<MonthKey>().is_err());
        assert!("Foo/2026".parse::<MonthKey>().is_err());
        assert!("".parse::<MonthKey>().is_err());
    }

    #[test]
    fn orders_chronologically() {
        let mut keys: Vec<MonthKey> = ["2026-01", "2025-12", "2025-02"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        keys.sort();
        let rendered: Vec<String> = keys.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["2025-02", "2025-12", "2026-01"]);
    }

    #[test]
    fn dates_map_to_their_month() {
        let key = MonthKey::new(2026, 2).unwrap();
        let inside = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
        let outside = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(MonthKey::of_date(inside), key);
        assert_ne!(MonthKey::of_date(outside), key);
        assert_eq!(MonthKey::of_date(outside).to_string(), "2026-03");
    }
}
