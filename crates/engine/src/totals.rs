//! Aggregates over a month or a year.

use crate::{Amount, EntryData, EntryKind, MonthKey, Nature};

/// Sums for one scope, split by kind and nature.
///
/// The balance is never stored: it is always `income - expense`, so the
/// identity cannot be broken by a store that reports an inconsistent `saldo`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub expense: Amount,
    pub income: Amount,
    pub fixed_expense: Amount,
    pub variable_expense: Amount,
    pub fixed_income: Amount,
    pub variable_income: Amount,
}

impl Totals {
    /// Totals computed locally from a list of entries.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a EntryData>) -> Self {
        let mut totals = Self::default();
        for entry in entries {
            totals.add(entry);
        }
        totals
    }

    fn add(&mut self, entry: &EntryData) {
        let amount = entry.amount;
        match (entry.kind, entry.nature) {
            (EntryKind::Expense, Some(Nature::Fixed)) => self.fixed_expense += amount,
            (EntryKind::Expense, Some(Nature::Variable)) => self.variable_expense += amount,
            (EntryKind::Income, Some(Nature::Fixed)) => self.fixed_income += amount,
            (EntryKind::Income, Some(Nature::Variable)) => self.variable_income += amount,
            (_, None) => {}
        }
        match entry.kind {
            EntryKind::Expense => self.expense += amount,
            EntryKind::Income => self.income += amount,
        }
    }

    #[must_use]
    pub fn balance(&self) -> Amount {
        self.income - self.expense
    }

    /// Expense as a share of income, in whole percent, capped at 100.
    ///
    /// With no income, any expense reads as 100% and no movement reads as 0%.
    #[must_use]
    pub fn expense_ratio_percent(&self) -> u8 {
        let income = self.income.cents();
        let expense = self.expense.cents();
        if income > 0 {
            let income = i128::from(income);
            let ratio = (i128::from(expense.max(0)) * 100 + income / 2) / income;
            ratio.min(100) as u8
        } else if expense > 0 {
            100
        } else {
            0
        }
    }

    /// `true` when the nature split adds up to the totals on both sides.
    /// Only guaranteed when every counted entry has a nature.
    #[must_use]
    pub fn is_split_consistent(&self) -> bool {
        self.fixed_expense + self.variable_expense == self.expense
            && self.fixed_income + self.variable_income == self.income
    }
}

/// Totals for a whole year, with the per-month breakdown when the store
/// provides one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct YearTotals {
    pub year: i32,
    pub totals: Totals,
    pub by_month: Vec<(MonthKey, Totals)>,
}

impl YearTotals {
    #[must_use]
    pub fn empty(year: i32) -> Self {
        Self {
            year,
            ..Self::default()
        }
    }
}
