//! Local, month-scoped view of the ledger.
//!
//! The cache is a projection of the store: it never edits entries itself,
//! it only swaps in whole results fetched for the selected month. Every
//! entry it holds belongs to [`LedgerCache::selected_month`].

use crate::{EngineError, EntryId, LedgerEntry, MonthKey, Totals, YearTotals};

/// Everything a refresh brings back for one month, committed as a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefreshSnapshot {
    pub month: MonthKey,
    pub entries: Vec<LedgerEntry>,
    pub totals: Totals,
    pub year_totals: YearTotals,
}

#[derive(Clone, Debug, Default)]
pub struct LedgerCache {
    months: Vec<MonthKey>,
    selected: Option<MonthKey>,
    entries: Vec<LedgerEntry>,
    totals: Totals,
    year_totals: Option<YearTotals>,
    loaded: bool,
}

impl LedgerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Known months, oldest first.
    pub fn months(&self) -> &[MonthKey] {
        &self.months
    }

    /// Replaces the known months. Order and duplicates in the input do not
    /// matter.
    pub fn set_months(&mut self, months: impl IntoIterator<Item = MonthKey>) {
        self.months = months.into_iter().collect();
        self.months.sort();
        self.months.dedup();
    }

    /// Adds `month` to the known months if it is new.
    pub fn remember_month(&mut self, month: MonthKey) {
        if let Err(idx) = self.months.binary_search(&month) {
            self.months.insert(idx, month);
        }
    }

    /// Month the cached data belongs to.
    pub fn selected_month(&self) -> Option<MonthKey> {
        self.selected
    }

    /// Switches the cache to `month`.
    ///
    /// Data of the previous month is dropped so it can never be read as data
    /// of the new one. Year totals survive when the year does not change.
    pub fn set_selected_month(&mut self, month: MonthKey) {
        if self.selected == Some(month) {
            return;
        }
        self.selected = Some(month);
        self.remember_month(month);
        self.entries.clear();
        self.totals = Totals::default();
        self.loaded = false;
        if self
            .year_totals
            .as_ref()
            .is_some_and(|year| year.year != month.year())
        {
            self.year_totals = None;
        }
    }

    fn check_month(&self, month: MonthKey) -> Result<(), EngineError> {
        match self.selected {
            Some(selected) if selected == month => Ok(()),
            selected => Err(EngineError::StaleMonth {
                selected: selected.map_or_else(|| "none".to_string(), |m| m.to_string()),
                got: month,
            }),
        }
    }

    fn check_entries(month: MonthKey, entries: &[LedgerEntry]) -> Result<(), EngineError> {
        match entries.iter().find(|entry| entry.month() != month) {
            Some(foreign) => Err(EngineError::StaleMonth {
                selected: month.to_string(),
                got: foreign.month(),
            }),
            None => Ok(()),
        }
    }

    /// Replaces the entry list of `month`.
    ///
    /// Rejected, leaving the cache untouched, when `month` is not the
    /// selected month or when an entry belongs to another month.
    pub fn replace_entries(
        &mut self,
        month: MonthKey,
        entries: Vec<LedgerEntry>,
    ) -> Result<(), EngineError> {
        self.check_month(month)?;
        Self::check_entries(month, &entries)?;
        self.entries = entries;
        self.loaded = true;
        Ok(())
    }

    pub fn replace_totals(&mut self, totals: Totals) {
        self.totals = totals;
    }

    pub fn replace_year_totals(&mut self, year_totals: YearTotals) {
        self.year_totals = Some(year_totals);
    }

    /// Installs a refresh result: selected month, entries, month totals and
    /// year totals change together or not at all.
    pub fn commit(&mut self, snapshot: RefreshSnapshot) -> Result<(), EngineError> {
        Self::check_entries(snapshot.month, &snapshot.entries)?;
        if snapshot.year_totals.year != snapshot.month.year() {
            return Err(EngineError::InvalidMonth(format!(
                "year totals for {} do not match {}",
                snapshot.year_totals.year, snapshot.month
            )));
        }

        self.set_selected_month(snapshot.month);
        self.entries = snapshot.entries;
        self.totals = snapshot.totals;
        self.year_totals = Some(snapshot.year_totals);
        self.loaded = true;
        Ok(())
    }

    /// `true` once data for the selected month has been committed.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn find(&self, id: &EntryId) -> Option<&LedgerEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    /// Month totals as reported by the store.
    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    pub fn year_totals(&self) -> Option<&YearTotals> {
        self.year_totals.as_ref()
    }

    /// Month totals recomputed from the cached entries.
    pub fn derived_totals(&self) -> Totals {
        Totals::from_entries(self.entries.iter().map(|entry| &entry.data))
    }

    /// Entries whose description contains `term`, ignoring case, in cache
    /// order. A blank term returns every entry.
    pub fn filtered_entries(&self, term: &str) -> Vec<&LedgerEntry> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.entries.iter().collect();
        }
        self.entries
            .iter()
            .filter(|entry| entry.data.description.to_lowercase().contains(&term))
            .collect()
    }
}
