//! Ledger domain: amounts and the money input mask, month partitions,
//! entries, totals, CSV backups and the month-scoped cache.
//!
//! Nothing in this crate does I/O; the client crate feeds it with data from
//! the store.

pub use backup::{CsvCodec, Decoded, ExportScope, RowError};
pub use cache::{LedgerCache, RefreshSnapshot};
pub use currency::Currency;
pub use entry::{
    EntryData, EntryDraft, EntryId, EntryKind, LedgerEntry, Nature, PaymentMethod, PaymentPolicy,
    parse_date,
};
pub use error::EngineError;
pub use money::Amount;
pub use month::MonthKey;
pub use totals::{Totals, YearTotals};

pub mod backup;
mod cache;
mod currency;
mod entry;
mod error;
pub mod mask;
mod money;
mod month;
mod totals;
