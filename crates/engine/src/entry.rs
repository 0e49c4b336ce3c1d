//! Ledger entries and the form draft they are created from.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{Amount, EngineError, MonthKey, mask};

/// Folds a label for comparison: trimmed, lowercase, accents stripped.
///
/// Works on the compatibility decomposition, so precomposed (`Débito`) and
/// decomposed (`De\u{301}bito`) spellings fold to the same key.
pub(crate) fn fold_label(value: &str) -> String {
    value
        .trim()
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Declares a label enum: the store's label for `Display`, and a lenient
/// `FromStr` accepting the store label (with or without accents) and the
/// English name.
macro_rules! label_enum {
    ($(#[$meta:meta])* $name:ident, $field:literal, { $($variant:ident => $label:literal, $english:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Label used by the store and the backup files.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = EngineError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let folded = fold_label(s);
                $(
                    if folded == fold_label($label) || folded == $english {
                        return Ok(Self::$variant);
                    }
                )+
                Err(EngineError::UnknownLabel {
                    field: $field,
                    value: s.trim().to_string(),
                })
            }
        }
    };
}

label_enum!(
    /// Direction of a movement.
    EntryKind, "kind", {
        Expense => "Gasto", "expense",
        Income => "Recebimento", "income",
    }
);

label_enum!(
    /// Whether a movement recurs every month.
    Nature, "nature", {
        Fixed => "Fixo", "fixed",
        Variable => "Variável", "variable",
    }
);

label_enum!(
    /// How a movement was paid.
    PaymentMethod, "payment method", {
        Debit => "Débito", "debit",
        Credit => "Crédito", "credit",
    }
);

/// Whether entries must carry a payment method.
///
/// The store schema expects one, but older flows never enforced it. The
/// policy is chosen once in configuration and honoured everywhere entries are
/// validated: the create/update forms and backup import.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPolicy {
    #[default]
    Required,
    Optional,
}

/// Opaque, store-assigned entry identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses an entry date. The store sends ISO dates, sometimes with a time
/// part appended; backups edited by hand may use `DD/MM/YYYY`.
pub fn parse_date(text: &str) -> Result<NaiveDate, EngineError> {
    let trimmed = text.trim();
    if let Some(iso) = trimmed.get(..10)
        && let Ok(date) = NaiveDate::parse_from_str(iso, "%Y-%m-%d")
    {
        return Ok(date);
    }
    NaiveDate::parse_from_str(trimmed, "%d/%m/%Y")
        .map_err(|_| EngineError::InvalidDate(trimmed.to_string()))
}

/// Every field of an entry except its identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryData {
    pub date: NaiveDate,
    pub amount: Amount,
    pub description: String,
    pub kind: EntryKind,
    /// Older store rows may lack a nature; new entries always carry one.
    pub nature: Option<Nature>,
    pub payment: Option<PaymentMethod>,
}

impl EntryData {
    /// Month partition the entry belongs to.
    #[must_use]
    pub fn month(&self) -> MonthKey {
        MonthKey::of_date(self.date)
    }

    /// Checks the invariants the type system does not cover.
    pub fn check(&self, policy: PaymentPolicy) -> Result<(), EngineError> {
        if self.description.trim().is_empty() {
            return Err(EngineError::MissingField("description"));
        }
        if self.amount.is_negative() {
            return Err(EngineError::InvalidAmount(
                "amount must not be negative".to_string(),
            ));
        }
        if policy == PaymentPolicy::Required && self.payment.is_none() {
            return Err(EngineError::MissingField("payment method"));
        }
        Ok(())
    }

    /// Signed contribution to a balance: income adds, expense subtracts.
    #[must_use]
    pub fn signed_amount(&self) -> Amount {
        match self.kind {
            EntryKind::Income => self.amount,
            EntryKind::Expense => -self.amount,
        }
    }
}

/// One recorded income or expense, as known to the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub data: EntryData,
}

impl LedgerEntry {
    pub fn new(id: EntryId, data: EntryData) -> Self {
        Self { id, data }
    }

    #[must_use]
    pub fn month(&self) -> MonthKey {
        self.data.month()
    }
}

/// Raw form state for creating or editing an entry.
///
/// Text fields hold what the user typed. `value` normally comes out of the
/// input mask; text that bypassed it is parsed strictly, never re-masked.
/// Selections are `None` until the user picks one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub date: String,
    pub value: String,
    pub description: String,
    pub kind: Option<EntryKind>,
    pub nature: Option<Nature>,
    pub payment: Option<PaymentMethod>,
}

impl EntryDraft {
    /// Empty draft dated `today`.
    #[must_use]
    pub fn dated(today: NaiveDate) -> Self {
        Self {
            date: today.format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }

    /// Pre-fills a draft for editing an existing entry.
    #[must_use]
    pub fn from_entry(entry: &LedgerEntry) -> Self {
        Self {
            date: entry.data.date.format("%Y-%m-%d").to_string(),
            value: entry.data.amount.to_string(),
            description: entry.data.description.clone(),
            kind: Some(entry.data.kind),
            nature: entry.data.nature,
            payment: entry.data.payment,
        }
    }

    /// Validates the draft. Nothing leaves the client unless this passes.
    ///
    /// Description, amount, kind and nature are always required; the payment
    /// method follows `policy`.
    pub fn validate(&self, policy: PaymentPolicy) -> Result<EntryData, EngineError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(EngineError::MissingField("description"));
        }

        if self.value.trim().is_empty() {
            return Err(EngineError::MissingField("amount"));
        }
        let amount = mask::to_number(&self.value)?;

        let kind = self.kind.ok_or(EngineError::MissingField("kind"))?;
        let nature = self.nature.ok_or(EngineError::MissingField("nature"))?;

        if self.date.trim().is_empty() {
            return Err(EngineError::MissingField("date"));
        }
        let date = parse_date(&self.date)?;

        let data = EntryData {
            date,
            amount,
            description: description.to_string(),
            kind,
            nature: Some(nature),
            payment: self.payment,
        };
        data.check(policy)?;
        Ok(data)
    }
}
