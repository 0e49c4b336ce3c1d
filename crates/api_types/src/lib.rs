//! Wire types spoken with the remote ledger store.
//!
//! Every request is an [`action::ActionRequest`] posted to a single endpoint.
//! Every response is a JSON object carrying an `ok` flag; on success the
//! action-specific fields sit next to the flag, on failure an `error` message
//! does.
//!
//! Field names follow the store's sheet columns (`desc`, `value`, `type`,
//! `pay`, `gasto`, `recebimento`, ...), so most structs rename their fields.

use serde::{Deserialize, Serialize};

pub mod action {
    use super::*;

    /// Actions understood by the store.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Action {
        Init,
        Dashboard,
        DashboardYear,
        List,
        Add,
        Update,
        Delete,
        ExportCsv,
        ImportCsv,
    }

    impl Action {
        /// Returns the action name as it travels on the wire.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Init => "init",
                Self::Dashboard => "dashboard",
                Self::DashboardYear => "dashboard_year",
                Self::List => "list",
                Self::Add => "add",
                Self::Update => "update",
                Self::Delete => "delete",
                Self::ExportCsv => "export_csv",
                Self::ImportCsv => "import_csv",
            }
        }
    }

    impl std::fmt::Display for Action {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.as_str())
        }
    }

    /// Request envelope: `{ "action": ..., "data": ... }`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ActionRequest<T> {
        pub action: Action,
        pub data: T,
    }

    /// The part of every response that tells success from failure.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct Status {
        #[serde(default)]
        pub ok: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub error: Option<String>,
    }

    /// Payload for actions that take no data (`init`).
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct Empty {}
}

/// Serde helpers for amounts.
///
/// The store reports amounts as JSON numbers in major units (`12.5`), while
/// older rows may carry text (`"12,50"`). Both are read into integer minor
/// units. Amounts are written back as JSON numbers.
pub mod minor {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(*value as f64 / 100.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Number(value) => {
                from_major(value).ok_or_else(|| D::Error::custom("amount out of range"))
            }
            Raw::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Ok(0);
                }
                let value: f64 = trimmed
                    .replace(',', ".")
                    .parse()
                    .map_err(|_| D::Error::custom(format!("invalid amount: {text}")))?;
                from_major(value).ok_or_else(|| D::Error::custom("amount out of range"))
            }
        }
    }

    /// Converts a major-unit float into minor units, rounding half away from zero.
    pub fn from_major(value: f64) -> Option<i64> {
        let scaled = (value * 100.0).round();
        if !scaled.is_finite() || scaled.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(scaled as i64)
    }
}

/// Same as [`minor`] but tolerates a missing/null field (reads as zero).
pub mod minor_or_zero {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        super::minor::serialize(value, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        #[derive(Deserialize)]
        struct Wrapper(#[serde(with = "crate::minor")] i64);

        Ok(Option::<Wrapper>::deserialize(deserializer)?
            .map(|Wrapper(value)| value)
            .unwrap_or(0))
    }
}

pub mod entry {
    use super::*;

    /// Store-assigned identifier. Sheets hand out row numbers, other
    /// backends hand out strings; the original form is kept so it can be
    /// sent back unchanged.
    #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum EntryRef {
        Number(i64),
        Text(String),
    }

    impl std::fmt::Display for EntryRef {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::Number(id) => write!(f, "{id}"),
                Self::Text(id) => f.write_str(id),
            }
        }
    }

    /// An entry as listed by the store.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct EntryView {
        pub id: EntryRef,
        /// ISO date (`YYYY-MM-DD`), possibly followed by a time part.
        pub date: String,
        /// Same date rendered `DD/MM/YYYY`; informational only.
        #[serde(rename = "dateBR", default, skip_serializing_if = "Option::is_none")]
        pub date_br: Option<String>,
        #[serde(rename = "desc", default)]
        pub description: String,
        #[serde(rename = "value", with = "crate::minor")]
        pub value_minor: i64,
        #[serde(rename = "type", default)]
        pub kind: String,
        #[serde(default)]
        pub nature: String,
        #[serde(rename = "pay", default, skip_serializing_if = "Option::is_none")]
        pub payment: Option<String>,
    }

    /// Entry fields as written by `add` and `update`.
    ///
    /// `value` is the canonical comma string (`"1234,56"`), exactly what the
    /// input mask produced.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct EntryFields {
        pub date: String,
        #[serde(rename = "desc")]
        pub description: String,
        pub value: String,
        #[serde(rename = "type")]
        pub kind: String,
        pub nature: String,
        /// Empty when no payment method was chosen.
        #[serde(default)]
        pub pay: String,
    }

    /// Payload of `add`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct EntryNew {
        #[serde(flatten)]
        pub fields: EntryFields,
        /// `YYYY-MM` partition the entry belongs to.
        pub month: String,
    }

    /// Payload of `update`: full replace of the record with this id.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct EntryUpdate {
        pub id: EntryRef,
        #[serde(flatten)]
        pub fields: EntryFields,
    }

    /// Payload of `delete`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct EntryDelete {
        pub id: EntryRef,
    }

    /// Response of `add`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct EntryCreated {
        pub id: EntryRef,
    }

    /// Response of `list`.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct EntryListResponse {
        #[serde(default)]
        pub items: Vec<EntryView>,
    }
}

pub mod month {
    use super::*;

    /// Payload of `dashboard` and `list`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct MonthQuery {
        /// `YYYY-MM`.
        pub month: String,
    }

    /// Payload of `dashboard_year`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct YearQuery {
        /// Four-digit year, as text.
        pub year: String,
    }

    /// Response of `init`.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct InitResponse {
        #[serde(default)]
        pub months: Vec<String>,
        #[serde(rename = "currentMonth", default)]
        pub current_month: Option<String>,
    }
}

pub mod totals {
    use super::*;

    /// Aggregates for a month or a year, in minor units.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TotalsView {
        #[serde(with = "crate::minor_or_zero", default)]
        pub gasto: i64,
        #[serde(with = "crate::minor_or_zero", default)]
        pub recebimento: i64,
        #[serde(with = "crate::minor_or_zero", default)]
        pub saldo: i64,
        #[serde(rename = "fixoGasto", with = "crate::minor_or_zero", default)]
        pub fixo_gasto: i64,
        #[serde(rename = "variavelGasto", with = "crate::minor_or_zero", default)]
        pub variavel_gasto: i64,
        #[serde(rename = "fixoReceb", with = "crate::minor_or_zero", default)]
        pub fixo_receb: i64,
        #[serde(rename = "variavelReceb", with = "crate::minor_or_zero", default)]
        pub variavel_receb: i64,
    }

    /// Response of `dashboard`.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct DashboardResponse {
        #[serde(default)]
        pub totals: TotalsView,
    }

    /// One row of the optional per-month breakdown in `dashboard_year`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct MonthTotalsView {
        pub month: String,
        #[serde(flatten)]
        pub totals: TotalsView,
    }

    /// Response of `dashboard_year`.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct DashboardYearResponse {
        #[serde(default)]
        pub totals: TotalsView,
        #[serde(rename = "byMonth", default, skip_serializing_if = "Option::is_none")]
        pub by_month: Option<Vec<MonthTotalsView>>,
    }
}

pub mod backup {
    use super::*;

    /// Payload of `export_csv`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ExportRequest {
        /// Only `"all"` is meaningful to the store.
        pub scope: String,
    }

    /// Response of `export_csv`.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct ExportResponse {
        #[serde(default)]
        pub csv: String,
        #[serde(default)]
        pub filename: Option<String>,
    }

    /// Payload of `import_csv`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ImportRequest {
        pub csv: String,
    }

    /// Response of `import_csv`.
    #[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
    pub struct ImportResponse {
        #[serde(default)]
        pub inserted: u64,
        #[serde(default)]
        pub skipped: u64,
    }
}
