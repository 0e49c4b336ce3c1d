//! CSV backups of the ledger.
//!
//! Columns, in order: `date, description, amount, kind, nature,
//! payment_method`. Dates are ISO, amounts use the canonical comma form and
//! labels are the store's (`Gasto`, `Fixo`, `Débito`, ...). Quoting follows
//! RFC 4180, so descriptions may contain commas, quotes and newlines.
//!
//! Both directions apply the same rules: an entry the encoder writes is one
//! the decoder reads back. Nature may be empty, as it is on older store rows.
//! The payment method follows the codec's [`PaymentPolicy`]. Decoding is
//! tolerant: a bad row is counted and reported, never fatal.

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};

use crate::{
    Amount, EngineError, EntryData, MonthKey, PaymentPolicy,
    entry::{fold_label, parse_date},
};

pub const HEADER: [&str; 6] = [
    "date",
    "description",
    "amount",
    "kind",
    "nature",
    "payment_method",
];

/// Header written by older exports of the store.
const LEGACY_HEADER: [&str; 6] = ["data", "descricao", "valor", "tipo", "natureza", "pagamento"];

/// What a backup covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportScope {
    /// Every entry in the store, across all months.
    All,
    /// Only the given month.
    Month(MonthKey),
}

impl ExportScope {
    /// Default file name for a backup of this scope.
    #[must_use]
    pub fn filename(self) -> String {
        match self {
            Self::All => "backup-completo.csv".to_string(),
            Self::Month(month) => format!("backup-{month}.csv"),
        }
    }
}

/// A row that could not be imported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowError {
    /// 1-based line of the row in the input.
    pub line: u64,
    pub error: EngineError,
}

/// Result of decoding a backup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    pub entries: Vec<EntryData>,
    pub inserted: usize,
    pub skipped: usize,
    pub errors: Vec<RowError>,
}

/// Encoder/decoder for ledger backups.
#[derive(Clone, Copy, Debug, Default)]
pub struct CsvCodec {
    payment_policy: PaymentPolicy,
}

impl CsvCodec {
    pub fn new(payment_policy: PaymentPolicy) -> Self {
        Self { payment_policy }
    }

    /// Writes a header row and one row per entry, in the given order.
    ///
    /// Fails on the first entry that decoding would reject, such as one
    /// without a payment method under [`PaymentPolicy::Required`].
    pub fn encode<'a>(
        &self,
        entries: impl IntoIterator<Item = &'a EntryData>,
    ) -> Result<String, EngineError> {
        let mut writer = WriterBuilder::new().from_writer(vec![]);
        writer.write_record(HEADER)?;

        for entry in entries {
            entry.check(self.payment_policy)?;
            let date = entry.date.format("%Y-%m-%d").to_string();
            let amount = entry.amount.to_string();
            writer.write_record([
                date.as_str(),
                entry.description.as_str(),
                amount.as_str(),
                entry.kind.label(),
                entry.nature.map(|n| n.label()).unwrap_or(""),
                entry.payment.map(|p| p.label()).unwrap_or(""),
            ])?;
        }

        let data = writer
            .into_inner()
            .map_err(|err| EngineError::Csv(err.to_string()))?;
        String::from_utf8(data).map_err(|err| EngineError::Csv(err.to_string()))
    }

    /// Parses a backup row by row.
    ///
    /// A leading header row (current or legacy) is recognised and not
    /// counted. Every other row either becomes an entry or is skipped with
    /// the reason recorded in [`Decoded::errors`].
    #[must_use]
    pub fn decode(&self, text: &str) -> Decoded {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(text.as_bytes());

        let mut decoded = Decoded::default();
        let mut first = true;
        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(err) => {
                    let line = err.position().map(|pos| pos.line()).unwrap_or(0);
                    decoded.skip(line, err.into());
                    continue;
                }
            };
            let line = record.position().map(|pos| pos.line()).unwrap_or(0);

            if std::mem::take(&mut first) && is_header(&record) {
                continue;
            }

            match self.parse_row(&record) {
                Ok(entry) => decoded.entries.push(entry),
                Err(err) => decoded.skip(line, err),
            }
        }

        decoded.inserted = decoded.entries.len();
        decoded
    }

    fn parse_row(&self, record: &StringRecord) -> Result<EntryData, EngineError> {
        if record.len() != HEADER.len() {
            return Err(EngineError::Csv(format!(
                "expected {} columns, found {}",
                HEADER.len(),
                record.len()
            )));
        }

        let date = parse_date(required(record, 0, "date")?)?;
        let description = required(record, 1, "description")?.to_string();
        let amount: Amount = required(record, 2, "amount")?.trim().parse()?;
        let kind = required(record, 3, "kind")?.parse()?;
        let nature = optional(record, 4).map(str::parse).transpose()?;
        let payment = optional(record, 5).map(str::parse).transpose()?;

        let entry = EntryData {
            date,
            amount,
            description,
            kind,
            nature,
            payment,
        };
        entry.check(self.payment_policy)?;
        Ok(entry)
    }
}

impl Decoded {
    fn skip(&mut self, line: u64, error: EngineError) {
        self.skipped += 1;
        self.errors.push(RowError { line, error });
    }
}

fn required<'r>(
    record: &'r StringRecord,
    idx: usize,
    name: &'static str,
) -> Result<&'r str, EngineError> {
    match record.get(idx) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(EngineError::MissingField(name)),
    }
}

fn optional(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|value| !value.is_empty())
}

fn is_header(record: &StringRecord) -> bool {
    let matches = |expected: &[&str]| {
        record.len() == expected.len()
            && record
                .iter()
                .zip(expected)
                .all(|(got, want)| fold_label(got).replace(' ', "_") == *want)
    };
    matches(&HEADER) || matches(&LEGACY_HEADER)
}
