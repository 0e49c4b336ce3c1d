use engine::{EntryId, ExportScope, MonthKey, RowError};

/// What a successful controller operation did, with the message shown for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Fresh data for the month is in the cache.
    Refreshed(MonthKey),
    /// The result arrived after another month was requested and was dropped.
    Discarded(MonthKey),
    Created(EntryId),
    Updated(EntryId),
    Deleted(EntryId),
    Exported(Backup),
    Imported(ImportReport),
}

impl Outcome {
    pub fn message(&self) -> String {
        match self {
            Self::Refreshed(month) => format!("{} atualizado.", month.label()),
            Self::Discarded(month) => format!("Resultado de {} descartado.", month.label()),
            Self::Created(_) => "Salvo!".to_string(),
            Self::Updated(_) => "Atualizado!".to_string(),
            Self::Deleted(_) => "Excluído!".to_string(),
            Self::Exported(_) => "Backup CSV exportado!".to_string(),
            Self::Imported(report) => format!(
                "Importado! Linhas: {} • Ignoradas: {}",
                report.inserted, report.skipped
            ),
        }
    }
}

/// A CSV backup ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backup {
    pub scope: ExportScope,
    pub filename: String,
    pub csv: String,
}

/// Result of importing a backup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub inserted: u64,
    /// Rows rejected locally plus rows the store refused.
    pub skipped: u64,
    /// Why each locally rejected row was skipped.
    pub rejected: Vec<RowError>,
}
