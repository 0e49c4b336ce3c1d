use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use engine::{EntryDraft, EntryKind, MonthKey, Nature, PaymentMethod};

use crate::settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "ledger")]
#[command(about = "Personal ledger: monthly entries, totals and CSV backups")]
pub struct Cli {
    /// Settings file (TOML). `ledger.toml` is read when present.
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override the store endpoint.
    #[arg(long, global = true)]
    pub endpoint: Option<String>,
    /// Override the timezone (IANA name).
    #[arg(long, global = true)]
    pub timezone: Option<String>,
    /// Override the log level.
    #[arg(long, global = true)]
    pub level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(endpoint) = &self.endpoint {
            settings.client.endpoint = endpoint.clone();
        }
        if let Some(timezone) = &self.timezone {
            settings.client.timezone = timezone.clone();
        }
        if let Some(level) = &self.level {
            settings.app.level = level.clone();
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(flatten)]
    Store(StoreCommand),
    /// Run the credential relay in front of the store.
    Relay,
}

#[derive(Subcommand, Debug)]
pub enum StoreCommand {
    /// List the months known to the store.
    Months,
    /// Show totals and entries of a month (the current one by default).
    Show(ShowArgs),
    /// Record a new entry.
    Add(AddArgs),
    /// Change an entry of a month.
    Edit(EditArgs),
    /// Remove an entry.
    Delete(DeleteArgs),
    /// Write a CSV backup.
    Export(ExportArgs),
    /// Load a CSV backup into the store.
    Import(ImportArgs),
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// `2026-10` or `Out/2026`.
    #[arg(long)]
    pub month: Option<MonthKey>,
    /// Only entries whose description contains this text.
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Defaults to today.
    #[arg(long)]
    pub date: Option<String>,
    /// Amount, e.g. `12,50`.
    #[arg(long)]
    pub value: String,
    #[arg(long)]
    pub description: String,
    /// `Gasto` or `Recebimento`.
    #[arg(long)]
    pub kind: EntryKind,
    /// `Fixo` or `Variável`.
    #[arg(long)]
    pub nature: Nature,
    /// `Débito` or `Crédito`.
    #[arg(long)]
    pub payment: Option<PaymentMethod>,
}

impl AddArgs {
    pub fn draft(self, today: EntryDraft) -> EntryDraft {
        EntryDraft {
            date: self.date.unwrap_or(today.date),
            value: self.value,
            description: self.description,
            kind: Some(self.kind),
            nature: Some(self.nature),
            payment: self.payment,
        }
    }
}

#[derive(Args, Debug)]
pub struct EditArgs {
    pub id: String,
    /// Month holding the entry; the current one by default.
    #[arg(long)]
    pub month: Option<MonthKey>,
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub value: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub kind: Option<EntryKind>,
    #[arg(long)]
    pub nature: Option<Nature>,
    #[arg(long)]
    pub payment: Option<PaymentMethod>,
}

impl EditArgs {
    /// Overlays the given flags on a pre-filled draft.
    pub fn apply(&self, mut draft: EntryDraft) -> EntryDraft {
        if let Some(date) = &self.date {
            draft.date = date.clone();
        }
        if let Some(value) = &self.value {
            draft.value = value.clone();
        }
        if let Some(description) = &self.description {
            draft.description = description.clone();
        }
        draft.kind = self.kind.or(draft.kind);
        draft.nature = self.nature.or(draft.nature);
        draft.payment = self.payment.or(draft.payment);
        draft
    }
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub id: String,
    #[arg(long)]
    pub month: Option<MonthKey>,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Only this month; the whole ledger when omitted.
    #[arg(long)]
    pub month: Option<MonthKey>,
    /// Output file; the backup's default name when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    pub file: PathBuf,
}
