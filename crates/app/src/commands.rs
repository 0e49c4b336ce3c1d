use client::{Gateway, Outcome, SyncController};
use engine::{EntryId, ExportScope, LedgerCache, LedgerEntry, MonthKey, Totals};

use crate::{
    cli::StoreCommand,
    error::{AppError, Result},
};

pub async fn run<G: Gateway>(sync: &mut SyncController<G>, command: StoreCommand) -> Result<()> {
    match command {
        StoreCommand::Months => {
            sync.init().await?;
            for month in sync.cache().months() {
                println!("{month}  {}", month.label());
            }
        }
        StoreCommand::Show(args) => {
            open(sync, args.month).await?;
            print_month(sync.cache(), args.search.as_deref().unwrap_or_default());
        }
        StoreCommand::Add(args) => {
            let draft = args.draft(sync.new_draft());
            let outcome = sync.create(&draft).await?;
            println!("{}", outcome.message());
            print_month(sync.cache(), "");
        }
        StoreCommand::Edit(args) => {
            open(sync, args.month).await?;
            let id = EntryId::new(args.id.as_str());
            let entry = sync
                .cache()
                .find(&id)
                .cloned()
                .ok_or_else(|| not_found(&id, sync.cache()))?;
            let draft = args.apply(engine::EntryDraft::from_entry(&entry));
            let outcome = sync.update(&entry.id, &draft).await?;
            println!("{}", outcome.message());
            print_month(sync.cache(), "");
        }
        StoreCommand::Delete(args) => {
            open(sync, args.month).await?;
            let id = EntryId::new(args.id);
            if sync.cache().find(&id).is_none() {
                return Err(not_found(&id, sync.cache()));
            }
            let outcome = sync.delete(&id).await?;
            println!("{}", outcome.message());
            print_month(sync.cache(), "");
        }
        StoreCommand::Export(args) => {
            let scope = args.month.map_or(ExportScope::All, ExportScope::Month);
            let outcome = sync.export_backup(scope).await?;
            if let Outcome::Exported(backup) = &outcome {
                let path = args
                    .out
                    .unwrap_or_else(|| backup.filename.clone().into());
                std::fs::write(&path, &backup.csv)?;
                println!("{} {}", outcome.message(), path.display());
            }
        }
        StoreCommand::Import(args) => {
            let text = std::fs::read_to_string(&args.file)?;
            sync.init().await?;
            let outcome = sync.import_backup(&text).await?;
            println!("{}", outcome.message());
            if let Outcome::Imported(report) = &outcome {
                for row in &report.rejected {
                    println!("  linha {}: {}", row.line, row.error);
                }
            }
        }
    }
    Ok(())
}

/// Loads `month`, or whatever the store calls current.
async fn open<G: Gateway>(sync: &mut SyncController<G>, month: Option<MonthKey>) -> Result<()> {
    match month {
        Some(month) => sync.select_month(month).await?,
        None => sync.init().await?,
    };
    Ok(())
}

fn not_found(id: &EntryId, cache: &LedgerCache) -> AppError {
    let month = cache
        .selected_month()
        .map_or_else(|| "-".to_string(), MonthKey::label);
    AppError::Input(format!("Lançamento {id} não encontrado em {month}."))
}

fn print_totals(title: &str, totals: &Totals) {
    println!("{title}");
    println!(
        "  Recebimentos {:>16}  (fixo {}, variável {})",
        totals.income.format_display(),
        totals.fixed_income.format_display(),
        totals.variable_income.format_display()
    );
    println!(
        "  Gastos       {:>16}  (fixo {}, variável {})",
        totals.expense.format_display(),
        totals.fixed_expense.format_display(),
        totals.variable_expense.format_display()
    );
    println!(
        "  Saldo        {:>16}  gastos/recebimentos {}%",
        totals.balance().format_display(),
        totals.expense_ratio_percent()
    );
}

fn print_entry(entry: &LedgerEntry) {
    let data = &entry.data;
    println!(
        "{:>6}  {}  {:<12} {:<9} {:<8} {:<24} {:>14}",
        entry.id.as_str(),
        data.date.format("%d/%m/%Y"),
        data.kind.label(),
        data.nature.map(|n| n.label()).unwrap_or("-"),
        data.payment.map(|p| p.label()).unwrap_or("-"),
        data.description,
        data.signed_amount().format_display(),
    );
}

fn print_month(cache: &LedgerCache, search: &str) {
    let Some(month) = cache.selected_month() else {
        return;
    };
    print_totals(&month.label(), cache.totals());
    if let Some(year) = cache.year_totals() {
        print_totals(&format!("Ano {}", year.year), &year.totals);
    }

    let entries = cache.filtered_entries(search);
    println!();
    if entries.is_empty() {
        println!("Nenhum lançamento.");
    }
    for entry in entries {
        print_entry(entry);
    }
}
