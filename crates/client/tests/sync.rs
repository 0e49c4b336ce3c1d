use std::time::Duration;

use api_types::action::Action;
use client::{ClientError, GatewayError, Outcome, SyncController, SyncOptions, SyncState};
use engine::{
    Amount, CsvCodec, EngineError, EntryDraft, EntryKind, ExportScope, LedgerCache, Nature,
    PaymentMethod,
};

mod support;

use support::{FakeStore, entry, month};

fn descriptions(cache: &LedgerCache) -> Vec<&str> {
    cache
        .entries()
        .iter()
        .map(|e| e.data.description.as_str())
        .collect()
}

fn october_store() -> FakeStore {
    let store = FakeStore::with_entries(vec![
        entry("2026-09-28", "Luz", 8_000, EntryKind::Expense),
        entry("2026-10-01", "Salário", 500_000, EntryKind::Income),
        entry("2026-10-05", "Mercado", 4_590, EntryKind::Expense),
        entry("2026-10-09", "Padaria", 1_250, EntryKind::Expense),
    ]);
    store.set_current_month("2026-10");
    store
}

async fn ready(store: FakeStore) -> SyncController<FakeStore> {
    let mut sync = SyncController::new(store, SyncOptions::default());
    sync.init().await.unwrap();
    sync
}

fn draft(date: &str, description: &str, value: &str) -> EntryDraft {
    EntryDraft {
        date: date.to_string(),
        value: value.to_string(),
        description: description.to_string(),
        kind: Some(EntryKind::Expense),
        nature: Some(Nature::Variable),
        payment: Some(PaymentMethod::Credit),
    }
}

#[tokio::test]
async fn init_selects_the_store_current_month() {
    let mut sync = SyncController::new(october_store(), SyncOptions::default());
    assert_eq!(sync.state(), &SyncState::Idle);

    let outcome = sync.init().await.unwrap();
    assert_eq!(outcome, Outcome::Refreshed(month("2026-10")));
    assert_eq!(sync.state(), &SyncState::Ready);
    assert_eq!(sync.cache().months(), [month("2026-09"), month("2026-10")]);
    assert_eq!(descriptions(sync.cache()), ["Salário", "Mercado", "Padaria"]);
    assert_eq!(sync.cache().derived_totals(), *sync.cache().totals());

    let year = sync.cache().year_totals().unwrap();
    assert_eq!(year.year, 2026);
    assert_eq!(year.by_month.len(), 2);
    assert_eq!(year.totals.expense, Amount::new(13_840));
}

#[tokio::test]
async fn init_without_current_month_uses_the_configured_timezone() {
    let mut sync = SyncController::new(FakeStore::new(), SyncOptions::default());
    sync.init().await.unwrap();
    assert_eq!(sync.cache().selected_month(), Some(sync.current_month()));
    assert!(sync.cache().is_loaded());
    assert!(sync.cache().entries().is_empty());
}

#[tokio::test]
async fn refresh_reads_three_actions_concurrently() {
    let mut sync = ready(october_store()).await;
    let before = sync.gateway().calls().len();

    sync.refresh().await.unwrap();
    assert_eq!(
        sync.gateway().calls()[before..],
        [Action::Dashboard, Action::List, Action::DashboardYear]
    );
}

#[tokio::test]
async fn late_result_for_a_previous_selection_is_dropped() {
    let store = october_store();
    store.delay_month("2026-09", Duration::from_millis(50));
    let mut sync = SyncController::new(store, SyncOptions::default());

    let a = sync.begin_refresh(month("2026-09"));
    let b = sync.begin_refresh(month("2026-10"));
    let (result_a, result_b) = tokio::join!(sync.fetch(a), sync.fetch(b));

    assert_eq!(
        sync.commit(b, result_b).unwrap(),
        Outcome::Refreshed(month("2026-10"))
    );
    assert_eq!(
        sync.commit(a, result_a).unwrap(),
        Outcome::Discarded(month("2026-09"))
    );
    assert_eq!(sync.cache().selected_month(), Some(month("2026-10")));
    assert_eq!(descriptions(sync.cache()), ["Salário", "Mercado", "Padaria"]);
    assert_eq!(sync.state(), &SyncState::Ready);
}

#[tokio::test]
async fn early_result_for_a_previous_selection_is_dropped_too() {
    let mut sync = SyncController::new(october_store(), SyncOptions::default());

    let a = sync.begin_refresh(month("2026-09"));
    let result_a = sync.fetch(a).await;
    let b = sync.begin_refresh(month("2026-10"));

    assert_eq!(
        sync.commit(a, result_a).unwrap(),
        Outcome::Discarded(month("2026-09"))
    );
    assert_eq!(
        sync.commit(a, Err(GatewayError::new("timeout"))).unwrap(),
        Outcome::Discarded(month("2026-09"))
    );
    assert_eq!(sync.state(), &SyncState::Loading);
    assert!(!sync.cache().is_loaded());

    let result_b = sync.fetch(b).await;
    sync.commit(b, result_b).unwrap();
    assert_eq!(sync.cache().selected_month(), Some(month("2026-10")));
}

#[tokio::test]
async fn failed_refresh_keeps_the_previous_month() {
    let mut sync = ready(october_store()).await;
    sync.gateway().fail(Action::List);

    let err = sync.select_month(month("2026-09")).await.unwrap_err();
    assert!(matches!(err, ClientError::Gateway(_)));
    assert_eq!(sync.state(), &SyncState::Error("list unavailable".to_string()));
    assert_eq!(sync.cache().selected_month(), Some(month("2026-10")));
    assert_eq!(sync.cache().entries().len(), 3);

    sync.gateway().recover(Action::List);
    sync.select_month(month("2026-09")).await.unwrap();
    assert_eq!(descriptions(sync.cache()), ["Luz"]);
}

#[tokio::test]
async fn failed_update_leaves_entries_and_totals_unchanged() {
    let mut sync = ready(october_store()).await;
    let entries = sync.cache().entries().to_vec();
    let totals = *sync.cache().totals();
    sync.gateway().fail(Action::Update);

    let target = entries[1].clone();
    let mut edit = EntryDraft::from_entry(&target);
    edit.value = "999,99".to_string();
    let err = sync.update(&target.id, &edit).await.unwrap_err();

    assert!(matches!(err, ClientError::Gateway(_)));
    assert!(matches!(sync.state(), SyncState::Error(_)));
    assert_eq!(sync.cache().entries(), entries);
    assert_eq!(*sync.cache().totals(), totals);
    assert_eq!(sync.gateway().entries()[2].data.amount, Amount::new(4_590));
}

#[tokio::test]
async fn invalid_drafts_never_reach_the_store() {
    let mut sync = ready(october_store()).await;
    let calls = sync.gateway().calls().len();

    let mut no_nature = draft("2026-10-10", "Farmácia", "23,90");
    no_nature.nature = None;
    let err = sync.create(&no_nature).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Validation(EngineError::MissingField("nature"))
    ));

    let mut no_payment = draft("2026-10-10", "Farmácia", "23,90");
    no_payment.payment = None;
    let err = sync.create(&no_payment).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Validation(EngineError::MissingField("payment method"))
    ));

    let bad_value = draft("2026-10-10", "Farmácia", "R$ 23,90");
    assert!(matches!(
        sync.create(&bad_value).await,
        Err(ClientError::Parse(_))
    ));

    assert_eq!(sync.gateway().calls().len(), calls);
    assert_eq!(sync.state(), &SyncState::Ready);
}

#[tokio::test]
async fn create_refetches_the_selected_month() {
    let mut sync = ready(october_store()).await;
    let before = sync.gateway().calls().len();

    let outcome = sync
        .create(&draft("2026-10-12", "Farmácia", "23,90"))
        .await
        .unwrap();
    assert!(matches!(outcome, Outcome::Created(_)));
    assert_eq!(outcome.message(), "Salvo!");
    assert_eq!(
        sync.gateway().calls()[before..],
        [
            Action::Add,
            Action::Dashboard,
            Action::List,
            Action::DashboardYear
        ]
    );
    assert_eq!(
        descriptions(sync.cache()),
        ["Salário", "Mercado", "Padaria", "Farmácia"]
    );
    assert_eq!(sync.cache().totals().expense, Amount::new(8_230));
    assert_eq!(sync.cache().derived_totals(), *sync.cache().totals());
}

#[tokio::test]
async fn create_in_another_month_keeps_the_selection() {
    let mut sync = ready(october_store()).await;

    sync.create(&draft("2026-12-24", "Presentes", "300,00"))
        .await
        .unwrap();
    assert_eq!(sync.cache().selected_month(), Some(month("2026-10")));
    assert_eq!(sync.cache().entries().len(), 3);
    assert_eq!(sync.cache().months().last(), Some(&month("2026-12")));
}

#[tokio::test]
async fn update_and_delete_round_trip_through_the_store() {
    let mut sync = ready(october_store()).await;
    let target = sync.cache().entries()[2].clone();

    let mut edit = EntryDraft::from_entry(&target);
    edit.description = "Padaria do Zé".to_string();
    let outcome = sync.update(&target.id, &edit).await.unwrap();
    assert_eq!(outcome.message(), "Atualizado!");
    assert_eq!(
        sync.filtered_entries("zé")
            .iter()
            .map(|e| e.id.clone())
            .collect::<Vec<_>>(),
        [target.id.clone()]
    );

    let outcome = sync.delete(&target.id).await.unwrap();
    assert_eq!(outcome.message(), "Excluído!");
    assert!(sync.cache().find(&target.id).is_none());
    assert_eq!(sync.cache().totals().expense, Amount::new(4_590));
}

#[tokio::test]
async fn ratio_and_balance_without_income() {
    let store = FakeStore::with_entries(vec![entry(
        "2026-10-03",
        "Cinema",
        5_000,
        EntryKind::Expense,
    )]);
    store.set_current_month("2026-10");
    let sync = ready(store).await;

    let totals = sync.cache().totals();
    assert_eq!(totals.income, Amount::ZERO);
    assert_eq!(totals.balance(), Amount::new(-5_000));
    assert_eq!(totals.expense_ratio_percent(), 100);
}

#[tokio::test]
async fn import_skips_the_malformed_row() {
    let mut sync = ready(october_store()).await;
    let imported: Vec<_> = (1..=10)
        .map(|day| {
            entry(
                &format!("2026-11-{day:02}"),
                &format!("Compra {day}"),
                1_000 + i64::from(day),
                EntryKind::Expense,
            )
        })
        .collect();
    let csv = CsvCodec::default().encode(&imported).unwrap();
    let mut lines: Vec<&str> = csv.lines().collect();
    lines.insert(3, "2026-11-31,Data impossível,\"1,00\",Gasto,Fixo,Débito");
    let text = lines.join("\n");

    let outcome = sync.import_backup(&text).await.unwrap();
    let Outcome::Imported(report) = &outcome else {
        panic!("unexpected outcome {outcome:?}");
    };
    assert_eq!((report.inserted, report.skipped), (10, 1));
    assert_eq!(report.rejected[0].line, 4);
    assert_eq!(outcome.message(), "Importado! Linhas: 10 • Ignoradas: 1");

    let stored: Vec<_> = sync
        .gateway()
        .entries()
        .into_iter()
        .map(|e| e.data)
        .filter(|data| data.month() == month("2026-11"))
        .collect();
    assert_eq!(stored, imported);
    assert!(sync.cache().months().contains(&month("2026-11")));
}

#[tokio::test]
async fn import_with_no_valid_rows_does_not_call_the_store() {
    let mut sync = ready(october_store()).await;
    let calls = sync.gateway().calls().len();

    let outcome = sync
        .import_backup("date,description,amount,kind,nature,payment_method\nlixo\n")
        .await
        .unwrap();
    assert_eq!(outcome.message(), "Importado! Linhas: 0 • Ignoradas: 1");
    assert_eq!(sync.gateway().calls().len(), calls);
}

#[tokio::test]
async fn exports_full_and_monthly_backups() {
    let sync = ready(october_store()).await;
    let codec = CsvCodec::default();

    let Outcome::Exported(all) = sync.export_backup(ExportScope::All).await.unwrap() else {
        panic!("expected a backup");
    };
    assert_eq!(all.filename, "backup-completo.csv");
    assert_eq!(codec.decode(&all.csv).inserted, 4);

    let october = ExportScope::Month(month("2026-10"));
    let Outcome::Exported(local) = sync.export_backup(october).await.unwrap() else {
        panic!("expected a backup");
    };
    assert_eq!(local.filename, "backup-2026-10.csv");
    assert_eq!(
        codec.decode(&local.csv).entries,
        sync.cache()
            .entries()
            .iter()
            .map(|e| e.data.clone())
            .collect::<Vec<_>>()
    );

    let calls = sync.gateway().calls().len();
    let september = ExportScope::Month(month("2026-09"));
    let Outcome::Exported(remote) = sync.export_backup(september).await.unwrap() else {
        panic!("expected a backup");
    };
    assert_eq!(sync.gateway().calls()[calls..], [Action::List]);
    assert_eq!(codec.decode(&remote.csv).inserted, 1);
}
