#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use api_types::{
    action::Action,
    backup::ImportRequest,
    entry::{EntryDelete, EntryNew, EntryUpdate, EntryView},
    month::{MonthQuery, YearQuery},
    totals::MonthTotalsView,
};
use chrono::NaiveDate;
use client::{Gateway, GatewayError, convert};
use engine::{
    Amount, CsvCodec, EntryData, EntryId, EntryKind, LedgerEntry, MonthKey, Nature,
    PaymentMethod, PaymentPolicy, Totals,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

pub fn month(text: &str) -> MonthKey {
    text.parse().unwrap()
}

pub fn entry(date: &str, description: &str, cents: i64, kind: EntryKind) -> EntryData {
    EntryData {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        amount: Amount::new(cents),
        description: description.to_string(),
        kind,
        nature: Some(Nature::Variable),
        payment: Some(PaymentMethod::Debit),
    }
}

/// In-memory store answering the same actions as the real one.
#[derive(Default)]
pub struct FakeStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    entries: Vec<LedgerEntry>,
    next_id: u64,
    current_month: Option<String>,
    failing: HashSet<Action>,
    delays: HashMap<String, Duration>,
    calls: Vec<Action>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<EntryData>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.lock();
            for data in entries {
                inner.insert(data);
            }
        }
        store
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    pub fn set_current_month(&self, month: &str) {
        self.lock().current_month = Some(month.to_string());
    }

    pub fn fail(&self, action: Action) {
        self.lock().failing.insert(action);
    }

    pub fn recover(&self, action: Action) {
        self.lock().failing.remove(&action);
    }

    /// Delays every read scoped to `month`.
    pub fn delay_month(&self, month: &str, delay: Duration) {
        self.lock().delays.insert(month.to_string(), delay);
    }

    pub fn calls(&self) -> Vec<Action> {
        self.lock().calls.clone()
    }

    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.lock().entries.clone()
    }
}

impl Gateway for FakeStore {
    async fn call(&self, action: Action, payload: Value) -> Result<Value, GatewayError> {
        let delay = {
            let mut inner = self.lock();
            inner.calls.push(action);
            if inner.failing.contains(&action) {
                return Err(GatewayError::new(format!("{action} unavailable")));
            }
            payload
                .get("month")
                .and_then(Value::as_str)
                .and_then(|month| inner.delays.get(month).copied())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut body = self.lock().handle(action, payload)?;
        body["ok"] = json!(true);
        Ok(body)
    }
}

fn parse<T: DeserializeOwned>(payload: Value) -> Result<T, GatewayError> {
    serde_json::from_value(payload).map_err(|err| GatewayError::new(format!("bad payload: {err}")))
}

fn rejected(err: impl std::fmt::Display) -> GatewayError {
    GatewayError::new(err.to_string())
}

impl Inner {
    fn insert(&mut self, data: EntryData) -> u64 {
        self.next_id += 1;
        self.entries
            .push(LedgerEntry::new(EntryId::new(self.next_id.to_string()), data));
        self.next_id
    }

    fn totals(&self, keep: impl Fn(&LedgerEntry) -> bool) -> Totals {
        Totals::from_entries(self.entries.iter().filter(|&e| keep(e)).map(|e| &e.data))
    }

    fn position(&self, id: &EntryId) -> Result<usize, GatewayError> {
        self.entries
            .iter()
            .position(|entry| &entry.id == id)
            .ok_or_else(|| GatewayError::new("Linha não encontrada"))
    }

    fn handle(&mut self, action: Action, payload: Value) -> Result<Value, GatewayError> {
        match action {
            Action::Init => {
                let mut months: Vec<String> =
                    self.entries.iter().map(|e| e.month().to_string()).collect();
                months.sort();
                months.dedup();
                Ok(json!({ "months": months, "currentMonth": self.current_month }))
            }
            Action::Dashboard => {
                let query: MonthQuery = parse(payload)?;
                let month: MonthKey = query.month.parse().map_err(rejected)?;
                let totals = self.totals(|e| e.month() == month);
                Ok(json!({ "totals": convert::totals_view(&totals) }))
            }
            Action::DashboardYear => {
                let query: YearQuery = parse(payload)?;
                let year: i32 = query.year.parse().map_err(rejected)?;
                let mut months: Vec<MonthKey> = self
                    .entries
                    .iter()
                    .map(LedgerEntry::month)
                    .filter(|m| m.year() == year)
                    .collect();
                months.sort();
                months.dedup();
                let by_month: Vec<MonthTotalsView> = months
                    .into_iter()
                    .map(|m| MonthTotalsView {
                        month: m.to_string(),
                        totals: convert::totals_view(&self.totals(|e| e.month() == m)),
                    })
                    .collect();
                let totals = self.totals(|e| e.month().year() == year);
                Ok(json!({ "totals": convert::totals_view(&totals), "byMonth": by_month }))
            }
            Action::List => {
                let query: MonthQuery = parse(payload)?;
                let month: MonthKey = query.month.parse().map_err(rejected)?;
                let items: Vec<EntryView> = self
                    .entries
                    .iter()
                    .filter(|e| e.month() == month)
                    .map(convert::entry_view)
                    .collect();
                Ok(json!({ "items": items }))
            }
            Action::Add => {
                let new: EntryNew = parse(payload)?;
                let data = convert::entry_from_fields(&new.fields).map_err(rejected)?;
                let id = self.insert(data);
                Ok(json!({ "id": id }))
            }
            Action::Update => {
                let update: EntryUpdate = parse(payload)?;
                let data = convert::entry_from_fields(&update.fields).map_err(rejected)?;
                let idx = self.position(&convert::entry_id(&update.id))?;
                self.entries[idx].data = data;
                Ok(json!({}))
            }
            Action::Delete => {
                let delete: EntryDelete = parse(payload)?;
                let idx = self.position(&convert::entry_id(&delete.id))?;
                self.entries.remove(idx);
                Ok(json!({}))
            }
            Action::ExportCsv => {
                let csv = CsvCodec::new(PaymentPolicy::Optional)
                    .encode(self.entries.iter().map(|e| &e.data))
                    .map_err(rejected)?;
                Ok(json!({ "csv": csv, "filename": "backup-completo.csv" }))
            }
            Action::ImportCsv => {
                let request: ImportRequest = parse(payload)?;
                let decoded = CsvCodec::new(PaymentPolicy::Optional).decode(&request.csv);
                for data in decoded.entries {
                    self.insert(data);
                }
                Ok(json!({ "inserted": decoded.inserted, "skipped": decoded.skipped }))
            }
        }
    }
}
