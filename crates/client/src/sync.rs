//! The sync controller: the only writer of the [`LedgerCache`].
//!
//! Reads always come back as a whole [`RefreshSnapshot`] for one month,
//! fetched with three concurrent store calls and committed in one step.
//! Mutations go to the store first and are followed by a full refresh; the
//! cache is never patched locally.
//!
//! Every refresh is tagged with a [`RefreshTicket`]. Only the ticket issued
//! last may commit, so a slow answer for a month the user already left is
//! dropped instead of overwriting newer data.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use engine::{
    CsvCodec, EntryData, EntryDraft, EntryId, ExportScope, LedgerCache, LedgerEntry, MonthKey,
    PaymentPolicy, RefreshSnapshot,
};
use tracing::{debug, error, info, warn};

use crate::{
    Backup, ImportReport, Outcome,
    error::{ClientError, GatewayError, Result},
    gateway::{Gateway, RemoteStore},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Loading,
    Ready,
    Error(String),
}

/// Identifies one refresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    month: MonthKey,
    generation: u64,
}

impl RefreshTicket {
    pub fn month(&self) -> MonthKey {
        self.month
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    pub payment_policy: PaymentPolicy,
    /// Decides which month is current when the store does not say.
    pub timezone: Tz,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            payment_policy: PaymentPolicy::Required,
            timezone: chrono_tz::America::Sao_Paulo,
        }
    }
}

#[derive(Debug)]
pub struct SyncController<G> {
    store: RemoteStore<G>,
    cache: LedgerCache,
    state: SyncState,
    options: SyncOptions,
    requested: Option<MonthKey>,
    generation: u64,
}

impl<G: Gateway> SyncController<G> {
    pub fn new(gateway: G, options: SyncOptions) -> Self {
        Self {
            store: RemoteStore::new(gateway),
            cache: LedgerCache::new(),
            state: SyncState::Idle,
            options,
            requested: None,
            generation: 0,
        }
    }

    pub fn cache(&self) -> &LedgerCache {
        &self.cache
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    pub fn gateway(&self) -> &G {
        self.store.gateway()
    }

    /// Month of the latest selection, which may still be loading.
    pub fn requested_month(&self) -> Option<MonthKey> {
        self.requested
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.options.timezone).date_naive()
    }

    pub fn current_month(&self) -> MonthKey {
        MonthKey::of_date(self.today())
    }

    pub fn filtered_entries(&self, term: &str) -> Vec<&LedgerEntry> {
        self.cache.filtered_entries(term)
    }

    /// Empty draft dated today, ready for the create form.
    pub fn new_draft(&self) -> EntryDraft {
        EntryDraft::dated(self.today())
    }

    fn fail(&mut self, err: GatewayError) -> ClientError {
        error!(error = %err, "store call failed");
        self.state = SyncState::Error(err.message().to_string());
        err.into()
    }

    /// Loads the month list and selects the current month.
    pub async fn init(&mut self) -> Result<Outcome> {
        let (months, current) = match self.store.init().await {
            Ok(init) => init,
            Err(err) => return Err(self.fail(err)),
        };
        self.cache.set_months(months);

        let month = current.unwrap_or_else(|| self.current_month());
        info!(months = self.cache.months().len(), %month, "store initialised");
        self.select_month(month).await
    }

    /// Makes `month` the latest request; any older ticket becomes stale.
    pub fn begin_refresh(&mut self, month: MonthKey) -> RefreshTicket {
        self.generation += 1;
        self.requested = Some(month);
        self.state = SyncState::Loading;
        debug!(%month, generation = self.generation, "refresh started");
        RefreshTicket {
            month,
            generation: self.generation,
        }
    }

    /// Runs the three reads for the ticket's month. The first failure fails
    /// the whole fetch.
    pub async fn fetch(
        &self,
        ticket: RefreshTicket,
    ) -> std::result::Result<RefreshSnapshot, GatewayError> {
        let month = ticket.month;
        let (totals, entries, year_totals) = tokio::try_join!(
            self.store.dashboard(month),
            self.store.list(month),
            self.store.dashboard_year(month.year()),
        )?;

        let (entries, foreign): (Vec<_>, Vec<_>) = entries
            .into_iter()
            .partition(|entry: &LedgerEntry| entry.month() == month);
        if !foreign.is_empty() {
            warn!(%month, dropped = foreign.len(), "store listed entries of other months");
        }

        Ok(RefreshSnapshot {
            month,
            entries,
            totals,
            year_totals,
        })
    }

    /// Applies a fetch result if `ticket` is still the latest one.
    ///
    /// A stale result, success or failure, is dropped and leaves both the
    /// cache and the state alone. A failure for the latest ticket moves to
    /// `Error` and keeps the previous cache content.
    pub fn commit(
        &mut self,
        ticket: RefreshTicket,
        result: std::result::Result<RefreshSnapshot, GatewayError>,
    ) -> Result<Outcome> {
        if ticket.generation != self.generation {
            warn!(month = %ticket.month, "discarding stale refresh");
            return Ok(Outcome::Discarded(ticket.month));
        }

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(err) => return Err(self.fail(err)),
        };
        let entries = snapshot.entries.len();
        if let Err(err) = self.cache.commit(snapshot) {
            return Err(self.fail(GatewayError::new(format!(
                "inconsistent store data: {err}"
            ))));
        }

        self.state = SyncState::Ready;
        info!(month = %ticket.month, entries, "refresh committed");
        Ok(Outcome::Refreshed(ticket.month))
    }

    pub async fn select_month(&mut self, month: MonthKey) -> Result<Outcome> {
        let ticket = self.begin_refresh(month);
        let result = self.fetch(ticket).await;
        self.commit(ticket, result)
    }

    /// Re-reads the selected month.
    pub async fn refresh(&mut self) -> Result<Outcome> {
        let month = self
            .requested
            .or(self.cache.selected_month())
            .ok_or(ClientError::NoMonthSelected)?;
        self.select_month(month).await
    }

    async fn refresh_after_mutation(&mut self, touched: MonthKey) -> Result<()> {
        self.cache.remember_month(touched);
        let month = self.requested.unwrap_or(touched);
        self.select_month(month).await.map(|_| ())
    }

    fn validate(&self, draft: &EntryDraft) -> Result<EntryData> {
        draft
            .validate(self.options.payment_policy)
            .map_err(|err| {
                warn!(error = %err, "entry rejected");
                ClientError::from(err)
            })
    }

    pub async fn create(&mut self, draft: &EntryDraft) -> Result<Outcome> {
        let data = self.validate(draft)?;
        let id = match self.store.add(&data).await {
            Ok(id) => id,
            Err(err) => return Err(self.fail(err)),
        };
        info!(%id, month = %data.month(), "entry created");

        self.refresh_after_mutation(data.month()).await?;
        Ok(Outcome::Created(id))
    }

    pub async fn update(&mut self, id: &EntryId, draft: &EntryDraft) -> Result<Outcome> {
        let data = self.validate(draft)?;
        if let Err(err) = self.store.update(id, &data).await {
            return Err(self.fail(err));
        }
        info!(%id, month = %data.month(), "entry updated");

        self.refresh_after_mutation(data.month()).await?;
        Ok(Outcome::Updated(id.clone()))
    }

    pub async fn delete(&mut self, id: &EntryId) -> Result<Outcome> {
        if let Err(err) = self.store.delete(id).await {
            return Err(self.fail(err));
        }
        info!(%id, "entry deleted");

        let touched = match self.cache.find(id) {
            Some(entry) => entry.month(),
            None => self.requested.unwrap_or_else(|| self.current_month()),
        };
        self.refresh_after_mutation(touched).await?;
        Ok(Outcome::Deleted(id.clone()))
    }

    /// Produces a backup.
    ///
    /// `All` asks the store for its full export. `Month` encodes locally,
    /// from the cache when that month is loaded, from the store otherwise.
    pub async fn export_backup(&self, scope: ExportScope) -> Result<Outcome> {
        let (filename, csv) = match scope {
            ExportScope::All => {
                let res = self.store.export_csv().await?;
                let filename = res
                    .filename
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| scope.filename());
                (filename, res.csv)
            }
            ExportScope::Month(month) => {
                let entries = if self.cache.selected_month() == Some(month)
                    && self.cache.is_loaded()
                {
                    self.cache.entries().to_vec()
                } else {
                    let mut entries = self.store.list(month).await?;
                    entries.retain(|entry| entry.month() == month);
                    entries
                };
                let codec = CsvCodec::new(self.options.payment_policy);
                let csv = codec.encode(entries.iter().map(|entry| &entry.data))?;
                (scope.filename(), csv)
            }
        };

        info!(%filename, bytes = csv.len(), "backup exported");
        Ok(Outcome::Exported(Backup {
            scope,
            filename,
            csv,
        }))
    }

    /// Imports a backup.
    ///
    /// Rows are checked locally first; only the valid ones are sent, in
    /// canonical form. Skipped counts add up local and store rejections.
    pub async fn import_backup(&mut self, text: &str) -> Result<Outcome> {
        let codec = CsvCodec::new(self.options.payment_policy);
        let decoded = codec.decode(text);
        for row in &decoded.errors {
            warn!(line = row.line, error = %row.error, "skipping backup row");
        }

        let mut report = ImportReport {
            inserted: 0,
            skipped: decoded.skipped as u64,
            rejected: decoded.errors,
        };
        if decoded.entries.is_empty() {
            info!(skipped = report.skipped, "nothing to import");
            return Ok(Outcome::Imported(report));
        }

        let csv = codec.encode(&decoded.entries)?;
        let res = match self.store.import_csv(csv).await {
            Ok(res) => res,
            Err(err) => return Err(self.fail(err)),
        };
        report.inserted = res.inserted;
        report.skipped += res.skipped;
        info!(
            inserted = report.inserted,
            skipped = report.skipped,
            "backup imported"
        );

        for entry in &decoded.entries {
            self.cache.remember_month(entry.month());
        }
        if let Some(month) = self.requested {
            self.select_month(month).await?;
        }
        Ok(Outcome::Imported(report))
    }
}
