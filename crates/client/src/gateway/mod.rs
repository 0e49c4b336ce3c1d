//! Access to the remote ledger store.
//!
//! [`Gateway`] is the single primitive: post an action, get back the
//! response object or a [`GatewayError`]. [`RemoteStore`] layers one typed
//! method per action on top of it and converts wire shapes into engine
//! types.

use std::future::Future;

use api_types::{
    action::{Action, Empty},
    backup::{ExportRequest, ExportResponse, ImportRequest, ImportResponse},
    entry::{EntryCreated, EntryDelete, EntryListResponse, EntryNew, EntryUpdate},
    month::{InitResponse, MonthQuery, YearQuery},
    totals::{DashboardResponse, DashboardYearResponse},
};
use engine::{EngineError, EntryData, EntryId, LedgerEntry, MonthKey, Totals, YearTotals};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::warn;

use crate::{convert, error::GatewayError};

pub use http::HttpGateway;

mod http;

/// Sends actions to the store.
pub trait Gateway {
    /// Posts `{action, data: payload}` and returns the response object when
    /// the store reports success.
    fn call(
        &self,
        action: Action,
        payload: Value,
    ) -> impl Future<Output = Result<Value, GatewayError>> + Send;
}

/// Typed view of the store's actions.
#[derive(Debug, Clone)]
pub struct RemoteStore<G> {
    gateway: G,
}

fn malformed(action: Action, err: impl std::fmt::Display) -> GatewayError {
    GatewayError::new(format!("malformed {action} response: {err}"))
}

impl<G: Gateway> RemoteStore<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    async fn request<P, R>(&self, action: Action, payload: &P) -> Result<R, GatewayError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let payload = serde_json::to_value(payload)
            .map_err(|err| GatewayError::new(format!("cannot encode {action} payload: {err}")))?;
        let value = self.gateway.call(action, payload).await?;
        serde_json::from_value(value).map_err(|err| malformed(action, err))
    }

    /// Known months and the store's idea of the current one.
    pub async fn init(&self) -> Result<(Vec<MonthKey>, Option<MonthKey>), GatewayError> {
        let res: InitResponse = self.request(Action::Init, &Empty {}).await?;
        let months = res
            .months
            .iter()
            .map(|month| month.parse())
            .collect::<Result<Vec<MonthKey>, EngineError>>()
            .map_err(|err| malformed(Action::Init, err))?;
        let current = match res.current_month.as_deref().map(str::trim) {
            Some(month) if !month.is_empty() => {
                Some(month.parse().map_err(|err| malformed(Action::Init, err))?)
            }
            _ => None,
        };
        Ok((months, current))
    }

    pub async fn dashboard(&self, month: MonthKey) -> Result<Totals, GatewayError> {
        let res: DashboardResponse = self
            .request(Action::Dashboard, &MonthQuery {
                month: month.to_string(),
            })
            .await?;
        Ok(convert::totals_from_view(&res.totals))
    }

    pub async fn dashboard_year(&self, year: i32) -> Result<YearTotals, GatewayError> {
        let res: DashboardYearResponse = self
            .request(Action::DashboardYear, &YearQuery {
                year: year.to_string(),
            })
            .await?;
        convert::year_totals_from_response(year, &res)
            .map_err(|err| malformed(Action::DashboardYear, err))
    }

    /// Entries of `month`. Rows that cannot be read are dropped with a
    /// warning so the rest of the month stays visible.
    pub async fn list(&self, month: MonthKey) -> Result<Vec<LedgerEntry>, GatewayError> {
        let res: EntryListResponse = self
            .request(Action::List, &MonthQuery {
                month: month.to_string(),
            })
            .await?;
        let entries = res
            .items
            .into_iter()
            .filter_map(|view| {
                let id = convert::entry_id(&view.id);
                convert::entry_from_view(view)
                    .inspect_err(|err| {
                        warn!(%month, %id, error = %err, "dropping unreadable entry");
                    })
                    .ok()
            })
            .collect();
        Ok(entries)
    }

    pub async fn add(&self, data: &EntryData) -> Result<EntryId, GatewayError> {
        let res: EntryCreated = self
            .request(Action::Add, &EntryNew {
                fields: convert::entry_fields(data),
                month: data.month().to_string(),
            })
            .await?;
        Ok(convert::entry_id(&res.id))
    }

    pub async fn update(&self, id: &EntryId, data: &EntryData) -> Result<(), GatewayError> {
        let _: Empty = self
            .request(Action::Update, &EntryUpdate {
                id: convert::entry_ref(id),
                fields: convert::entry_fields(data),
            })
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: &EntryId) -> Result<(), GatewayError> {
        let _: Empty = self
            .request(Action::Delete, &EntryDelete {
                id: convert::entry_ref(id),
            })
            .await?;
        Ok(())
    }

    /// Full backup as produced by the store.
    pub async fn export_csv(&self) -> Result<ExportResponse, GatewayError> {
        self.request(Action::ExportCsv, &ExportRequest {
            scope: "all".to_string(),
        })
        .await
    }

    pub async fn import_csv(&self, csv: String) -> Result<ImportResponse, GatewayError> {
        self.request(Action::ImportCsv, &ImportRequest { csv }).await
    }
}
