//! Client side of the ledger: talks to the remote store and keeps the local
//! month-scoped cache in sync with it.

pub use config::ClientConfig;
pub use error::{ClientError, GatewayError, Result};
pub use gateway::{Gateway, HttpGateway, RemoteStore};
pub use outcome::{Backup, ImportReport, Outcome};
pub use sync::{RefreshTicket, SyncController, SyncOptions, SyncState};

mod config;
pub mod convert;
mod error;
mod gateway;
mod outcome;
mod sync;
