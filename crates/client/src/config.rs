use std::time::Duration;

use chrono_tz::Tz;
use engine::PaymentPolicy;
use serde::Deserialize;

use crate::{
    HttpGateway, SyncOptions,
    error::{ClientError, Result},
};

/// Client section of the settings file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// The store's action endpoint, or a relay in front of it.
    pub endpoint: String,
    pub timeout_secs: u64,
    /// IANA name used to decide which month is "current".
    pub timezone: String,
    pub payment_policy: PaymentPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:3000/api/gs".to_string(),
            timeout_secs: 15,
            timezone: "America/Sao_Paulo".to_string(),
            payment_policy: PaymentPolicy::Required,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| ClientError::Config(format!("unknown timezone: {}", self.timezone)))
    }

    pub fn sync_options(&self) -> Result<SyncOptions> {
        Ok(SyncOptions {
            payment_policy: self.payment_policy,
            timezone: self.timezone()?,
        })
    }

    pub fn gateway(&self) -> Result<HttpGateway> {
        HttpGateway::new(&self.endpoint, self.timeout())
    }
}
