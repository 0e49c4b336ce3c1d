use std::time::Duration;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::RelayError;

/// `relay` section of the settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub bind: Option<String>,
    pub port: u16,
    /// Where the store listens. Requests fail with 500 while unset.
    pub upstream_url: Option<String>,
    pub upstream_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind: None,
            port: 3000,
            upstream_url: None,
            upstream_token: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
struct Upstream {
    url: String,
    token: String,
}

#[derive(Clone)]
struct RelayState {
    upstream: Option<Upstream>,
    http: reqwest::Client,
}

/// Whatever the client sent; a missing or broken body relays as nulls.
#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default)]
    action: Value,
    #[serde(default)]
    data: Value,
}

#[derive(Serialize)]
struct Forward<'a> {
    token: &'a str,
    action: Value,
    data: Value,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

async fn relay(State(state): State<RelayState>, body: Bytes) -> Result<Response, RelayError> {
    let upstream = state.upstream.as_ref().ok_or(RelayError::MissingConfig)?;
    let envelope: Envelope = serde_json::from_slice(&body).unwrap_or_default();
    tracing::debug!(action = %envelope.action, "relaying request");

    let res = state
        .http
        .post(upstream.url.as_str())
        .json(&Forward {
            token: &upstream.token,
            action: envelope.action,
            data: envelope.data,
        })
        .send()
        .await?;

    let status = res.status();
    let bytes = res.bytes().await?;
    let reply: Value = serde_json::from_slice(&bytes).unwrap_or_else(|_| json!({}));
    Ok((status, Json(reply)).into_response())
}

async fn method_not_allowed() -> RelayError {
    RelayError::MethodNotAllowed
}

pub fn router(config: &RelayConfig) -> Result<Router, RelayError> {
    let upstream = match (
        non_empty(config.upstream_url.as_deref()),
        non_empty(config.upstream_token.as_deref()),
    ) {
        (Some(url), Some(token)) => Some(Upstream { url, token }),
        _ => {
            tracing::warn!("relay upstream is not configured, requests will fail");
            None
        }
    };
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    Ok(Router::new()
        .route("/api/gs", post(relay).fallback(method_not_allowed))
        .with_state(RelayState { upstream, http }))
}

pub async fn run_with_listener(
    config: RelayConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), RelayError> {
    let addr = listener.local_addr()?;
    let router = router(&config)?;
    tracing::info!("Relay listening on {}", addr);

    axum::serve(listener, router).await?;
    Ok(())
}

pub fn spawn_with_listener(
    config: RelayConfig,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, RelayError> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(config, listener).await {
            tracing::error!("relay failed: {err}");
        }
    });

    Ok(addr)
}
