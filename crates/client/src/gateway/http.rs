use std::time::Duration;

use api_types::action::{Action, ActionRequest, Status};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;

use super::Gateway;
use crate::error::{ClientError, GatewayError, Result};

/// [`Gateway`] over HTTP: every action is a JSON POST to one endpoint.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    endpoint: Url,
    http: reqwest::Client,
}

impl HttpGateway {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|err| ClientError::Config(format!("invalid endpoint: {err}")))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ClientError::Config(format!("cannot build http client: {err}")))?;
        Ok(Self { endpoint, http })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl Gateway for HttpGateway {
    async fn call(&self, action: Action, payload: Value) -> std::result::Result<Value, GatewayError> {
        tracing::debug!(%action, endpoint = %self.endpoint, "calling store");
        let res = self
            .http
            .post(self.endpoint.clone())
            .json(&ActionRequest {
                action,
                data: payload,
            })
            .send()
            .await
            .map_err(transport)?;

        let status = res.status();
        let body = res.bytes().await.map_err(transport)?;
        read_response(status, &body)
    }
}

fn transport(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::new("the store did not answer in time")
    } else if err.is_connect() {
        GatewayError::new(format!("cannot reach the store: {err}"))
    } else {
        GatewayError::new(err.to_string())
    }
}

/// Turns a raw reply into the response object, or the error it stands for.
fn read_response(status: StatusCode, body: &[u8]) -> std::result::Result<Value, GatewayError> {
    let Some(value) = serde_json::from_slice::<Value>(body)
        .ok()
        .filter(Value::is_object)
    else {
        return Err(if status.is_success() {
            GatewayError::new("malformed response")
        } else {
            GatewayError::new(format!("HTTP {status}"))
        });
    };

    let head = Status::deserialize(&value).unwrap_or_default();
    if status.is_success() && head.ok {
        return Ok(value);
    }

    let message = match head.error {
        Some(error) if !error.trim().is_empty() => error,
        _ if !status.is_success() => format!("HTTP {status}"),
        _ => "the store reported a failure".to_string(),
    };
    Err(GatewayError::new(message))
}
