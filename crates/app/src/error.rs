use client::ClientError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("relay error: {0}")]
    Relay(#[from] relay::RelayError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Input(String),
}

impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Client(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}
