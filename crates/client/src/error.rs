use engine::EngineError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Failure of a store call.
///
/// Transport errors, non-2xx statuses and `ok: false` replies all collapse
/// into this one shape; only the message tells them apart.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct GatewayError {
    message: String,
}

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("validation error: {0}")]
    Validation(EngineError),
    #[error("parse error: {0}")]
    Parse(EngineError),
    #[error("store error: {0}")]
    Gateway(#[from] GatewayError),
    #[error("no month selected")]
    NoMonthSelected,
    #[error("config error: {0}")]
    Config(String),
}

impl From<EngineError> for ClientError {
    fn from(value: EngineError) -> Self {
        if value.is_validation() {
            Self::Validation(value)
        } else {
            Self::Parse(value)
        }
    }
}

impl ClientError {
    /// Message shown to the user when an operation fails.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(EngineError::MissingField(field)) => {
                format!("Preencha o campo obrigatório: {}.", field_label(field))
            }
            Self::Validation(err) | Self::Parse(err) => err.to_string(),
            Self::Gateway(err) => format!("Erro: {}", err.message()),
            Self::NoMonthSelected => "Selecione um mês.".to_string(),
            Self::Config(msg) => msg.clone(),
        }
    }
}

fn field_label(field: &str) -> &str {
    match field {
        "description" => "descrição",
        "amount" => "valor",
        "kind" => "tipo",
        "nature" => "natureza",
        "payment method" => "pagamento",
        "date" => "data",
        other => other,
    }
}
