use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Gateway contract violation: {0}")]
    GatewayContract(String),
}

pub type Result<T> = std::result::Result<T, PaymentError>;
