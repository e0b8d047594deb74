use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MarketError {
    // Provider / chain errors
    ProviderRejected(i32, String),
    NetworkError(String),
    ConnectionTimeout,
    InvalidResponse(String),
    ConfirmationTimeout(u64),

    // Storage errors
    StorageError(String),
    FileNotFound(String),
    PermissionDenied(String),

    // Validation errors
    ValidationError(String),
    InvalidAddress(String),
    InvalidAmount(String),

    // Application errors
    NotInitialized,
    NotConnected,
    AccountMismatch(String),
    AlreadyExists(String),
    NotFound(String),

    // Generic errors
    Unknown(String),
}

impl fmt::Display for MarketError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MarketError::ProviderRejected(code, msg) => {
                write!(f, "Wallet provider rejected request ({}): {}", code, msg)
            }
            MarketError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            MarketError::ConnectionTimeout => write!(f, "Connection timeout"),
            MarketError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            MarketError::ConfirmationTimeout(blocks) => {
                write!(f, "Transaction not found after {} blocks", blocks)
            }

            MarketError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            MarketError::FileNotFound(msg) => write!(f, "File not found: {}", msg),
            MarketError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),

            MarketError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            MarketError::InvalidAddress(msg) => write!(f, "Invalid address: {}", msg),
            MarketError::InvalidAmount(msg) => write!(f, "Invalid amount: {}", msg),

            MarketError::NotInitialized => write!(f, "Market client not initialized"),
            MarketError::NotConnected => write!(f, "Wallet is not connected"),
            MarketError::AccountMismatch(msg) => write!(f, "Account mismatch: {}", msg),
            MarketError::AlreadyExists(msg) => write!(f, "Already exists: {}", msg),
            MarketError::NotFound(msg) => write!(f, "Not found: {}", msg),

            MarketError::Unknown(msg) => write!(f, "Unknown error: {}", msg),
        }
    }
}

impl std::error::Error for MarketError {}

pub type MarketResult<T> = Result<T, MarketError>;

// Helper macro for easy error creation
#[macro_export]
macro_rules! market_error {
    ($variant:ident, $msg:expr) => {
        MarketError::$variant($msg.to_string())
    };
    ($variant:ident) => {
        MarketError::$variant
    };
}

// Conversion helpers
impl From<std::io::Error> for MarketError {
    fn from(error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => MarketError::FileNotFound(error.to_string()),
            std::io::ErrorKind::PermissionDenied => {
                MarketError::PermissionDenied(error.to_string())
            }
            _ => MarketError::StorageError(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for MarketError {
    fn from(error: serde_json::Error) -> Self {
        MarketError::ValidationError(format!("JSON error: {}", error))
    }
}
