//! Crate-wide error type for plant-store.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type PlantStoreResult<T> = Result<T, PlantStoreError>;

/// Root error type for the plant-store crate.
#[derive(Debug, Error)]
pub enum PlantStoreError {
    /// Missing or malformed store settings (URL, access key).
    #[error("plant store config error: {0}")]
    Config(String),

    /// Unauthorized or forbidden (HTTP 401/403).
    #[error("plant store rejected credentials (status {0})")]
    Unauthorized(u16),

    /// Other HTTP status (non-2xx).
    #[error("plant store http status error: status {0}")]
    HttpStatus(u16),

    /// Timeout at transport level.
    #[error("plant store timeout")]
    Timeout,

    /// Network/transport failure without HTTP status (DNS/connect/reset).
    #[error("plant store network error: {0}")]
    Network(String),

    /// Unexpected/invalid shape of the store response.
    #[error("invalid plant store response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for PlantStoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return PlantStoreError::Timeout;
        }

        if let Some(status) = e.status() {
            let code = status.as_u16();
            return match code {
                401 | 403 => PlantStoreError::Unauthorized(code),
                _ => PlantStoreError::HttpStatus(code),
            };
        }

        if e.is_decode() {
            return PlantStoreError::InvalidResponse(e.without_url().to_string());
        }

        PlantStoreError::Network(e.without_url().to_string())
    }
}
