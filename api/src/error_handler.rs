use ai_llm_service::AiLlmError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use plant_qa::ProxyError;
use plant_store::PlantStoreError;
use serde::Serialize;
use thiserror::Error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("LLM client setup failed: {0}")]
    LlmSetup(#[from] AiLlmError),

    #[error("plant catalog setup failed: {0}")]
    StoreSetup(#[from] PlantStoreError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("{0}")]
    BadRequest(String),

    #[error("not found")]
    NotFound,

    /// Failure of the query pipeline, already classified.
    #[error(transparent)]
    Proxy(#[from] ProxyError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Proxy(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            AppError::Proxy(_) => StatusCode::INTERNAL_SERVER_ERROR,

            AppError::LlmSetup(_)
            | AppError::StoreSetup(_)
            | AppError::Bind(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Every failure leaves the service as `{"error": "<message>"}`.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(format!("Invalid request body: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn proxy_errors_map_to_400_or_500() {
        let bad = AppError::from(ProxyError::InvalidInput("Query is required".into()));
        assert_eq!(bad.status_code(), StatusCode::BAD_REQUEST);

        for err in [
            ProxyError::ServerConfiguration("GEMINI_API_KEY is not configured".into()),
            ProxyError::UpstreamHttp {
                status: 503,
                reason: "Service Unavailable".into(),
            },
            ProxyError::UpstreamFormat("no candidates returned".into()),
            ProxyError::UpstreamTimeout(Duration::from_secs(45)),
            ProxyError::Unknown("boom".into()),
        ] {
            assert_eq!(
                AppError::from(err).status_code(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }

    #[test]
    fn unparsable_body_is_a_bad_request() {
        let err = AppError::from(serde_json::from_slice::<serde_json::Value>(b"{oops").unwrap_err());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().starts_with("Invalid request body: "));
    }

    #[test]
    fn message_is_the_proxy_message() {
        let err = AppError::from(ProxyError::InvalidInput("Query is required".into()));
        assert_eq!(err.to_string(), "Query is required");
    }
}
