//! HTTP surface of the plant information proxy.
//!
//! - `POST /gemini-plant-info` answers `{query, plantInfo?}` with `{content}`
//! - `OPTIONS` anywhere is answered by the CORS layer
//! - `GET /health`, `GET /health/llm`
//!
//! Errors always leave as `{"error": "<message>"}`.

pub mod app_state;
pub mod error_handler;
mod routes;

pub use app_state::AppState;
pub use error_handler::{AppError, AppResult};

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    routing::{get, post},
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
};
use tracing::{error, info};

use crate::routes::{
    health_route::{health, llm_health, not_found},
    plant_info::plant_info_route::gemini_plant_info,
};

/// Listen address used when `API_ADDRESS` is not set.
pub const DEFAULT_ADDRESS: &str = "0.0.0.0:8080";

/// Reads `API_ADDRESS` through `vars`, falling back to [`DEFAULT_ADDRESS`].
pub fn address_from_vars<F>(vars: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    vars("API_ADDRESS")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_ADDRESS.to_string())
}

/// Request headers the Supabase client sends, advertised on every response.
pub const CLIENT_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Browser clients call from any origin with the Supabase client headers.
/// Every OPTIONS request is answered here with an empty 200.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ])
}

/// Builds the router with all routes, the 404 fallback and CORS.
///
/// `CorsLayer` only sends `Access-Control-Allow-Headers` on preflights, so
/// actual responses (errors included) get it from a set-header layer.
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/gemini-plant-info", post(gemini_plant_info))
        .route("/health", get(health))
        .route("/health/llm", get(llm_health))
        .fallback(not_found)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(CLIENT_HEADERS),
        ))
        .layer(cors_layer())
        .with_state(state)
}

/// Binds `addr` and serves until Ctrl+C.
pub async fn start(state: AppState, addr: &str) -> AppResult<()> {
    let app = build_app(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(AppError::Bind)?;
    info!(%addr, "plant info API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed. If the signal cannot be installed the
/// server keeps running until killed.
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received; draining connections"),
        Err(e) => {
            error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_defaults_when_unset_or_blank() {
        assert_eq!(address_from_vars(&|_: &str| None), DEFAULT_ADDRESS);
        assert_eq!(
            address_from_vars(&|_: &str| Some("  ".to_string())),
            DEFAULT_ADDRESS
        );
        assert_eq!(
            address_from_vars(&|_: &str| Some("127.0.0.1:9000".to_string())),
            "127.0.0.1:9000"
        );
    }
}
