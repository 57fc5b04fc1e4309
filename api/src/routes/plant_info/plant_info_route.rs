//! POST /gemini-plant-info: answers a plant question through Gemini.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header::AUTHORIZATION},
};
use plant_qa::SubjectRecord;

use crate::{
    app_state::AppState,
    error_handler::AppResult,
    routes::plant_info::plant_info_request::{PlantInfoRequest, PlantInfoResponse},
};

/// Handler: POST /gemini-plant-info
///
/// The body is parsed as JSON whatever the `Content-Type`; clients that post
/// `text/plain` are served the same way.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/gemini-plant-info \
///   -H 'content-type: application/json' \
///   -d '{"query":"Is it safe during pregnancy?","plantInfo":{"name":"Ashwagandha","scientific_name":"Withania somnifera"}}'
/// ```
pub async fn gemini_plant_info(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Bytes,
) -> AppResult<Json<PlantInfoResponse>> {
    let body: PlantInfoRequest = serde_json::from_slice(&payload)?;

    let query = body.query.unwrap_or_default();
    let subject = body.plant_info.map(SubjectRecord::from);

    let content = state
        .qa
        .answer_with_enrichment(&query, subject, bearer_token(&headers))
        .await?;

    Ok(Json(PlantInfoResponse { content }))
}

/// Token from `Authorization: Bearer <token>`, if any.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
