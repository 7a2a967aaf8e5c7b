//! Bulk import endpoint. Accepts a JSON array or a `text/csv` document.

use api_types::journey::{ImportQuery, ImportResult};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderMap, header::CONTENT_TYPE},
};
use engine::import;

use crate::{ServerError, server::ServerState};

fn is_csv(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim_start().to_ascii_lowercase().starts_with("text/csv"))
}

pub async fn import(
    State(state): State<ServerState>,
    query: Result<Query<ImportQuery>, QueryRejection>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<ImportResult>, ServerError> {
    let Query(query) = query?;
    let rows = if is_csv(&headers) {
        import::parse_csv(&body)?
    } else {
        import::parse_json(&body)?
    };
    tracing::debug!(rows = rows.len(), csv = is_csv(&headers), "import received");

    let username = query.username.as_deref().filter(|u| !u.trim().is_empty());
    let imported = state.engine.import_journeys(rows, username).await?;
    Ok(Json(ImportResult { imported }))
}
