//! Client log book endpoint

use api_types::log_book::{LogEntryNew, LogResponse};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use engine::LogEntry;

use crate::{ServerError, server::ServerState};

pub async fn log_new(
    State(state): State<ServerState>,
    payload: Result<Json<LogEntryNew>, JsonRejection>,
) -> Result<Json<LogResponse>, ServerError> {
    let Json(payload) = payload?;
    let entry = LogEntry {
        timestamp: payload.timestamp,
        app: payload.app,
        version: payload.version,
        session_id: payload.session_id,
        username: payload.username,
        source: payload.source,
        func: payload.func,
        notes: payload.notes,
        error: payload.error,
    };
    state.engine.record_log(entry).await?;

    Ok(Json(LogResponse {
        success: true,
        message: "Log saved".to_string(),
    }))
}
