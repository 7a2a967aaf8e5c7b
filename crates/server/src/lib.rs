use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::EngineError;

use serde::Serialize;
pub use captcha::CaptchaConfig;
pub use server::{ServerConfig, router, run_with_listener, spawn_with_listener};

mod captcha;
mod import;
mod journeys;
mod log_book;
mod server;
mod statistics;
mod users;

pub mod types {
    pub mod journey {
        pub use api_types::journey::{
            ImportQuery, ImportResult, JourneyCreated, JourneyList, JourneyListQuery, JourneyNew,
            JourneyUpdate, Total,
        };
        pub use engine::Journey;
    }

    pub mod user {
        pub use api_types::user::{Login, LoginResponse, UserNew, UserSettingsUpdate};
        pub use engine::UserProfile;
    }

    pub mod stats {
        pub use api_types::statistics::{GraphQuery, StatsQuery};
        pub use engine::{BudgetStatus, CostWindows, FullStats, GraphData, Summary};
    }

    pub mod log_book {
        pub use api_types::log_book::{LogEntryNew, LogResponse};
    }
}

pub enum ServerError {
    Engine(EngineError),
    /// Bad request.
    Generic(String),
    /// Failure the client cannot fix. The message is logged, never sent.
    Internal(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

const INTERNAL_ERROR: &str = "internal server error";

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Validation(_)
        | EngineError::ExistingKey(_)
        | EngineError::InvalidCredentials
        | EngineError::InvalidGraphField(_)
        | EngineError::Csv(_) => StatusCode::BAD_REQUEST,
        EngineError::Password(_) | EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            INTERNAL_ERROR.to_string()
        }
        EngineError::Password(hash_err) => {
            tracing::error!("password hashing error: {hash_err}");
            INTERNAL_ERROR.to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
            ServerError::Internal(err) => {
                tracing::error!("{err}");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
            }
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_existing_key_maps_to_400() {
        let res = ServerError::from(EngineError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_validation_maps_to_400() {
        for err in [
            EngineError::Validation("x".to_string()),
            EngineError::InvalidCredentials,
            EngineError::InvalidGraphField("x".to_string()),
        ] {
            assert_eq!(ServerError::from(err).into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn database_error_maps_to_500() {
        let err = EngineError::Database(sea_orm::DbErr::Custom("disk on fire".to_string()));
        let res = ServerError::from(err).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_maps_to_500() {
        let res = ServerError::Internal("boom".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
