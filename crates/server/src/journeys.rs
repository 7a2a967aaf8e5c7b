//! Journey API endpoints

use api_types::journey::{JourneyCreated, JourneyList, JourneyListQuery, JourneyNew, JourneyUpdate, Total};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use engine::{Condition, EngineError, Journey, JourneyNewCmd, JourneyUpdateCmd, PrimaryInputs};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

const DEFAULT_PAGE_SIZE: u64 = 50;
const MAX_PAGE_SIZE: u64 = 500;

fn parse_date(value: &str, field: &str) -> Result<DateTime<Utc>, ServerError> {
    engine::parse_date_time(value).ok_or_else(|| ServerError::Generic(format!("invalid {field}")))
}

/// Blank values count as absent.
pub(crate) fn parse_optional_date(
    value: Option<&str>,
    field: &str,
) -> Result<Option<DateTime<Utc>>, ServerError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| parse_date(v, field))
        .transpose()
}

fn parse_id(id: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(id)
        .map_err(|_| EngineError::KeyNotFound("journey not exists".to_string()).into())
}

fn parse_condition(value: Option<&str>) -> Result<Option<Condition>, ServerError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => Ok(Some(Condition::try_from(v)?)),
    }
}

pub async fn journey_new(
    State(state): State<ServerState>,
    payload: Result<Json<JourneyNew>, JsonRejection>,
) -> Result<(StatusCode, Json<JourneyCreated>), ServerError> {
    let Json(payload) = payload?;
    let date_time = parse_date(&payload.date_time, "dateTime")?;
    let inputs = PrimaryInputs {
        distance: payload.distance,
        mpg: payload.mpg,
        time_driven: payload.time_driven,
        cost_pl: payload.cost_pl,
    };
    let mut cmd = JourneyNewCmd::new(payload.user, date_time, inputs)
        .description(payload.description.unwrap_or_default())
        .temp(payload.temp.unwrap_or_default());
    if let Some(condition) = parse_condition(payload.condition.as_deref())? {
        cmd = cmd.condition(condition);
    }

    let journey = state.engine.create_journey(cmd).await?;
    Ok((StatusCode::CREATED, Json(JourneyCreated { id: journey.id })))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Journey>, ServerError> {
    let journey = state.engine.journey(parse_id(&id)?).await?;
    Ok(Json(journey))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<JourneyUpdate>, JsonRejection>,
) -> Result<Json<Journey>, ServerError> {
    let Json(payload) = payload?;
    let cmd = JourneyUpdateCmd {
        id: parse_id(&id)?,
        description: payload.description,
        date_time: parse_optional_date(payload.date_time.as_deref(), "dateTime")?,
        distance: payload.distance,
        mpg: payload.mpg,
        time_driven: payload.time_driven,
        cost_pl: payload.cost_pl,
        temp: payload.temp,
        condition: parse_condition(payload.condition.as_deref())?,
    };

    let journey = state.engine.update_journey(cmd).await?;
    Ok(Json(journey))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_journey(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<JourneyListQuery>, QueryRejection>,
) -> Result<Json<JourneyList<Journey>>, ServerError> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
    let page = state
        .engine
        .list_journeys_page(&query.username, limit, query.cursor.as_deref())
        .await?;

    Ok(Json(JourneyList {
        journeys: page.journeys,
        next_cursor: page.next_cursor,
    }))
}

pub async fn total(
    State(state): State<ServerState>,
    Path(username): Path<String>,
) -> Result<Json<Total>, ServerError> {
    let total = state.engine.count_journeys(&username).await?;
    Ok(Json(Total { total }))
}
