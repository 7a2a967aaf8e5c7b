//! Statistics API endpoints

use api_types::statistics::{GraphQuery, StatsQuery};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use engine::{
    BudgetStatus, CostWindows, DateRange, FullStats, GraphData, GraphField, Summary,
};

use crate::{ServerError, journeys::parse_optional_date, server::ServerState};

pub async fn summary(
    State(state): State<ServerState>,
    Path(username): Path<String>,
) -> Result<Json<Summary>, ServerError> {
    Ok(Json(state.engine.summary(&username).await?))
}

pub async fn costs(
    State(state): State<ServerState>,
    Path(username): Path<String>,
) -> Result<Json<CostWindows>, ServerError> {
    Ok(Json(state.engine.cost_windows(&username).await?))
}

pub async fn stats(
    State(state): State<ServerState>,
    Path(username): Path<String>,
    query: Result<Query<StatsQuery>, QueryRejection>,
) -> Result<Json<FullStats>, ServerError> {
    let Query(query) = query?;
    let range = DateRange {
        start: parse_optional_date(query.start.as_deref(), "start")?,
        end: parse_optional_date(query.end.as_deref(), "end")?,
    };
    Ok(Json(state.engine.full_stats(&username, range).await?))
}

pub async fn budget(
    State(state): State<ServerState>,
    Path(username): Path<String>,
) -> Result<Json<BudgetStatus>, ServerError> {
    Ok(Json(state.engine.budget(&username).await?))
}

pub async fn graph(
    State(state): State<ServerState>,
    Path(username): Path<String>,
    query: Result<Query<GraphQuery>, QueryRejection>,
) -> Result<Json<GraphData>, ServerError> {
    let Query(query) = query?;
    let x = GraphField::try_from(query.x_axis.as_str())?;
    let y = GraphField::try_from(query.y_axis.as_str())?;
    let start = parse_optional_date(query.start.as_deref(), "start")?;
    let end = parse_optional_date(query.end.as_deref(), "end")?;

    Ok(Json(state.engine.graph(&username, start, end, x, y).await?))
}
