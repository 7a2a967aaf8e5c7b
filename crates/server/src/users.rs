//! Account API endpoints

use api_types::user::{Login, LoginResponse, UserNew, UserSettingsUpdate};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::{BudgetRange, GallonUnit, UserProfile, UserSettingsCmd};

use crate::{ServerError, server::ServerState};

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<UserNew>, JsonRejection>,
) -> Result<(StatusCode, Json<UserProfile>), ServerError> {
    let Json(payload) = payload?;
    let (Some(username), Some(password)) = (required(payload.username), required(payload.password))
    else {
        return Err(ServerError::Generic(
            "Username and password are required".to_string(),
        ));
    };

    if let Some(captcha) = &state.captcha {
        captcha.verify(payload.captcha.as_deref()).await?;
    }

    let profile = state.engine.register_user(&username, &password).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<Login>, JsonRejection>,
) -> Result<Json<LoginResponse>, ServerError> {
    let Json(payload) = payload?;
    let profile = state
        .engine
        .login(&payload.username, &payload.password)
        .await?;
    Ok(Json(LoginResponse {
        username: profile.username,
    }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(username): Path<String>,
) -> Result<Json<UserProfile>, ServerError> {
    let profile = state.engine.user_profile(&username).await?;
    Ok(Json(profile))
}

pub async fn save(
    State(state): State<ServerState>,
    Path(username): Path<String>,
    payload: Result<Json<UserSettingsUpdate>, JsonRejection>,
) -> Result<Json<UserProfile>, ServerError> {
    let Json(payload) = payload?;

    let gallon = match payload.gallon.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(v) if v.eq_ignore_ascii_case("uk") => Some(GallonUnit::Uk),
        Some(v) if v.eq_ignore_ascii_case("us") => Some(GallonUnit::Us),
        Some(other) => {
            return Err(ServerError::Generic(format!("invalid gallon unit: {other}")));
        }
    };
    let budget_range = payload
        .budget_range
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(BudgetRange::try_from)
        .transpose()?;

    let cmd = UserSettingsCmd {
        username,
        tank_volume: payload.tank_volume,
        def_fuel_cost: payload.def_fuel_cost,
        gallon,
        fuel_type: payload.fuel_type,
        user_font: payload.user_font,
        currency: payload.currency,
        budget_enabled: payload.budget_enabled,
        budget_range,
        budget_amount: payload.budget_amount,
        reset_day: payload.reset_day,
        new_password: required(payload.new_password),
    };

    let profile = state.engine.update_user_settings(cmd).await?;
    Ok(Json(profile))
}
