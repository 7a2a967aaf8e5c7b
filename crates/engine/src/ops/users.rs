use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, TransactionTrait, prelude::*};

use crate::{
    BudgetRange, EngineError, GallonUnit, ResultEngine, UserProfile, UserSettingsCmd,
    users::{self, DEFAULT_CURRENCY, DEFAULT_FUEL_TYPE, DEFAULT_USER_FONT},
    util::{normalize_optional_text, normalize_username},
};

use super::{Engine, with_tx};

/// bcrypt work factor for stored passwords.
const HASH_COST: u32 = 10;

fn user_not_found() -> EngineError {
    EngineError::KeyNotFound("user not exists".to_string())
}

fn hash_password(password: &str) -> ResultEngine<String> {
    if password.is_empty() {
        return Err(EngineError::Validation(
            "password must not be empty".to_string(),
        ));
    }
    Ok(bcrypt::hash(password, HASH_COST)?)
}

fn non_negative(value: Option<f64>, label: &str) -> ResultEngine<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(EngineError::Validation(format!(
            "{label} must be a non-negative number"
        ))),
        other => Ok(other),
    }
}

impl Engine {
    /// Create an account with default settings.
    pub async fn register_user(&self, username: &str, password: &str) -> ResultEngine<UserProfile> {
        let username = normalize_username(username)?;
        let hash = hash_password(password)?;
        with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(username));
            }

            let model = users::ActiveModel {
                username: ActiveValue::Set(username.clone()),
                password: ActiveValue::Set(hash),
                date_created: ActiveValue::Set(Utc::now()),
                tank_volume: ActiveValue::Set(Some(self.config.default_tank_volume)),
                def_fuel_cost: ActiveValue::Set(Some(0.0)),
                gallon: ActiveValue::Set(Some(GallonUnit::Uk.as_str().to_string())),
                fuel_type: ActiveValue::Set(Some(DEFAULT_FUEL_TYPE.to_string())),
                user_font: ActiveValue::Set(Some(DEFAULT_USER_FONT.to_string())),
                currency: ActiveValue::Set(Some(DEFAULT_CURRENCY.to_string())),
                budget_enabled: ActiveValue::Set(Some(false)),
                budget_range: ActiveValue::Set(Some(BudgetRange::Daily.as_str().to_string())),
                budget_amount: ActiveValue::Set(Some(0.0)),
                reset_day: ActiveValue::Set(Some(1)),
            }
            .insert(&db_tx)
            .await?;

            tracing::info!(username = %username, "user registered");
            Ok(UserProfile::from_model(model, self.config.default_tank_volume))
        })
    }

    /// Check credentials. Unknown users and wrong passwords fail the same way.
    pub async fn login(&self, username: &str, password: &str) -> ResultEngine<UserProfile> {
        let username = normalize_username(username).map_err(|_| EngineError::InvalidCredentials)?;
        let model = users::Entity::find_by_id(username)
            .one(&self.database)
            .await?
            .ok_or(EngineError::InvalidCredentials)?;
        if !bcrypt::verify(password, &model.password)? {
            return Err(EngineError::InvalidCredentials);
        }
        Ok(UserProfile::from_model(model, self.config.default_tank_volume))
    }

    pub async fn user_profile(&self, username: &str) -> ResultEngine<UserProfile> {
        let username = normalize_username(username)?;
        self.find_profile(&self.database, &username)
            .await?
            .ok_or_else(user_not_found)
    }

    /// Save the set settings. Stored journeys keep the derived values they
    /// were written with.
    pub async fn update_user_settings(&self, cmd: UserSettingsCmd) -> ResultEngine<UserProfile> {
        let username = normalize_username(&cmd.username)?;
        let tank_volume = non_negative(cmd.tank_volume, "tankVolume")?;
        let def_fuel_cost = non_negative(cmd.def_fuel_cost, "defFuelCost")?;
        let budget_amount = non_negative(cmd.budget_amount, "budgetAmount")?;
        let password = cmd.new_password.as_deref().map(hash_password).transpose()?;

        with_tx!(self, |db_tx| {
            let model = users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .ok_or_else(user_not_found)?;
            let mut active: users::ActiveModel = model.clone().into();

            if let Some(password) = password {
                active.password = ActiveValue::Set(password);
            }
            if let Some(v) = tank_volume {
                active.tank_volume = ActiveValue::Set(Some(v));
            }
            if let Some(v) = def_fuel_cost {
                active.def_fuel_cost = ActiveValue::Set(Some(v));
            }
            if let Some(gallon) = cmd.gallon {
                active.gallon = ActiveValue::Set(Some(gallon.as_str().to_string()));
            }
            if let Some(v) = normalize_optional_text(cmd.fuel_type.as_deref()) {
                active.fuel_type = ActiveValue::Set(Some(v));
            }
            if let Some(v) = normalize_optional_text(cmd.user_font.as_deref()) {
                active.user_font = ActiveValue::Set(Some(v));
            }
            if let Some(v) = normalize_optional_text(cmd.currency.as_deref()) {
                active.currency = ActiveValue::Set(Some(v));
            }
            if let Some(enabled) = cmd.budget_enabled {
                active.budget_enabled = ActiveValue::Set(Some(enabled));
            }
            if let Some(range) = cmd.budget_range {
                active.budget_range = ActiveValue::Set(Some(range.as_str().to_string()));
            }
            if let Some(v) = budget_amount {
                active.budget_amount = ActiveValue::Set(Some(v));
            }
            if let Some(day) = cmd.reset_day {
                active.reset_day = ActiveValue::Set(Some(day));
            }

            let model = if active.is_changed() {
                active.update(&db_tx).await?
            } else {
                model
            };
            Ok(UserProfile::from_model(model, self.config.default_tank_volume))
        })
    }
}
