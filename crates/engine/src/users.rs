//! Users table and the profile view returned to clients.
//!
//! Journeys reference their owner by `username`; there is no foreign key.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    budget::BudgetRange,
    metrics::{GallonUnit, VehicleProfile},
};

pub const DEFAULT_FUEL_TYPE: &str = "Petrol";
pub const DEFAULT_USER_FONT: &str = "Lexend";
pub const DEFAULT_CURRENCY: &str = "£";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub password: String,
    pub date_created: DateTimeUtc,
    pub tank_volume: Option<f64>,
    pub def_fuel_cost: Option<f64>,
    pub gallon: Option<String>,
    pub fuel_type: Option<String>,
    pub user_font: Option<String>,
    pub currency: Option<String>,
    pub budget_enabled: Option<bool>,
    pub budget_range: Option<String>,
    pub budget_amount: Option<f64>,
    pub reset_day: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Account settings as exposed to clients. The password hash never leaves
/// the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    pub date_created: DateTime<Utc>,
    pub tank_volume: f64,
    pub def_fuel_cost: f64,
    pub gallon: GallonUnit,
    pub fuel_type: String,
    pub user_font: String,
    pub currency: String,
    pub budget_enabled: bool,
    pub budget_range: BudgetRange,
    pub budget_amount: f64,
    pub reset_day: i32,
}

impl UserProfile {
    /// Build the profile from a stored row, filling columns written before
    /// they existed with their defaults.
    pub fn from_model(model: Model, default_tank_volume: f64) -> Self {
        Self {
            username: model.username,
            date_created: model.date_created,
            tank_volume: model.tank_volume.unwrap_or(default_tank_volume),
            def_fuel_cost: model.def_fuel_cost.unwrap_or_default(),
            gallon: GallonUnit::from_stored(model.gallon.as_deref()),
            fuel_type: model
                .fuel_type
                .unwrap_or_else(|| DEFAULT_FUEL_TYPE.to_string()),
            user_font: model
                .user_font
                .unwrap_or_else(|| DEFAULT_USER_FONT.to_string()),
            currency: model
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            budget_enabled: model.budget_enabled.unwrap_or(false),
            budget_range: BudgetRange::from_stored(model.budget_range.as_deref()),
            budget_amount: model.budget_amount.unwrap_or_default(),
            reset_day: model.reset_day.unwrap_or(1),
        }
    }

    /// Vehicle settings for the derived metrics, falling back to
    /// `default_tank_volume` when no usable tank volume is stored.
    pub fn vehicle(&self, default_tank_volume: f64) -> VehicleProfile {
        VehicleProfile {
            gallon: self.gallon,
            tank_volume: if self.tank_volume > 0.0 {
                self.tank_volume
            } else {
                default_tank_volume
            },
        }
    }
}
