//! Journey primitives.
//!
//! A `Journey` is one logged trip. The primary values are what the user
//! entered, the derived values are computed once at write time and stored
//! next to them.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    metrics::{DerivedMetrics, PrimaryInputs, round},
};

/// Road condition recorded with a journey.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    #[default]
    Dry,
    Wet,
    Snow,
    Ice,
    Fog,
}

impl Condition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dry => "Dry",
            Self::Wet => "Wet",
            Self::Snow => "Snow",
            Self::Ice => "Ice",
            Self::Fog => "Fog",
        }
    }

    /// Stored values written by older clients may be empty or unknown.
    pub fn from_stored(value: Option<&str>) -> Self {
        value
            .and_then(|v| Self::try_from(v).ok())
            .unwrap_or_default()
    }
}

impl TryFrom<&str> for Condition {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dry" => Ok(Self::Dry),
            "wet" => Ok(Self::Wet),
            "snow" => Ok(Self::Snow),
            "ice" => Ok(Self::Ice),
            "fog" => Ok(Self::Fog),
            other => Err(EngineError::Validation(format!(
                "invalid condition: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journey {
    pub id: Uuid,
    pub user: String,
    pub description: String,
    pub date_time: DateTime<Utc>,
    pub distance: f64,
    pub mpg: f64,
    /// Minutes.
    pub time_driven: f64,
    /// Degrees Celsius.
    pub temp: f64,
    pub condition: Condition,
    pub cost_pl: f64,
    pub avg_speed: f64,
    pub total_cost: f64,
    pub cost_per_mile: f64,
    pub fuel_used_l: f64,
    pub perc_of_tank: f64,
}

impl Journey {
    /// Build a new journey from rounded primaries and their derived values.
    pub fn new(
        user: String,
        description: String,
        date_time: DateTime<Utc>,
        inputs: PrimaryInputs,
        temp: f64,
        condition: Condition,
        derived: DerivedMetrics,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            description,
            date_time,
            distance: inputs.distance,
            mpg: inputs.mpg,
            time_driven: inputs.time_driven,
            temp: round(temp, 1),
            condition,
            cost_pl: inputs.cost_pl,
            avg_speed: derived.avg_speed,
            total_cost: derived.total_cost,
            cost_per_mile: derived.cost_per_mile,
            fuel_used_l: derived.fuel_used_l,
            perc_of_tank: derived.perc_of_tank,
        }
    }

    pub fn primary(&self) -> PrimaryInputs {
        PrimaryInputs {
            distance: self.distance,
            mpg: self.mpg,
            time_driven: self.time_driven,
            cost_pl: self.cost_pl,
        }
    }

    pub fn derived(&self) -> DerivedMetrics {
        DerivedMetrics {
            avg_speed: self.avg_speed,
            fuel_used_l: self.fuel_used_l,
            cost_per_mile: self.cost_per_mile,
            total_cost: self.total_cost,
            perc_of_tank: self.perc_of_tank,
        }
    }

    pub(crate) fn apply(&mut self, inputs: PrimaryInputs, derived: DerivedMetrics) {
        self.distance = inputs.distance;
        self.mpg = inputs.mpg;
        self.time_driven = inputs.time_driven;
        self.cost_pl = inputs.cost_pl;
        self.avg_speed = derived.avg_speed;
        self.total_cost = derived.total_cost;
        self.cost_per_mile = derived.cost_per_mile;
        self.fuel_used_l = derived.fuel_used_l;
        self.perc_of_tank = derived.perc_of_tank;
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "journeys")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user: String,
    pub description: String,
    pub date_time: DateTimeUtc,
    pub distance: f64,
    pub mpg: f64,
    pub time_driven: f64,
    pub temp: Option<f64>,
    pub condition: Option<String>,
    pub cost_pl: f64,
    pub avg_speed: f64,
    pub total_cost: f64,
    pub cost_per_mile: f64,
    pub fuel_used_l: f64,
    pub perc_of_tank: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Journey> for ActiveModel {
    fn from(journey: &Journey) -> Self {
        Self {
            id: ActiveValue::Set(journey.id.to_string()),
            user: ActiveValue::Set(journey.user.clone()),
            description: ActiveValue::Set(journey.description.clone()),
            date_time: ActiveValue::Set(journey.date_time),
            distance: ActiveValue::Set(journey.distance),
            mpg: ActiveValue::Set(journey.mpg),
            time_driven: ActiveValue::Set(journey.time_driven),
            temp: ActiveValue::Set(Some(journey.temp)),
            condition: ActiveValue::Set(Some(journey.condition.as_str().to_string())),
            cost_pl: ActiveValue::Set(journey.cost_pl),
            avg_speed: ActiveValue::Set(journey.avg_speed),
            total_cost: ActiveValue::Set(journey.total_cost),
            cost_per_mile: ActiveValue::Set(journey.cost_per_mile),
            fuel_used_l: ActiveValue::Set(journey.fuel_used_l),
            perc_of_tank: ActiveValue::Set(journey.perc_of_tank),
        }
    }
}

impl TryFrom<Model> for Journey {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("journey not exists".to_string()))?,
            user: model.user,
            description: model.description,
            date_time: model.date_time,
            distance: model.distance,
            mpg: model.mpg,
            time_driven: model.time_driven,
            temp: model.temp.unwrap_or_default(),
            condition: Condition::from_stored(model.condition.as_deref()),
            cost_pl: model.cost_pl,
            avg_speed: model.avg_speed,
            total_cost: model.total_cost,
            cost_per_mile: model.cost_per_mile,
            fuel_used_l: model.fuel_used_l,
            perc_of_tank: model.perc_of_tank,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_parses_case_insensitively() {
        assert_eq!(Condition::try_from("wet").unwrap(), Condition::Wet);
        assert_eq!(Condition::try_from(" ICE ").unwrap(), Condition::Ice);
        assert!(Condition::try_from("lava").is_err());
    }

    #[test]
    fn unknown_stored_condition_reads_as_dry() {
        assert_eq!(Condition::from_stored(Some("")), Condition::Dry);
        assert_eq!(Condition::from_stored(Some("Hail")), Condition::Dry);
        assert_eq!(Condition::from_stored(None), Condition::Dry);
        assert_eq!(Condition::from_stored(Some("Snow")), Condition::Snow);
    }

    #[test]
    fn model_round_trip_keeps_fields() {
        let journey = Journey {
            id: Uuid::new_v4(),
            user: "alice".to_string(),
            description: "commute".to_string(),
            date_time: Utc::now(),
            distance: 10.0,
            mpg: 50.0,
            time_driven: 20.0,
            temp: 4.5,
            condition: Condition::Wet,
            cost_pl: 1.5,
            avg_speed: 30.0,
            total_cost: 1.36,
            cost_per_mile: 0.14,
            fuel_used_l: 0.91,
            perc_of_tank: 0.0142,
        };
        let model = Model {
            id: journey.id.to_string(),
            user: journey.user.clone(),
            description: journey.description.clone(),
            date_time: journey.date_time,
            distance: 10.0,
            mpg: 50.0,
            time_driven: 20.0,
            temp: Some(4.5),
            condition: Some("Wet".to_string()),
            cost_pl: 1.5,
            avg_speed: 30.0,
            total_cost: 1.36,
            cost_per_mile: 0.14,
            fuel_used_l: 0.91,
            perc_of_tank: 0.0142,
        };
        assert_eq!(Journey::try_from(model).unwrap(), journey);
    }
}
