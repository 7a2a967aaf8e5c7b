//! Command structs for engine write operations.
//!
//! These types group parameters for journey and settings writes, keeping
//! call sites readable and avoiding long argument lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    budget::BudgetRange,
    journeys::Condition,
    metrics::{GallonUnit, PrimaryInputs},
};

/// Create a journey.
#[derive(Clone, Debug)]
pub struct JourneyNewCmd {
    pub user: String,
    pub description: String,
    pub date_time: DateTime<Utc>,
    pub inputs: PrimaryInputs,
    pub temp: f64,
    pub condition: Condition,
}

impl JourneyNewCmd {
    #[must_use]
    pub fn new(user: impl Into<String>, date_time: DateTime<Utc>, inputs: PrimaryInputs) -> Self {
        Self {
            user: user.into(),
            description: String::new(),
            date_time,
            inputs,
            temp: 0.0,
            condition: Condition::default(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn temp(mut self, temp: f64) -> Self {
        self.temp = temp;
        self
    }

    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }
}

/// Update an existing journey. Unset fields keep their stored value.
#[derive(Clone, Debug, Default)]
pub struct JourneyUpdateCmd {
    pub id: Uuid,
    pub description: Option<String>,
    pub date_time: Option<DateTime<Utc>>,
    pub distance: Option<f64>,
    pub mpg: Option<f64>,
    pub time_driven: Option<f64>,
    pub cost_pl: Option<f64>,
    pub temp: Option<f64>,
    pub condition: Option<Condition>,
}

impl JourneyUpdateCmd {
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn date_time(mut self, date_time: DateTime<Utc>) -> Self {
        self.date_time = Some(date_time);
        self
    }

    #[must_use]
    pub fn distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }

    #[must_use]
    pub fn mpg(mut self, mpg: f64) -> Self {
        self.mpg = Some(mpg);
        self
    }

    #[must_use]
    pub fn time_driven(mut self, time_driven: f64) -> Self {
        self.time_driven = Some(time_driven);
        self
    }

    #[must_use]
    pub fn cost_pl(mut self, cost_pl: f64) -> Self {
        self.cost_pl = Some(cost_pl);
        self
    }

    #[must_use]
    pub fn temp(mut self, temp: f64) -> Self {
        self.temp = Some(temp);
        self
    }

    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Merge the set primary values over `current`.
    pub(crate) fn merge_inputs(&self, current: PrimaryInputs) -> PrimaryInputs {
        PrimaryInputs {
            distance: self.distance.unwrap_or(current.distance),
            mpg: self.mpg.unwrap_or(current.mpg),
            time_driven: self.time_driven.unwrap_or(current.time_driven),
            cost_pl: self.cost_pl.unwrap_or(current.cost_pl),
        }
    }
}

/// Save account settings. Unset fields keep their stored value.
#[derive(Clone, Debug, Default)]
pub struct UserSettingsCmd {
    pub username: String,
    pub tank_volume: Option<f64>,
    pub def_fuel_cost: Option<f64>,
    pub gallon: Option<GallonUnit>,
    pub fuel_type: Option<String>,
    pub user_font: Option<String>,
    pub currency: Option<String>,
    pub budget_enabled: Option<bool>,
    pub budget_range: Option<BudgetRange>,
    pub budget_amount: Option<f64>,
    pub reset_day: Option<i32>,
    pub new_password: Option<String>,
}

impl UserSettingsCmd {
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn tank_volume(mut self, tank_volume: f64) -> Self {
        self.tank_volume = Some(tank_volume);
        self
    }

    #[must_use]
    pub fn gallon(mut self, gallon: GallonUnit) -> Self {
        self.gallon = Some(gallon);
        self
    }

    #[must_use]
    pub fn budget(mut self, range: BudgetRange, amount: f64, reset_day: i32) -> Self {
        self.budget_enabled = Some(true);
        self.budget_range = Some(range);
        self.budget_amount = Some(amount);
        self.reset_day = Some(reset_day);
        self
    }

    #[must_use]
    pub fn new_password(mut self, password: impl Into<String>) -> Self {
        self.new_password = Some(password.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_merges_only_set_fields() {
        let current = PrimaryInputs {
            distance: 10.0,
            mpg: 40.0,
            time_driven: 15.0,
            cost_pl: 1.4,
        };
        let merged = JourneyUpdateCmd::new(Uuid::new_v4())
            .distance(25.0)
            .cost_pl(1.6)
            .merge_inputs(current);
        assert_eq!(merged.distance, 25.0);
        assert_eq!(merged.mpg, 40.0);
        assert_eq!(merged.time_driven, 15.0);
        assert_eq!(merged.cost_pl, 1.6);
    }
}
