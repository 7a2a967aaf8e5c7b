use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod journey {
    use super::*;

    /// Body of `POST /api/journeys`.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct JourneyNew {
        pub user: String,
        #[serde(default)]
        pub description: Option<String>,
        /// RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` or `YYYY-MM-DD`.
        pub date_time: String,
        pub distance: f64,
        pub mpg: f64,
        /// Minutes.
        pub time_driven: f64,
        #[serde(default)]
        pub temp: Option<f64>,
        #[serde(default)]
        pub condition: Option<String>,
        pub cost_pl: f64,
    }

    /// Body of `PUT /api/journeys/{id}`. Missing fields keep their value.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct JourneyUpdate {
        pub description: Option<String>,
        pub date_time: Option<String>,
        pub distance: Option<f64>,
        pub mpg: Option<f64>,
        pub time_driven: Option<f64>,
        pub temp: Option<f64>,
        pub condition: Option<String>,
        pub cost_pl: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct JourneyCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct JourneyListQuery {
        pub username: String,
        pub limit: Option<u64>,
        pub cursor: Option<String>,
    }

    /// A page of journeys. Items are the engine's journey JSON.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct JourneyList<T> {
        pub journeys: Vec<T>,
        pub next_cursor: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Total {
        pub total: u64,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ImportQuery {
        pub username: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ImportResult {
        pub imported: usize,
    }
}

pub mod user {
    use super::*;

    /// Body of `POST /api/users`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserNew {
        #[serde(default)]
        pub username: Option<String>,
        #[serde(default)]
        pub password: Option<String>,
        /// Token from the client-side challenge, checked when a secret is
        /// configured.
        #[serde(default)]
        pub captcha: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        pub username: String,
    }

    /// Body of `PUT /api/saveUsers/{username}`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserSettingsUpdate {
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
        pub new_password: Option<String>,
    }
}

pub mod statistics {
    use super::*;

    /// Optional date bounds, same formats as journey dates.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct StatsQuery {
        pub start: Option<String>,
        pub end: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GraphQuery {
        pub start: Option<String>,
        pub end: Option<String>,
        pub x_axis: String,
        pub y_axis: String,
    }
}

pub mod log_book {
    use super::*;

    /// Body of `POST /api/logBook`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LogEntryNew {
        pub timestamp: Option<String>,
        pub app: Option<String>,
        pub version: Option<String>,
        pub session_id: Option<String>,
        pub username: Option<String>,
        pub source: Option<String>,
        pub func: Option<String>,
        pub notes: Option<String>,
        #[serde(default)]
        pub error: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LogResponse {
        pub success: bool,
        pub message: String,
    }
}
