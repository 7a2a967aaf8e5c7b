use chrono_tz::Tz;
use sea_orm::{ConnectionTrait, DatabaseConnection, QueryFilter, QueryOrder, prelude::*};

use crate::{GallonUnit, Journey, ResultEngine, UserProfile, VehicleProfile, statistics::DateRange};

mod import;
mod journeys;
mod log_book;
mod statistics;
mod users;

pub use journeys::JourneyPage;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Settings the engine needs that are not stored per user.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Tank volume in litres used when a user has none.
    pub default_tank_volume: f64,
    /// Zone budget periods are computed in.
    pub timezone: Tz,
    /// Rows per insert statement during imports.
    pub import_batch_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_tank_volume: 64.0,
            timezone: chrono_tz::Europe::London,
            import_batch_size: 500,
        }
    }
}

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    config: EngineConfig,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn default_vehicle(&self) -> VehicleProfile {
        VehicleProfile {
            gallon: GallonUnit::Uk,
            tank_volume: self.config.default_tank_volume,
        }
    }

    async fn find_profile<C: ConnectionTrait>(
        &self,
        db: &C,
        username: &str,
    ) -> ResultEngine<Option<UserProfile>> {
        let model = crate::users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?;
        Ok(model.map(|m| UserProfile::from_model(m, self.config.default_tank_volume)))
    }

    /// Vehicle settings of `username`, or the engine defaults when the user
    /// does not exist.
    async fn vehicle_for<C: ConnectionTrait>(
        &self,
        db: &C,
        username: &str,
    ) -> ResultEngine<VehicleProfile> {
        Ok(self
            .find_profile(db, username)
            .await?
            .map_or_else(
                || self.default_vehicle(),
                |profile| profile.vehicle(self.config.default_tank_volume),
            ))
    }

    /// Journeys of `username` inside `range`, oldest first.
    async fn journeys_in<C: ConnectionTrait>(
        &self,
        db: &C,
        username: &str,
        range: DateRange,
    ) -> ResultEngine<Vec<Journey>> {
        let mut query = crate::journeys::Entity::find()
            .filter(crate::journeys::Column::User.eq(username));
        if let Some(start) = range.start {
            query = query.filter(crate::journeys::Column::DateTime.gte(start));
        }
        if let Some(end) = range.end {
            query = query.filter(crate::journeys::Column::DateTime.lte(end));
        }
        query
            .order_by_asc(crate::journeys::Column::DateTime)
            .all(db)
            .await?
            .into_iter()
            .map(Journey::try_from)
            .collect()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    config: EngineConfig,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    pub fn config(mut self, config: EngineConfig) -> EngineBuilder {
        self.config = config;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        if self.config.import_batch_size == 0 {
            return Err(crate::EngineError::Validation(
                "import batch size must be > 0".to_string(),
            ));
        }
        Ok(Engine {
            database: self.database,
            config: self.config,
        })
    }
}
