use base64::Engine as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, Condition, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait, prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, Journey, JourneyNewCmd, JourneyUpdateCmd, ResultEngine, TimeUnit, journeys,
    metrics::derive, util::normalize_username,
};

use super::{Engine, with_tx};

/// One page of journeys, newest first.
#[derive(Clone, Debug, PartialEq)]
pub struct JourneyPage {
    pub journeys: Vec<Journey>,
    /// Opaque cursor for the next page, `None` on the last page.
    pub next_cursor: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct JourneysCursor {
    date_time: DateTime<Utc>,
    journey_id: String,
}

impl JourneysCursor {
    fn encode(&self) -> ResultEngine<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|_| EngineError::Validation("invalid journeys cursor".to_string()))?;
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decode(input: &str) -> ResultEngine<Self> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(input.as_bytes())
            .map_err(|_| EngineError::Validation("invalid journeys cursor".to_string()))?;
        serde_json::from_slice::<Self>(&bytes)
            .map_err(|_| EngineError::Validation("invalid journeys cursor".to_string()))
    }
}

fn journey_not_found() -> EngineError {
    EngineError::KeyNotFound("journey not exists".to_string())
}

impl Engine {
    /// Store a new journey, computing its derived fields from the owner's
    /// vehicle settings.
    pub async fn create_journey(&self, cmd: JourneyNewCmd) -> ResultEngine<Journey> {
        let user = normalize_username(&cmd.user)?;
        with_tx!(self, |db_tx| {
            let vehicle = self.vehicle_for(&db_tx, &user).await?;
            let inputs = cmd.inputs.rounded();
            let derived = derive(&inputs, &vehicle, TimeUnit::Minutes);
            let journey = Journey::new(
                user,
                cmd.description.trim().to_string(),
                cmd.date_time,
                inputs,
                cmd.temp,
                cmd.condition,
                derived,
            );
            journeys::ActiveModel::from(&journey).insert(&db_tx).await?;
            tracing::debug!(journey = %journey.id, user = %journey.user, "journey created");
            Ok(journey)
        })
    }

    pub async fn journey(&self, id: Uuid) -> ResultEngine<Journey> {
        let model = journeys::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(journey_not_found)?;
        Journey::try_from(model)
    }

    /// Lists journeys of a user with cursor-based pagination.
    ///
    /// Pagination is newest → older by `(date_time DESC, id DESC)`.
    pub async fn list_journeys_page(
        &self,
        username: &str,
        limit: u64,
        cursor: Option<&str>,
    ) -> ResultEngine<JourneyPage> {
        if limit == 0 {
            return Err(EngineError::Validation("limit must be > 0".to_string()));
        }
        let username = normalize_username(username)?;

        let mut query = journeys::Entity::find()
            .filter(journeys::Column::User.eq(username))
            .order_by_desc(journeys::Column::DateTime)
            .order_by_desc(journeys::Column::Id)
            .limit(limit.saturating_add(1));

        if let Some(cursor) = cursor {
            let cursor = JourneysCursor::decode(cursor)?;
            query = query.filter(
                Condition::any()
                    .add(journeys::Column::DateTime.lt(cursor.date_time))
                    .add(
                        Condition::all()
                            .add(journeys::Column::DateTime.eq(cursor.date_time))
                            .add(journeys::Column::Id.lt(cursor.journey_id)),
                    ),
            );
        }

        let rows = query.all(&self.database).await?;
        let has_more = rows.len() > limit as usize;
        let journeys: Vec<Journey> = rows
            .into_iter()
            .take(limit as usize)
            .map(Journey::try_from)
            .collect::<ResultEngine<_>>()?;

        let next_cursor = if has_more {
            journeys
                .last()
                .map(|journey| JourneysCursor {
                    date_time: journey.date_time,
                    journey_id: journey.id.to_string(),
                })
                .map(|c| c.encode())
                .transpose()?
        } else {
            None
        };

        Ok(JourneyPage {
            journeys,
            next_cursor,
        })
    }

    /// Merge the set fields over the stored journey and recompute the
    /// derived values.
    pub async fn update_journey(&self, cmd: JourneyUpdateCmd) -> ResultEngine<Journey> {
        with_tx!(self, |db_tx| {
            let model = journeys::Entity::find_by_id(cmd.id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(journey_not_found)?;
            let mut journey = Journey::try_from(model)?;

            let vehicle = self.vehicle_for(&db_tx, &journey.user).await?;
            let inputs = cmd.merge_inputs(journey.primary()).rounded();
            journey.apply(inputs, derive(&inputs, &vehicle, TimeUnit::Minutes));
            if let Some(description) = &cmd.description {
                journey.description = description.trim().to_string();
            }
            if let Some(date_time) = cmd.date_time {
                journey.date_time = date_time;
            }
            if let Some(temp) = cmd.temp {
                journey.temp = crate::metrics::round(temp, 1);
            }
            if let Some(condition) = cmd.condition {
                journey.condition = condition;
            }

            journeys::ActiveModel::from(&journey).update(&db_tx).await?;
            Ok(journey)
        })
    }

    pub async fn delete_journey(&self, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let result = journeys::Entity::delete_by_id(id.to_string())
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(journey_not_found());
            }
            Ok(())
        })
    }

    /// Number of journeys stored for `username`.
    pub async fn count_journeys(&self, username: &str) -> ResultEngine<u64> {
        let username = normalize_username(username)?;
        let total = journeys::Entity::find()
            .filter(journeys::Column::User.eq(username))
            .count(&self.database)
            .await?;
        Ok(total)
    }
}
