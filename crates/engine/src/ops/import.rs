use std::collections::HashMap;

use sea_orm::{EntityTrait, TransactionTrait};

use crate::{
    EngineError, ImportRow, Journey, ResultEngine, TimeUnit, journeys, metrics::derive,
    util::normalize_username,
};

use super::{Engine, with_tx};

impl Engine {
    /// Insert imported rows in one transaction. `username`, when given, owns
    /// every row. Returns the number of journeys written.
    pub async fn import_journeys(
        &self,
        rows: Vec<ImportRow>,
        username: Option<&str>,
    ) -> ResultEngine<usize> {
        if rows.is_empty() {
            return Err(EngineError::Validation("No journeys provided".to_string()));
        }
        let username = username.map(normalize_username).transpose()?;

        let mut commands = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            let mut cmd = row.into_command(index, username.as_deref())?;
            cmd.user = normalize_username(&cmd.user)?;
            commands.push(cmd);
        }

        with_tx!(self, |db_tx| {
            let mut vehicles = HashMap::new();
            let mut records = Vec::with_capacity(commands.len());
            for cmd in commands {
                let vehicle = match vehicles.get(&cmd.user) {
                    Some(vehicle) => *vehicle,
                    None => {
                        let vehicle = self.vehicle_for(&db_tx, &cmd.user).await?;
                        vehicles.insert(cmd.user.clone(), vehicle);
                        vehicle
                    }
                };
                let inputs = cmd.inputs.rounded();
                records.push(Journey::new(
                    cmd.user,
                    cmd.description.trim().to_string(),
                    cmd.date_time,
                    inputs,
                    cmd.temp,
                    cmd.condition,
                    derive(&inputs, &vehicle, TimeUnit::Minutes),
                ));
            }

            for batch in records.chunks(self.config.import_batch_size) {
                journeys::Entity::insert_many(batch.iter().map(journeys::ActiveModel::from))
                    .exec(&db_tx)
                    .await?;
            }

            tracing::info!(
                journeys = records.len(),
                users = vehicles.len(),
                "journeys imported"
            );
            Ok(records.len())
        })
    }
}
