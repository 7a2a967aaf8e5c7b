use chrono::Utc;
use sea_orm::ActiveModelTrait;

use crate::{LogEntry, ResultEngine};

use super::Engine;

impl Engine {
    /// Append a client diagnostic event.
    pub async fn record_log(&self, entry: LogEntry) -> ResultEngine<()> {
        if entry.error {
            tracing::warn!(
                app = entry.app.as_deref().unwrap_or_default(),
                func = entry.func.as_deref().unwrap_or_default(),
                "client reported an error"
            );
        }
        entry.into_active(Utc::now()).insert(&self.database).await?;
        Ok(())
    }
}
