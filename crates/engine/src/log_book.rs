//! Client diagnostic events. Write-only from the API's point of view.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::util::normalize_optional_text;

/// One diagnostic event reported by a client.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogEntry {
    /// Client clock, kept verbatim.
    pub timestamp: Option<String>,
    pub app: Option<String>,
    pub version: Option<String>,
    pub session_id: Option<String>,
    pub username: Option<String>,
    pub source: Option<String>,
    pub func: Option<String>,
    pub notes: Option<String>,
    pub error: bool,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "log_book")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub timestamp: Option<String>,
    pub app: Option<String>,
    pub version: Option<String>,
    pub session_id: Option<String>,
    pub username: Option<String>,
    pub source: Option<String>,
    pub func: Option<String>,
    pub notes: Option<String>,
    pub error: bool,
    pub received_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl LogEntry {
    pub(crate) fn into_active(self, received_at: DateTime<Utc>) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::NotSet,
            timestamp: ActiveValue::Set(normalize_optional_text(self.timestamp.as_deref())),
            app: ActiveValue::Set(normalize_optional_text(self.app.as_deref())),
            version: ActiveValue::Set(normalize_optional_text(self.version.as_deref())),
            session_id: ActiveValue::Set(normalize_optional_text(self.session_id.as_deref())),
            username: ActiveValue::Set(normalize_optional_text(self.username.as_deref())),
            source: ActiveValue::Set(normalize_optional_text(self.source.as_deref())),
            func: ActiveValue::Set(normalize_optional_text(self.func.as_deref())),
            notes: ActiveValue::Set(self.notes),
            error: ActiveValue::Set(self.error),
            received_at: ActiveValue::Set(received_at),
        }
    }
}
