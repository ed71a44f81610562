use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Knowledge-base document metadata. The parsing/embedding pipeline runs
/// elsewhere; records stay in `pending` status here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: Uuid,
    pub assistant_id: Uuid,
    pub filename: String,
    pub content: String,
    pub content_hash: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
