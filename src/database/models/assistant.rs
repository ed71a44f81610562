use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A tenant-scoped chatbot configuration. Root of its ownership subtree:
/// every sub-resource authorizes through its assistant's user_id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Assistant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub welcome_message: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
