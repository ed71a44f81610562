use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Website {
    pub id: Uuid,
    pub assistant_id: Uuid,
    pub domain: String,
    pub created_at: DateTime<Utc>,
}

/// A crawled page. Ownership resolves through its website to the assistant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WebsitePage {
    pub id: Uuid,
    pub website_id: Uuid,
    pub path: String,
    pub title: String,
    pub content: String,
    pub fetched_at: DateTime<Utc>,
}
