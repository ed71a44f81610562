use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Single-use password recovery token. Consumption is deletion: there is no
/// consumed flag, and at most one live token exists per identifier (issuing
/// deletes prior rows first).
#[derive(Debug, Clone, FromRow)]
pub struct RecoveryToken {
    pub identifier: String,
    pub secret: String,
    pub expires_at: DateTime<Utc>,
}

impl RecoveryToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn expiry_boundary() {
        let now = Utc::now();
        let live = RecoveryToken {
            identifier: "user@example.com".into(),
            secret: "s".into(),
            expires_at: now + Duration::hours(1),
        };
        let dead = RecoveryToken {
            identifier: "user@example.com".into(),
            secret: "s".into(),
            expires_at: now,
        };
        assert!(!live.is_expired(now));
        assert!(dead.is_expired(now));
    }
}
