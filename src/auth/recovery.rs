//! Password recovery token lifecycle.
//!
//! Tokens are single-use and short-lived: issuing deletes every prior token
//! for the identifier, redemption (or expiry detection) deletes the row, and
//! deletion is the only consumption signal. Every failure collapses to one
//! generic message before it reaches a caller; the sub-case is logged here.

use rand::{distributions::Alphanumeric, Rng};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::password;
use crate::config;
use crate::database::models::RecoveryToken;
use crate::database::Database;
use crate::error::ApiError;
use crate::mailer::Mailer;

pub struct RecoveryService {
    db: Database,
    mailer: Arc<dyn Mailer>,
}

impl RecoveryService {
    pub fn new(db: Database, mailer: Arc<dyn Mailer>) -> Self {
        Self { db, mailer }
    }

    /// Issue a recovery token for `identifier` and hand the redemption link to
    /// the mailer. Returns the link when an account exists, None otherwise;
    /// callers must respond identically in both cases.
    pub async fn issue(&self, identifier: &str) -> Result<Option<String>, ApiError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(ApiError::bad_request("identifier is required"));
        }

        let user: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
            .bind(identifier)
            .fetch_optional(self.db.pool())
            .await?;

        if user.is_none() {
            tracing::debug!(identifier, "recovery requested for unknown identifier");
            return Ok(None);
        }

        // Invalidation-on-reissue: at most one live token per identifier
        sqlx::query("DELETE FROM recovery_tokens WHERE identifier = $1")
            .bind(identifier)
            .execute(self.db.pool())
            .await?;

        let security = &config::config().security;
        let secret = generate_secret(security.recovery_secret_length);
        let expires_at =
            chrono::Utc::now() + chrono::Duration::seconds(security.recovery_token_ttl_secs);

        sqlx::query(
            "INSERT INTO recovery_tokens (identifier, secret, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(identifier)
        .bind(&secret)
        .bind(expires_at)
        .execute(self.db.pool())
        .await?;

        let link = build_recovery_link(&config::config().api.public_base_url, identifier, &secret)
            .ok_or_else(|| {
                tracing::error!("public_base_url is not a valid URL");
                ApiError::internal_server_error("An error occurred while processing your request")
            })?;

        self.mailer
            .send_recovery_link(identifier, &link)
            .await
            .map_err(|e| {
                tracing::error!("recovery mail delivery failed: {}", e);
                ApiError::internal_server_error("An error occurred while processing your request")
            })?;

        Ok(Some(link))
    }

    /// Redeem a token: validate, then atomically update the credential and
    /// consume the row. Validation order: token exists and identifier matches,
    /// token not expired, account still exists.
    pub async fn redeem(
        &self,
        secret: &str,
        identifier: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        if let Err(violation) = password::check_password_policy(new_password) {
            return Err(ApiError::bad_request(violation.message()));
        }

        let token: Option<RecoveryToken> = sqlx::query_as(
            "SELECT identifier, secret, expires_at FROM recovery_tokens WHERE secret = $1",
        )
        .bind(secret)
        .fetch_optional(self.db.pool())
        .await?;

        let token = match token {
            Some(t) if t.identifier == identifier => t,
            Some(_) => {
                tracing::debug!(identifier, "recovery token identifier mismatch");
                return Err(ApiError::recovery_failed());
            }
            None => {
                tracing::debug!(identifier, "recovery token not found");
                return Err(ApiError::recovery_failed());
            }
        };

        if token.is_expired(chrono::Utc::now()) {
            self.delete_token(&token.secret).await?;
            tracing::debug!(identifier, "recovery token expired");
            return Err(ApiError::recovery_failed());
        }

        let user: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
            .bind(identifier)
            .fetch_optional(self.db.pool())
            .await?;

        let user_id = match user {
            Some((id,)) => id,
            None => {
                // Stale token for an account that no longer exists
                self.delete_token(&token.secret).await?;
                tracing::debug!(identifier, "recovery token without matching account");
                return Err(ApiError::recovery_failed());
            }
        };

        let password_hash = password::hash_password(new_password)?;

        // Credential update and token consumption are one unit of work. The
        // conditional delete arbitrates concurrent redemptions: whichever
        // transaction deletes zero rows rolls back and fails closed.
        let mut tx = self.db.begin().await?;

        sqlx::query("UPDATE users SET password_hash = $1, updated_at = now() WHERE id = $2")
            .bind(&password_hash)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM recovery_tokens WHERE secret = $1")
            .bind(&token.secret)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            tx.rollback().await.map_err(ApiError::from)?;
            tracing::debug!(identifier, "recovery token consumed by concurrent redemption");
            return Err(ApiError::recovery_failed());
        }

        tx.commit().await.map_err(ApiError::from)?;

        tracing::info!(identifier, "credential recovered");
        Ok(())
    }

    async fn delete_token(&self, secret: &str) -> Result<(), ApiError> {
        sqlx::query("DELETE FROM recovery_tokens WHERE secret = $1")
            .bind(secret)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }
}

/// Random alphanumeric secret of the configured length.
fn generate_secret(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Redemption link embedding identifier and secret as query parameters.
fn build_recovery_link(base_url: &str, identifier: &str, secret: &str) -> Option<String> {
    let mut url = url::Url::parse(base_url).ok()?;
    url.set_path("/recover/confirm");
    url.query_pairs_mut()
        .append_pair("identifier", identifier)
        .append_pair("secret", secret);
    Some(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_is_alphanumeric_of_requested_length() {
        let secret = generate_secret(32);
        assert_eq!(secret.len(), 32);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn secrets_are_unique() {
        assert_ne!(generate_secret(32), generate_secret(32));
    }

    #[test]
    fn link_embeds_identifier_and_secret() {
        let link =
            build_recovery_link("http://localhost:3000", "user@example.com", "s3cr3t").unwrap();
        let url = url::Url::parse(&link).unwrap();
        assert_eq!(url.path(), "/recover/confirm");

        let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs.get("identifier").map(String::as_str), Some("user@example.com"));
        assert_eq!(pairs.get("secret").map(String::as_str), Some("s3cr3t"));
    }

    #[test]
    fn link_rejects_invalid_base() {
        assert!(build_recovery_link("not a url", "a@b.c", "s").is_none());
    }
}
