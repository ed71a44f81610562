use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Mail delivery failed: {0}")]
    Delivery(String),
}

/// Outbound-mail seam. The production transport lives outside this service;
/// handlers only ever see this trait.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_recovery_link(&self, recipient: &str, link: &str) -> Result<(), MailerError>;
}

/// Writes outbound mail to the log instead of delivering it. Used in
/// development and tests.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_recovery_link(&self, recipient: &str, link: &str) -> Result<(), MailerError> {
        tracing::info!(recipient, link, "recovery link issued");
        Ok(())
    }
}
