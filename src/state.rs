use std::sync::Arc;

use crate::auth::recovery::RecoveryService;
use crate::database::Database;
use crate::mailer::Mailer;

/// Shared application state, constructed once at startup and injected into
/// every handler through axum. Connection lifecycle belongs to `Database`;
/// handlers never touch globals.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub recovery: Arc<RecoveryService>,
}

impl AppState {
    pub fn new(db: Database, mailer: Arc<dyn Mailer>) -> Self {
        let recovery = Arc::new(RecoveryService::new(db.clone(), mailer));
        Self { db, recovery }
    }
}
