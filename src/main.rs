use std::sync::Arc;

use aviary_api::database::Database;
use aviary_api::mailer::LogMailer;
use aviary_api::server::app;
use aviary_api::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = aviary_api::config::config();
    tracing::info!("Starting Aviary API in {:?} mode", config.environment);

    let db = Database::connect()
        .await
        .unwrap_or_else(|e| panic!("failed to initialize database pool: {}", e));

    let state = AppState::new(db, Arc::new(LogMailer));
    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("AVIARY_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Aviary API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
