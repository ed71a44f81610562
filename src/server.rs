use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes
        .merge(auth_public_routes())
        // Protected API
        .merge(protected_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/auth/register", post(auth::register_post))
        .route("/auth/login", post(auth::login_post))
        // Credential recovery (enumeration-resistant)
        .route("/auth/recover", post(auth::recover_post))
        .route("/auth/recover/confirm", post(auth::recover_confirm_post))
}

fn protected_routes() -> Router<AppState> {
    use handlers::protected::{
        assistants, auth, contact_forms, conversations, documents, faqs, websites,
    };

    Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        // Assistants (ownership roots)
        .route("/api/assistants", get(assistants::list).post(assistants::create))
        .route(
            "/api/assistants/:id",
            get(assistants::get).put(assistants::update).delete(assistants::delete),
        )
        // FAQs
        .route(
            "/api/assistants/:id/faqs",
            get(faqs::list).post(faqs::create),
        )
        .route("/api/faqs/:id", get(faqs::get).put(faqs::update).delete(faqs::delete))
        // Documents
        .route(
            "/api/assistants/:id/documents",
            get(documents::list).post(documents::create),
        )
        .route(
            "/api/documents/:id",
            get(documents::get).put(documents::update).delete(documents::delete),
        )
        // Contact forms
        .route(
            "/api/assistants/:id/contact-forms",
            get(contact_forms::list).post(contact_forms::create),
        )
        .route(
            "/api/contact-forms/:id",
            get(contact_forms::get)
                .put(contact_forms::update)
                .delete(contact_forms::delete),
        )
        // Conversations (read/delete; always assistant-scoped)
        .route("/api/assistants/:id/conversations", get(conversations::list))
        .route(
            "/api/conversations/:id",
            get(conversations::get).delete(conversations::delete),
        )
        // Websites and crawled pages (two-hop ownership)
        .route(
            "/api/assistants/:id/websites",
            get(websites::list).post(websites::create),
        )
        .route(
            "/api/websites/:id",
            get(websites::get).put(websites::update).delete(websites::delete),
        )
        .route("/api/websites/:id/pages", get(websites::list_pages))
        .route("/api/pages/:id", get(websites::get_page).delete(websites::delete_page))
        .route_layer(from_fn(jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Aviary API",
            "version": version,
            "description": "Multi-tenant assistant and knowledge-base management API",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/register, /auth/login (public)",
                "recovery": "/auth/recover, /auth/recover/confirm (public)",
                "whoami": "/api/auth/whoami (protected)",
                "assistants": "/api/assistants[/:id] (protected)",
                "faqs": "/api/assistants/:id/faqs, /api/faqs/:id (protected)",
                "documents": "/api/assistants/:id/documents, /api/documents/:id (protected)",
                "contact_forms": "/api/assistants/:id/contact-forms, /api/contact-forms/:id (protected)",
                "conversations": "/api/assistants/:id/conversations, /api/conversations/:id (protected)",
                "websites": "/api/assistants/:id/websites, /api/websites/:id[/pages] (protected)",
            }
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.db.health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
