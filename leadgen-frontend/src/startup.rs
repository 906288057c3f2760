use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use leadgen_core::middleware::request_id_middleware;
use time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::handlers::{
    app::{health_check, index},
    auth::{
        confirmation_callback, sign_in_handler, sign_out_handler, sign_up_handler,
        validate_field_handler,
    },
    leads::generate_handler,
    metrics::metrics,
};
use crate::middleware::{auth::require_session, metrics::metrics_middleware};
use crate::AppState;

/// Inactivity after which a browser's session cookie, and with it the
/// client instance it names, is dropped.
pub const SESSION_IDLE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(24 * 60 * 60);

/// How often idle client instances are swept from the registry.
pub const EVICTION_PERIOD: std::time::Duration = std::time::Duration::from_secs(5 * 60);

pub fn build_router(state: AppState) -> Router {
    // Session cookie only names the browser's client instance
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false) // Set to true in production with HTTPS
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            SESSION_IDLE_TIMEOUT.as_secs() as i64,
        )));

    let mut auth_routes = Router::new()
        .route("/sign-in", post(sign_in_handler))
        .route("/sign-out", post(sign_out_handler))
        .route("/validate/:field", post(validate_field_handler));
    if state.auth.sign_up_enabled {
        auth_routes = auth_routes
            .route("/sign-up", post(sign_up_handler))
            .route("/callback", get(confirmation_callback));
    }

    let lead_routes = Router::new()
        .route("/generate", post(generate_handler))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .nest("/auth", auth_routes)
        .nest("/leads", lead_routes)
        .nest_service("/static", ServeDir::new("leadgen-frontend/static"))
        .layer(session_layer)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
