use crate::models::client::{session_error, CLIENT_ID_KEY};
use crate::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use uuid::Uuid;

/// Only let requests through whose client instance holds a session token.
pub async fn require_session(
    State(state): State<AppState>,
    session: Session,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client_id: Option<Uuid> = match session.get(CLIENT_ID_KEY).await {
        Ok(client_id) => client_id,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read client id from session");
            return session_error(e).into_response();
        }
    };

    let authenticated = match client_id.and_then(|id| state.registry.get(&id)) {
        Some(context) => context.session.is_authenticated().await,
        None => false,
    };

    if !authenticated {
        return redirect_home(request.headers());
    }

    next.run(request).await
}

/// HTMX requests follow `HX-Redirect`; plain navigation gets a 303.
pub fn redirect_home(headers: &HeaderMap) -> Response {
    if headers.contains_key("hx-request") {
        (StatusCode::OK, [("HX-Redirect", "/")]).into_response()
    } else {
        Redirect::to("/").into_response()
    }
}
