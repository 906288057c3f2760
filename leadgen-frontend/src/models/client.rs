use crate::services::registry::ClientContext;
use crate::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use leadgen_core::error::AppError;
use std::sync::Arc;
use tower_sessions::Session;
use uuid::Uuid;

/// Session key under which the browser's client instance id is stored.
pub const CLIENT_ID_KEY: &str = "client_id";

/// The client instance bound to the requesting browser, created on first
/// contact.
pub struct CurrentClient {
    pub id: Uuid,
    pub context: Arc<ClientContext>,
}

pub(crate) fn session_error(e: tower_sessions::session::Error) -> AppError {
    AppError::InternalError(anyhow::Error::new(e).context("session store failure"))
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentClient {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|rejection| rejection.into_response())?;

        let stored: Option<Uuid> = session
            .get(CLIENT_ID_KEY)
            .await
            .map_err(|e| session_error(e).into_response())?;

        let (id, context) = state.registry.get_or_create(stored);
        if stored != Some(id) {
            session
                .insert(CLIENT_ID_KEY, id)
                .await
                .map_err(|e| session_error(e).into_response())?;
        }

        Ok(Self { id, context })
    }
}
