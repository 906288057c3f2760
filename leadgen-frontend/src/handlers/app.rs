use crate::handlers::auth::{AuthFormView, AuthPageTemplate};
use crate::handlers::leads::{GeneratorPageTemplate, ResultsView};
use crate::models::auth_form::AuthForm;
use crate::models::client::{session_error, CLIENT_ID_KEY};
use crate::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use leadgen_core::error::AppError;
use tower_sessions::Session;
use uuid::Uuid;

/// The view shell: the generation view once authenticated, the
/// authentication view otherwise.
///
/// Only reads the browser's client instance; anonymous visitors get one
/// on their first form submission.
pub async fn index(State(state): State<AppState>, session: Session) -> Result<Response, AppError> {
    let client_id: Option<Uuid> = session.get(CLIENT_ID_KEY).await.map_err(session_error)?;
    let context = client_id.and_then(|id| state.registry.get(&id));

    if let Some(context) = &context {
        if context.session.is_authenticated().await {
            return Ok(GeneratorPageTemplate {
                results: ResultsView::new(
                    &context.orchestrator.snapshot(),
                    context.generate_trigger.is_disabled(),
                ),
            }
            .into_response());
        }
    }

    let loading = context
        .as_ref()
        .is_some_and(|context| context.auth_trigger.is_disabled() || context.session.is_loading());

    Ok(AuthPageTemplate {
        form: AuthFormView::new(&AuthForm::default(), loading, state.auth.sign_up_enabled),
    }
    .into_response())
}

pub async fn health_check() -> &'static str {
    "OK"
}
