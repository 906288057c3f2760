use crate::models::auth_form::{AuthAction, AuthForm, CredentialsForm};
use crate::models::client::{session_error, CurrentClient, CLIENT_ID_KEY};
use crate::utils::validation::Field;
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use leadgen_core::error::AppError;
use tower_sessions::Session;
use uuid::Uuid;

/// What the authentication form needs to render.
pub struct AuthFormView {
    pub email: String,
    /// Echoed back so a failed attempt keeps the typed password.
    pub password: String,
    pub email_error: Option<&'static str>,
    pub password_error: Option<&'static str>,
    pub error: Option<String>,
    pub loading: bool,
    pub sign_up_enabled: bool,
}

impl AuthFormView {
    pub fn new(form: &AuthForm, loading: bool, sign_up_enabled: bool) -> Self {
        Self {
            email: form.email.clone(),
            password: form.password.clone(),
            email_error: form.field_error(Field::Email),
            password_error: form.field_error(Field::Password),
            error: form.error.clone(),
            loading,
            sign_up_enabled,
        }
    }
}

#[derive(Template)]
#[template(path = "pages/auth.html")]
pub struct AuthPageTemplate {
    pub form: AuthFormView,
}

#[derive(Template)]
#[template(path = "partials/auth_form.html")]
pub struct AuthFormTemplate {
    pub form: AuthFormView,
}

#[derive(Template)]
#[template(path = "partials/field_error.html")]
pub struct FieldErrorTemplate {
    pub field: &'static str,
    pub message: Option<&'static str>,
}

pub async fn sign_in_handler(
    State(state): State<AppState>,
    client: CurrentClient,
    Form(credentials): Form<CredentialsForm>,
) -> Response {
    submit_credentials(&state, &client, credentials, AuthAction::SignIn).await
}

/// Only routed when sign-up is enabled in configuration.
pub async fn sign_up_handler(
    State(state): State<AppState>,
    client: CurrentClient,
    Form(credentials): Form<CredentialsForm>,
) -> Response {
    submit_credentials(&state, &client, credentials, AuthAction::SignUp).await
}

async fn submit_credentials(
    state: &AppState,
    client: &CurrentClient,
    credentials: CredentialsForm,
    action: AuthAction,
) -> Response {
    let context = &client.context;
    let mut form = AuthForm::from(credentials);

    let Some(_pressed) = context.auth_trigger.try_press() else {
        tracing::debug!(client_id = %client.id, "Ignoring credentials submitted while busy");
        return AuthFormTemplate {
            form: AuthFormView::new(&form, true, state.auth.sign_up_enabled),
        }
        .into_response();
    };

    if form.submit(&context.session, action).await && context.session.is_authenticated().await {
        tracing::info!(client_id = %client.id, "Client authenticated");
        return (StatusCode::OK, [("HX-Redirect", "/")]).into_response();
    }

    AuthFormTemplate {
        form: AuthFormView::new(&form, false, state.auth.sign_up_enabled),
    }
    .into_response()
}

/// Blur handler: the field is now touched, render its inline error.
pub async fn validate_field_handler(
    Path(field): Path<Field>,
    Form(credentials): Form<CredentialsForm>,
) -> impl IntoResponse {
    let mut form = AuthForm::from(credentials);
    form.blur(field);

    FieldErrorTemplate {
        field: field.as_str(),
        message: form.field_error(field),
    }
}

/// Landing target of the sign-up confirmation link.
pub async fn confirmation_callback() -> Redirect {
    Redirect::to("/")
}

pub async fn sign_out_handler(
    State(state): State<AppState>,
    session: Session,
    client: CurrentClient,
) -> Result<Response, AppError> {
    client.context.session.sign_out().await;

    state.registry.remove(&client.id);
    session
        .remove::<Uuid>(CLIENT_ID_KEY)
        .await
        .map_err(session_error)?;

    tracing::info!(client_id = %client.id, "Client signed out");

    Ok((StatusCode::OK, [("HX-Redirect", "/")]).into_response())
}
