use crate::models::session::ProviderSession;
use crate::services::identity::{AuthError, IdentityProvider, SignUpOutcome};
use crate::services::metrics;
use crate::utils::validation::{join_messages, validate_credentials};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Mediates every session lifecycle call against the identity provider and
/// exposes the current bearer token.
///
/// Cheap to clone; clones share the provider and the `loading` flag.
#[derive(Clone)]
pub struct SessionManager {
    provider: Arc<dyn IdentityProvider>,
    redirect_to: String,
    loading: Arc<AtomicBool>,
}

/// Keeps `loading` raised for the lifetime of a provider call, including
/// when the call's future is dropped.
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SessionManager {
    pub fn new(provider: Arc<dyn IdentityProvider>, redirect_to: impl Into<String>) -> Self {
        Self {
            provider,
            redirect_to: redirect_to.into(),
            loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Sign in with e-mail and password.
    ///
    /// Malformed credentials fail with [`AuthError::Validation`] carrying
    /// the joined validator messages; the provider is not contacted.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        check_credentials(email, password)?;

        let result = {
            let _loading = LoadingGuard::raise(&self.loading);
            self.provider.sign_in_with_password(email, password).await
        };

        match &result {
            Ok(()) => metrics::record_auth_attempt("sign_in", "success"),
            Err(e) => {
                tracing::warn!(error = %e, "Sign-in rejected");
                metrics::record_auth_attempt("sign_in", "failure");
            }
        }
        result
    }

    /// Register a new account. The provider mails a confirmation link that
    /// points at the configured redirect target.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
        check_credentials(email, password)?;

        let result = {
            let _loading = LoadingGuard::raise(&self.loading);
            self.provider
                .sign_up(email, password, &self.redirect_to)
                .await
        };

        match &result {
            Ok(outcome) => {
                tracing::info!(outcome = ?outcome, "Account registered");
                metrics::record_auth_attempt("sign_up", "success");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Sign-up rejected");
                metrics::record_auth_attempt("sign_up", "failure");
            }
        }
        result
    }

    /// Fire-and-forget: provider errors are logged, never returned.
    pub async fn sign_out(&self) {
        if let Err(e) = self.provider.sign_out().await {
            tracing::warn!(error = %e, "Sign-out failed at the identity provider");
        }
    }

    /// Best-effort token rotation. Failures are logged and counted only.
    pub async fn refresh_session(&self) {
        match self.provider.refresh_session().await {
            Ok(session) => log_refreshed(&session),
            Err(e) => {
                tracing::error!(error = %e, "Error refreshing session");
                metrics::record_refresh_failure();
            }
        }
    }

    /// Bearer token of the cached session; `None` when unauthenticated.
    pub async fn get_token(&self) -> Option<String> {
        self.provider
            .get_session()
            .await
            .map(|session| session.access_token)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.get_token().await.is_some()
    }
}

fn check_credentials(email: &str, password: &str) -> Result<(), AuthError> {
    let messages = validate_credentials(email, password);
    if messages.is_empty() {
        Ok(())
    } else {
        Err(AuthError::Validation(join_messages(&messages)))
    }
}

fn log_refreshed(session: &ProviderSession) {
    tracing::debug!(expires_at = ?session.expires_at_utc(), "Session refreshed");
}
