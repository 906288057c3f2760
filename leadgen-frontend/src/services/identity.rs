//! Identity provider client.
//!
//! Talks to a Supabase-compatible GoTrue REST API and keeps the current
//! session cached in memory, the way the hosted JS client keeps it in
//! browser storage. Callers read the bearer token from that cache.

use crate::config::IdentitySettings;
use crate::models::session::ProviderSession;
use async_trait::async_trait;
use leadgen_core::observability::TracedClientExt;
use reqwest::{Client, Response};
use secrecy::ExposeSecret;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Local input problems, never sent to the provider.
    #[error("{0}")]
    Validation(String),

    /// Provider rejected the call; the message is shown verbatim.
    #[error("{message}")]
    Provider { status: u16, message: String },

    #[error("Auth session missing!")]
    MissingSession,

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// Account created and signed in immediately.
    SessionCreated,
    /// Account created; the provider mailed a confirmation link.
    ConfirmationPending,
}

/// Operations consumed from the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> Result<SignUpOutcome, AuthError>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<(), AuthError>;

    /// Ends the session. The local session is dropped even if the provider
    /// call fails.
    async fn sign_out(&self) -> Result<(), AuthError>;

    async fn refresh_session(&self) -> Result<ProviderSession, AuthError>;

    /// Cached session, no network round trip.
    async fn get_session(&self) -> Option<ProviderSession>;
}

pub struct SupabaseAuth {
    client: Client,
    settings: IdentitySettings,
    session: RwLock<Option<ProviderSession>>,
}

impl SupabaseAuth {
    pub fn new(client: Client, settings: IdentitySettings) -> Self {
        Self {
            client,
            settings,
            session: RwLock::new(None),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.settings.url.trim_end_matches('/'), path)
    }

    async fn token_grant(&self, grant_type: &str, body: Value) -> Result<ProviderSession, AuthError> {
        let response = self
            .client
            .traced_post(&self.endpoint("/token"))
            .query(&[("grant_type", grant_type)])
            .header("apikey", self.settings.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        let session: ProviderSession = response.json().await?;
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }
}

#[async_trait]
impl IdentityProvider for SupabaseAuth {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> Result<SignUpOutcome, AuthError> {
        let response = self
            .client
            .traced_post(&self.endpoint("/signup"))
            .query(&[("redirect_to", redirect_to)])
            .header("apikey", self.settings.api_key.expose_secret())
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        // With e-mail confirmation enabled the provider answers with the bare
        // user object and no tokens.
        let body: Value = response.json().await?;
        if body.get("access_token").is_none() {
            return Ok(SignUpOutcome::ConfirmationPending);
        }

        let session: ProviderSession = serde_json::from_value(body)?;
        *self.session.write().await = Some(session);
        Ok(SignUpOutcome::SessionCreated)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let session = self
            .token_grant("password", json!({ "email": email, "password": password }))
            .await?;

        tracing::info!(email = ?session.user_email(), "Signed in with password");
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(session) = self.session.write().await.take() else {
            return Ok(());
        };

        let response = self
            .client
            .traced_post(&self.endpoint("/logout"))
            .header("apikey", self.settings.api_key.expose_secret())
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        Ok(())
    }

    async fn refresh_session(&self) -> Result<ProviderSession, AuthError> {
        let refresh_token = self
            .session
            .read()
            .await
            .as_ref()
            .and_then(|session| session.refresh_token.clone())
            .ok_or(AuthError::MissingSession)?;

        self.token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }

    async fn get_session(&self) -> Option<ProviderSession> {
        self.session.read().await.clone()
    }
}

/// Turn a non-2xx provider response into an [`AuthError::Provider`],
/// keeping the provider's own message where it sent one.
async fn provider_error(response: Response) -> AuthError {
    let status = response.status();
    let body: Value = response.json().await.unwrap_or_default();

    let message = ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));

    tracing::debug!(status = %status, message = %message, "Identity provider rejected request");

    AuthError::Provider {
        status: status.as_u16(),
        message,
    }
}
