#![allow(dead_code)]

use async_trait::async_trait;
use leadgen_frontend::config::{
    AuthSettings, IdentitySettings, LeadServiceSettings, RefreshPolicy,
};
use leadgen_frontend::models::session::ProviderSession;
use leadgen_frontend::services::{
    AuthError, ClientContext, ClientRegistry, GenerationClient, IdentityProvider,
    LeadOrchestrator, SessionManager, SignUpOutcome,
};
use leadgen_frontend::startup::build_router;
use leadgen_frontend::AppState;
use secrecy::Secret;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TEST_EMAIL: &str = "owner@acme.example";
pub const TEST_PASSWORD: &str = "hunter22";
pub const TEST_TOKEN: &str = "test-access-token";
pub const REDIRECT_TO: &str = "http://localhost:8080/auth/callback";

pub fn provider_session(access_token: &str, refresh_token: &str) -> ProviderSession {
    serde_json::from_value(serde_json::json!({
        "access_token": access_token,
        "refresh_token": refresh_token,
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": 1_900_000_000
    }))
    .expect("valid session json")
}

pub fn identity_settings(url: &str) -> IdentitySettings {
    IdentitySettings {
        url: url.to_string(),
        api_key: Secret::new("test-anon-key".to_string()),
        redirect_to: REDIRECT_TO.to_string(),
    }
}

pub fn lead_settings(url: &str) -> LeadServiceSettings {
    LeadServiceSettings {
        url: url.to_string(),
    }
}

/// In-memory identity provider with one registered account.
#[derive(Default)]
pub struct FakeIdentityProvider {
    session: Mutex<Option<ProviderSession>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    sign_up_redirects: Mutex<Vec<String>>,
    fail_refresh: bool,
    fail_sign_out: bool,
    sign_in_delay: Option<Duration>,
}

impl FakeIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with an active session holding `token`.
    pub fn signed_in(token: &str) -> Self {
        let fake = Self::default();
        *fake.session.lock().unwrap() = Some(provider_session(token, "refresh-1"));
        fake
    }

    pub fn failing_refresh(mut self) -> Self {
        self.fail_refresh = true;
        self
    }

    pub fn failing_sign_out(mut self) -> Self {
        self.fail_sign_out = true;
        self
    }

    pub fn slow_sign_in(mut self, delay: Duration) -> Self {
        self.sign_in_delay = Some(delay);
        self
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.calls.lock().unwrap().get(operation).copied().unwrap_or(0)
    }

    pub fn sign_up_redirects(&self) -> Vec<String> {
        self.sign_up_redirects.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str) {
        *self.calls.lock().unwrap().entry(operation).or_default() += 1;
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn sign_up(
        &self,
        email: &str,
        _password: &str,
        redirect_to: &str,
    ) -> Result<SignUpOutcome, AuthError> {
        self.record("sign_up");
        self.sign_up_redirects
            .lock()
            .unwrap()
            .push(redirect_to.to_string());

        if email == TEST_EMAIL {
            return Err(AuthError::Provider {
                status: 422,
                message: "User already registered".to_string(),
            });
        }
        Ok(SignUpOutcome::ConfirmationPending)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.record("sign_in");
        if let Some(delay) = self.sign_in_delay {
            tokio::time::sleep(delay).await;
        }

        if email == TEST_EMAIL && password == TEST_PASSWORD {
            *self.session.lock().unwrap() = Some(provider_session(TEST_TOKEN, "refresh-1"));
            Ok(())
        } else {
            Err(AuthError::Provider {
                status: 400,
                message: "Invalid login credentials".to_string(),
            })
        }
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.record("sign_out");
        self.session.lock().unwrap().take();
        if self.fail_sign_out {
            return Err(AuthError::Provider {
                status: 500,
                message: "logout failed".to_string(),
            });
        }
        Ok(())
    }

    async fn refresh_session(&self) -> Result<ProviderSession, AuthError> {
        self.record("refresh");
        if self.fail_refresh {
            return Err(AuthError::Provider {
                status: 400,
                message: "Invalid Refresh Token: Refresh Token Not Found".to_string(),
            });
        }

        let mut session = self.session.lock().unwrap();
        let current = session.as_ref().ok_or(AuthError::MissingSession)?;
        // Keeps the access token so request assertions stay deterministic.
        let refreshed = provider_session(&current.access_token, "refresh-2");
        *session = Some(refreshed.clone());
        Ok(refreshed)
    }

    async fn get_session(&self) -> Option<ProviderSession> {
        self.session.lock().unwrap().clone()
    }
}

pub fn session_manager(provider: Arc<FakeIdentityProvider>) -> SessionManager {
    SessionManager::new(provider, REDIRECT_TO)
}

pub fn orchestrator(
    provider: Arc<FakeIdentityProvider>,
    lead_service_url: &str,
    policy: RefreshPolicy,
) -> LeadOrchestrator {
    let client = GenerationClient::new(reqwest::Client::new(), lead_settings(lead_service_url));
    LeadOrchestrator::new(session_manager(provider), Arc::new(client), policy)
}

/// Router whose client instances use a fresh [`FakeIdentityProvider`] and
/// the lead service at `lead_service_url`.
pub fn test_app(lead_service_url: &str, sign_up_enabled: bool) -> axum::Router {
    test_app_with_registry(lead_service_url, sign_up_enabled).0
}

/// [`test_app`] plus a handle on its client registry.
pub fn test_app_with_registry(
    lead_service_url: &str,
    sign_up_enabled: bool,
) -> (axum::Router, Arc<ClientRegistry>) {
    let lead_service_url = lead_service_url.to_string();
    let registry = Arc::new(ClientRegistry::new(move || {
        let provider = Arc::new(FakeIdentityProvider::new());
        let session = session_manager(provider.clone());
        let orchestrator = orchestrator(provider, &lead_service_url, RefreshPolicy::Concurrent);
        ClientContext::new(session, orchestrator)
    }));

    let router = build_router(AppState::new(
        Arc::clone(&registry),
        AuthSettings { sign_up_enabled },
    ));
    (router, registry)
}

pub fn acme_leads() -> serde_json::Value {
    serde_json::json!({
        "leads": [
            {"title": "Acme Co", "url": "https://acme.example", "email": "a@acme.example"}
        ]
    })
}
