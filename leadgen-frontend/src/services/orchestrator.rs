//! Turns a validated niche/page-count into one authenticated request to the
//! lead service and reconciles the outcome into [`RequestState`].

use crate::config::RefreshPolicy;
use crate::models::lead::{Lead, LeadGenerationRequest};
use crate::services::lead_client::LeadService;
use crate::services::metrics;
use crate::services::session::SessionManager;
use crate::utils::validation::{join_messages, validate_lead_request};
use std::sync::{Arc, PoisonError, RwLock};

pub const GENERIC_FAILURE: &str = "An error occurred";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed(String),
}

/// Renderable state of the generation view.
///
/// `leads` is replaced wholesale on success only; a later failure changes
/// `status` and leaves the previous leads in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestState {
    pub status: RequestStatus,
    pub leads: Vec<Lead>,
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        self.status == RequestStatus::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            RequestStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

pub struct LeadOrchestrator {
    session: SessionManager,
    service: Arc<dyn LeadService>,
    refresh_policy: RefreshPolicy,
    state: RwLock<RequestState>,
}

/// Clears `Loading` however `submit` exits, including cancellation.
struct ClearLoading<'a>(&'a RwLock<RequestState>);

impl Drop for ClearLoading<'_> {
    fn drop(&mut self) {
        let mut state = self.0.write().unwrap_or_else(PoisonError::into_inner);
        if state.is_loading() {
            state.status = RequestStatus::Idle;
        }
    }
}

impl LeadOrchestrator {
    pub fn new(
        session: SessionManager,
        service: Arc<dyn LeadService>,
        refresh_policy: RefreshPolicy,
    ) -> Self {
        Self {
            session,
            service,
            refresh_policy,
            state: RwLock::new(RequestState::default()),
        }
    }

    pub fn snapshot(&self) -> RequestState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_loading()
    }

    fn update(&self, apply: impl FnOnce(&mut RequestState)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        apply(&mut state);
    }

    /// Request leads for `niche`, searching `pages` result pages.
    ///
    /// Concurrent calls are not rejected here; whichever finishes last
    /// decides the final state.
    pub async fn submit(&self, niche: &str, pages: u32) -> RequestState {
        let request = LeadGenerationRequest::new(niche, pages);

        let errors = validate_lead_request(&request);
        if !errors.is_empty() {
            let message = join_messages(&errors);
            tracing::debug!(message = %message, "Lead request failed validation");
            metrics::record_lead_generation("invalid");
            self.update(|state| state.status = RequestStatus::Failed(message));
            return self.snapshot();
        }

        match self.refresh_policy {
            RefreshPolicy::Concurrent => {
                // Not awaited: the token read below may still see the old token.
                let session = self.session.clone();
                tokio::spawn(async move { session.refresh_session().await });
            }
            RefreshPolicy::BeforeToken => self.session.refresh_session().await,
        }

        let token = self.session.get_token().await;
        if token.is_none() {
            tracing::warn!("Submitting lead request without a session token");
        }

        self.update(|state| state.status = RequestStatus::Loading);
        let clear_loading = ClearLoading(&self.state);

        tracing::info!(niche = %request.niche, pages = request.pages, "Requesting leads");

        match self.service.generate(&request, token.as_deref()).await {
            Ok(response) => {
                tracing::info!(
                    niche = %request.niche,
                    lead_count = response.leads.len(),
                    "Leads generated"
                );
                metrics::record_lead_generation("success");
                self.update(|state| {
                    state.leads = response.leads;
                    state.status = RequestStatus::Succeeded;
                });
            }
            Err(e) => {
                let mut message = e.to_string();
                if message.is_empty() {
                    message = GENERIC_FAILURE.to_string();
                }
                tracing::error!(niche = %request.niche, error = %message, "Lead generation failed");
                metrics::record_lead_generation("failure");
                self.update(|state| state.status = RequestStatus::Failed(message));
            }
        }

        drop(clear_loading);
        self.snapshot()
    }
}
