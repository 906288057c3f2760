//! One client instance per browser.
//!
//! A client instance bundles the identity-provider connection, its
//! [`SessionManager`] and the [`LeadOrchestrator`]; the browser only holds
//! a cookie naming it.

use crate::config::Settings;
use crate::models::trigger::SubmitTrigger;
use crate::services::identity::SupabaseAuth;
use crate::services::lead_client::{GenerationClient, LeadService};
use crate::services::orchestrator::LeadOrchestrator;
use crate::services::session::SessionManager;
use dashmap::DashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use uuid::Uuid;

pub struct ClientContext {
    pub session: SessionManager,
    pub orchestrator: LeadOrchestrator,
    /// Sign-in / sign-up button.
    pub auth_trigger: SubmitTrigger,
    /// Generate-leads button.
    pub generate_trigger: SubmitTrigger,
}

impl ClientContext {
    pub fn new(session: SessionManager, orchestrator: LeadOrchestrator) -> Self {
        Self {
            session,
            orchestrator,
            auth_trigger: SubmitTrigger::default(),
            generate_trigger: SubmitTrigger::default(),
        }
    }
}

type ClientFactory = dyn Fn() -> ClientContext + Send + Sync;

struct RegisteredClient {
    context: Arc<ClientContext>,
    last_seen: Mutex<Instant>,
}

impl RegisteredClient {
    fn new(context: Arc<ClientContext>) -> Self {
        Self {
            context,
            last_seen: Mutex::new(Instant::now()),
        }
    }

    fn touch(&self) {
        *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed()
    }
}

pub struct ClientRegistry {
    clients: DashMap<Uuid, RegisteredClient>,
    factory: Box<ClientFactory>,
}

impl ClientRegistry {
    pub fn new(factory: impl Fn() -> ClientContext + Send + Sync + 'static) -> Self {
        Self {
            clients: DashMap::new(),
            factory: Box::new(factory),
        }
    }

    /// Registry whose client instances talk to the configured identity
    /// provider and lead service over one shared HTTP connection pool.
    pub fn from_settings(settings: &Settings) -> Self {
        let http = reqwest::Client::new();
        let identity = settings.identity.clone();
        let refresh_policy = settings.session.refresh_policy;
        let lead_service: Arc<dyn LeadService> = Arc::new(GenerationClient::new(
            http.clone(),
            settings.lead_service.clone(),
        ));

        Self::new(move || {
            let redirect_to = identity.redirect_to.clone();
            let provider = Arc::new(SupabaseAuth::new(http.clone(), identity.clone()));
            let session = SessionManager::new(provider, redirect_to);
            let orchestrator =
                LeadOrchestrator::new(session.clone(), lead_service.clone(), refresh_policy);
            ClientContext::new(session, orchestrator)
        })
    }

    /// Look up a client instance and mark it as seen.
    pub fn get(&self, id: &Uuid) -> Option<Arc<ClientContext>> {
        self.clients.get(id).map(|entry| {
            entry.touch();
            Arc::clone(&entry.context)
        })
    }

    /// Look up `id`, creating a fresh client instance when it is absent or
    /// unknown (e.g. after a restart). Returns the id actually in use.
    pub fn get_or_create(&self, id: Option<Uuid>) -> (Uuid, Arc<ClientContext>) {
        if let Some(id) = id {
            if let Some(context) = self.get(&id) {
                return (id, context);
            }
        }

        let id = Uuid::new_v4();
        let context = Arc::new((self.factory)());
        self.clients
            .insert(id, RegisteredClient::new(Arc::clone(&context)));
        tracing::debug!(client_id = %id, "Created client instance");
        (id, context)
    }

    pub fn remove(&self, id: &Uuid) -> Option<Arc<ClientContext>> {
        self.clients.remove(id).map(|(_, client)| client.context)
    }

    /// Drop client instances not seen for `max_idle`, together with any
    /// session tokens they hold. Instances still borrowed by a request are
    /// kept. Returns how many were dropped.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let before = self.clients.len();
        self.clients.retain(|_, client| {
            Arc::strong_count(&client.context) > 1 || client.idle_for() < max_idle
        });
        before.saturating_sub(self.clients.len())
    }

    /// Sweep idle client instances every `period` until the runtime shuts
    /// down.
    pub fn spawn_eviction(self: Arc<Self>, period: Duration, max_idle: Duration) {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let evicted = self.evict_idle(max_idle);
                if evicted > 0 {
                    tracing::info!(evicted, remaining = self.len(), "Evicted idle client instances");
                }
            }
        });
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
