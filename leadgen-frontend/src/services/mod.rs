pub mod identity;
pub mod lead_client;
pub mod metrics;
pub mod orchestrator;
pub mod registry;
pub mod session;

pub use identity::{AuthError, IdentityProvider, SignUpOutcome, SupabaseAuth};
pub use lead_client::{GenerationClient, LeadService, LeadServiceError};
pub use orchestrator::{LeadOrchestrator, RequestState, RequestStatus};
pub use registry::{ClientContext, ClientRegistry};
pub use session::SessionManager;
