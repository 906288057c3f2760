use leadgen_core::error::AppError;
use secrecy::Secret;
use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub identity: IdentitySettings,
    pub lead_service: LeadServiceSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Connection to the hosted identity provider (Supabase GoTrue).
#[derive(Deserialize, Clone)]
pub struct IdentitySettings {
    /// Project URL, e.g. https://xyz.supabase.co.
    pub url: String,
    /// Public (anon) API key sent as the `apikey` header.
    pub api_key: Secret<String>,
    /// Where the confirmation e-mail sent on sign-up links back to.
    pub redirect_to: String,
}

#[derive(Deserialize, Clone)]
pub struct LeadServiceSettings {
    /// Base URL; requests go to `{url}/generate/`.
    pub url: String,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct AuthSettings {
    /// Registers the sign-up route and renders its button.
    #[serde(default)]
    pub sign_up_enabled: bool,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct SessionSettings {
    #[serde(default)]
    pub refresh_policy: RefreshPolicy,
}

/// How a lead request orders the best-effort session refresh relative to
/// reading the bearer token.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Start the refresh and read the cached token without waiting for it.
    #[default]
    Concurrent,
    /// Wait for the refresh (ignoring its failure) before reading the token.
    BeforeToken,
}

#[derive(Deserialize, Clone, Debug)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP gRPC endpoint; traces are only exported when set.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn get_configuration() -> Result<Settings, AppError> {
    let base_path = std::env::current_dir().map_err(anyhow::Error::from)?;

    // Running from the crate directory or from the workspace root
    let configuration_directory = if base_path.ends_with("leadgen-frontend") {
        base_path.join("config")
    } else {
        base_path.join("leadgen-frontend").join("config")
    };

    leadgen_core::config::load_layered(&configuration_directory.join("base.yaml"))
}
