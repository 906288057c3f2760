use crate::config::LeadServiceSettings;
use crate::models::lead::{LeadGenerationRequest, LeadGenerationResponse};
use async_trait::async_trait;
use leadgen_core::observability::TracedClientExt;
use reqwest::{Client, StatusCode};
use thiserror::Error;

pub const GENERATE_PATH: &str = "/generate/";

#[derive(Debug, Error)]
pub enum LeadServiceError {
    /// Any non-2xx answer; the body is not inspected.
    #[error("Failed to generate leads")]
    Status(StatusCode),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Decode(#[from] serde_json::Error),
}

/// The remote lead generation service.
#[async_trait]
pub trait LeadService: Send + Sync {
    async fn generate(
        &self,
        request: &LeadGenerationRequest,
        token: Option<&str>,
    ) -> Result<LeadGenerationResponse, LeadServiceError>;
}

#[derive(Clone)]
pub struct GenerationClient {
    client: Client,
    settings: LeadServiceSettings,
}

impl GenerationClient {
    pub fn new(client: Client, settings: LeadServiceSettings) -> Self {
        Self { client, settings }
    }

    pub fn generate_url(&self) -> String {
        format!("{}{}", self.settings.url.trim_end_matches('/'), GENERATE_PATH)
    }
}

#[async_trait]
impl LeadService for GenerationClient {
    /// POST the request with the bearer token attached. Without a token the
    /// `Authorization` header is left off and the service decides.
    async fn generate(
        &self,
        request: &LeadGenerationRequest,
        token: Option<&str>,
    ) -> Result<LeadGenerationResponse, LeadServiceError> {
        let url = self.generate_url();

        let mut outbound = self.client.traced_post(&url).json(request);
        if let Some(token) = token {
            outbound = outbound.bearer_auth(token);
        }

        let response = outbound.send().await.map_err(|e| {
            tracing::error!("Failed to send POST request to {}: {}", url, e);
            e
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, niche = %request.niche, "Lead service rejected request");
            return Err(LeadServiceError::Status(status));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
