use serde::{Deserialize, Serialize};
use validator::Validate;

/// A prospective business contact returned by the lead service.
///
/// Leads carry no identifier; equality and hashing over the whole
/// `(title, url, email)` triple serve as the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lead {
    pub title: String,
    pub url: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct LeadGenerationRequest {
    #[validate(length(min = 1, message = "Niche is required"))]
    pub niche: String,

    #[validate(range(min = 1, max = 10, message = "Pages must be between 1 and 10"))]
    pub pages: u32,
}

impl LeadGenerationRequest {
    pub fn new(niche: impl Into<String>, pages: u32) -> Self {
        Self {
            niche: niche.into(),
            pages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadGenerationResponse {
    pub leads: Vec<Lead>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_to_wire_shape() {
        let body = serde_json::to_value(LeadGenerationRequest::new("Construction", 2)).unwrap();
        assert_eq!(body, serde_json::json!({"niche": "Construction", "pages": 2}));
    }

    #[test]
    fn response_parses_lead_triples() {
        let response: LeadGenerationResponse = serde_json::from_str(
            r#"{"leads":[{"title":"Acme Co","url":"https://acme.example","email":"a@acme.example"}]}"#,
        )
        .unwrap();
        assert_eq!(response.leads.len(), 1);
        assert_eq!(response.leads[0].title, "Acme Co");
    }
}
