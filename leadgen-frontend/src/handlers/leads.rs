use crate::models::client::CurrentClient;
use crate::models::lead_table::LeadTable;
use crate::services::orchestrator::RequestState;
use askama::Template;
use axum::{response::IntoResponse, Form};
use serde::Deserialize;

/// Posted body of the generation form. `pages` arrives as text; anything
/// that is not a number is treated as zero and fails validation.
#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub niche: String,
    #[serde(default)]
    pub pages: String,
}

impl GenerateForm {
    pub fn page_count(&self) -> u32 {
        self.pages.trim().parse().unwrap_or(0)
    }
}

pub struct ResultsView {
    pub loading: bool,
    pub error: Option<String>,
    pub table: Option<LeadTable>,
}

impl ResultsView {
    pub fn new(state: &RequestState, trigger_disabled: bool) -> Self {
        Self {
            loading: state.is_loading() || trigger_disabled,
            error: state.error().map(str::to_string),
            table: LeadTable::project(&state.leads),
        }
    }
}

#[derive(Template)]
#[template(path = "pages/generator.html")]
pub struct GeneratorPageTemplate {
    pub results: ResultsView,
}

#[derive(Template)]
#[template(path = "partials/results.html")]
pub struct ResultsTemplate {
    pub results: ResultsView,
}

pub async fn generate_handler(
    client: CurrentClient,
    Form(form): Form<GenerateForm>,
) -> impl IntoResponse {
    let context = &client.context;

    let Some(_pressed) = context.generate_trigger.try_press() else {
        tracing::debug!(client_id = %client.id, "Ignoring lead request while one is in flight");
        return ResultsTemplate {
            results: ResultsView::new(&context.orchestrator.snapshot(), true),
        };
    };

    let state = context
        .orchestrator
        .submit(&form.niche, form.page_count())
        .await;

    ResultsTemplate {
        results: ResultsView::new(&state, false),
    }
}
