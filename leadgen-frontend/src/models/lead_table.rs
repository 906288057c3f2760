use crate::models::lead::Lead;

/// One rendered lead with its two actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadRow {
    pub title: String,
    pub email: String,
    /// Compose an e-mail to the lead.
    pub mail_href: String,
    /// Open the lead's page in a new browsing context.
    pub visit_href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadTable {
    pub summary: String,
    pub rows: Vec<LeadRow>,
}

impl LeadTable {
    pub const COLUMNS: [&'static str; 3] = ["Title", "Email", "Actions"];

    /// Stateless projection of a lead list; `None` when there is nothing to
    /// show, so no header or count is rendered for an empty list.
    pub fn project(leads: &[Lead]) -> Option<Self> {
        if leads.is_empty() {
            return None;
        }

        let rows = leads
            .iter()
            .map(|lead| LeadRow {
                title: lead.title.clone(),
                email: lead.email.clone(),
                mail_href: format!("mailto:{}", lead.email),
                visit_href: lead.url.clone(),
            })
            .collect();

        Some(Self {
            summary: format!("Found {} potential leads for your business", leads.len()),
            rows,
        })
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &Self::COLUMNS
    }
}
