pub mod auth_form;
pub mod client;
pub mod lead;
pub mod lead_table;
pub mod session;
pub mod trigger;
