pub mod app;
pub mod auth;
pub mod leads;
pub mod metrics;
