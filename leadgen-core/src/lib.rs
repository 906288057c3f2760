//! leadgen-core: Shared infrastructure for the lead generation frontend.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
