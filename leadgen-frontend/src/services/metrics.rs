use prometheus::{Encoder, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

// Metrics
pub static HTTP_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static HTTP_REQUEST_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static LEAD_GENERATION_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static AUTH_ATTEMPTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static SESSION_REFRESH_FAILURES_TOTAL: OnceLock<IntCounter> = OnceLock::new();

pub fn init_metrics() -> Result<(), prometheus::Error> {
    let registry = Registry::new();

    let requests_total = IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests"),
        &["method", "path", "status"],
    )?;
    let request_duration = HistogramVec::new(
        prometheus::HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
        ),
        &["method", "path", "status"],
    )?;
    let lead_requests = IntCounterVec::new(
        Opts::new(
            "lead_generation_requests_total",
            "Lead generation submissions by outcome",
        ),
        &["outcome"],
    )?;
    let auth_attempts = IntCounterVec::new(
        Opts::new("auth_attempts_total", "Sign-in and sign-up attempts by outcome"),
        &["operation", "outcome"],
    )?;
    let refresh_failures = IntCounter::new(
        "session_refresh_failures_total",
        "Best-effort session refreshes that failed",
    )?;

    registry.register(Box::new(requests_total.clone()))?;
    registry.register(Box::new(request_duration.clone()))?;
    registry.register(Box::new(lead_requests.clone()))?;
    registry.register(Box::new(auth_attempts.clone()))?;
    registry.register(Box::new(refresh_failures.clone()))?;

    // Initialize globals
    let _ = REGISTRY.set(registry);
    let _ = HTTP_REQUESTS_TOTAL.set(requests_total);
    let _ = HTTP_REQUEST_DURATION_SECONDS.set(request_duration);
    let _ = LEAD_GENERATION_REQUESTS_TOTAL.set(lead_requests);
    let _ = AUTH_ATTEMPTS_TOTAL.set(auth_attempts);
    let _ = SESSION_REFRESH_FAILURES_TOTAL.set(refresh_failures);

    Ok(())
}

// Recorders are no-ops until init_metrics has run (unit and integration tests).

pub fn record_http_request(method: &str, path: &str, status: &str, seconds: f64) {
    if let Some(counter) = HTTP_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[method, path, status]).inc();
    }
    if let Some(histogram) = HTTP_REQUEST_DURATION_SECONDS.get() {
        histogram
            .with_label_values(&[method, path, status])
            .observe(seconds);
    }
}

pub fn record_lead_generation(outcome: &str) {
    if let Some(counter) = LEAD_GENERATION_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

pub fn record_auth_attempt(operation: &str, outcome: &str) {
    if let Some(counter) = AUTH_ATTEMPTS_TOTAL.get() {
        counter.with_label_values(&[operation, outcome]).inc();
    }
}

pub fn record_refresh_failure() {
    if let Some(counter) = SESSION_REFRESH_FAILURES_TOTAL.get() {
        counter.inc();
    }
}

pub fn get_metrics() -> anyhow::Result<String> {
    let registry = REGISTRY
        .get()
        .ok_or_else(|| anyhow::anyhow!("metrics registry not initialized"))?;

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
