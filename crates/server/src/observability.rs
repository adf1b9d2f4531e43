use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use common::types::ServiceKind;
use once_cell::sync::Lazy;
use prometheus::{register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "products_requests_total",
        "Total HTTP requests handled, by service, route and status",
        &["service", "route", "status"]
    )
    .expect("register products_requests_total")
});

pub static REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "products_request_duration_seconds",
        "Request duration in seconds",
        &["service", "route"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("register products_request_duration_seconds")
});

/// Middleware counting every request and timing it.
pub async fn track_requests(State(kind): State<ServiceKind>, req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let started = Instant::now();
    let res = next.run(req).await;
    REQUEST_DURATION
        .with_label_values(&[kind.as_str(), route.as_str()])
        .observe(started.elapsed().as_secs_f64());
    REQUESTS_TOTAL
        .with_label_values(&[kind.as_str(), route.as_str(), res.status().as_str()])
        .inc();
    res
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}"));
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}

pub async fn metrics() -> (StatusCode, String) {
    encode_metrics()
}
