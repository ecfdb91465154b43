//! Prometheus metrics for grading and diff traffic.

use axum::{
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use eval_core::{NormalizePolicy, TokenMode};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize Prometheus metrics exporter
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let builder = PrometheusBuilder::new();

    // Configure histogram buckets for request duration (in seconds)
    let builder = builder.set_buckets_for_metric(
        Matcher::Full("http_request_duration_seconds".to_string()),
        &[0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0],
    )?;

    let handle = builder.install_recorder()?;

    Ok(handle)
}

/// Middleware to record HTTP request metrics
///
/// Requests are labelled with their matched route so unknown paths all
/// share the `unmatched` label.
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = route_label(req.extensions().get::<MatchedPath>());

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .record(duration);

    response
}

fn route_label(matched: Option<&MatchedPath>) -> String {
    matched.map_or_else(|| "unmatched".to_string(), |p| p.as_str().to_string())
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (StatusCode::OK, handle.render())
}

/// Record one graded attempt
pub fn record_grade_event(policy: NormalizePolicy, questions: u32, correct: u32) {
    let policy = match policy {
        NormalizePolicy::Lenient => "lenient",
        NormalizePolicy::Strict => "strict",
    };

    counter!("grade_requests_total", "policy" => policy).increment(1);
    counter!("questions_graded_total", "result" => "correct").increment(u64::from(correct));
    counter!("questions_graded_total", "result" => "incorrect")
        .increment(u64::from(questions - correct));
}

/// Record a diff request
pub fn record_diff_event(mode: TokenMode, success: bool) {
    let mode = match mode {
        TokenMode::Word => "word",
        TokenMode::Char => "char",
    };
    let status = if success { "success" } else { "rejected" };

    counter!("diff_requests_total", "mode" => mode, "status" => status).increment(1);
}
