use axum::{Router, middleware, routing::get};
use eval_api::{config::ApiConfig, state::ApiState};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;

    eval_api::tracing::init_tracing(&config.env);

    let metrics_handle = eval_api::metrics::init_metrics()?;
    tracing::info!("Prometheus metrics exporter initialized");

    let state = ApiState::new(&config)?;

    let cors = eval_api::middleware::cors::create_cors_layer(&config.parsed_allowed_origins());

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Metrics endpoint carries its own state
    let metrics_app = Router::new()
        .route("/metrics", get(eval_api::metrics::metrics_handler))
        .with_state(metrics_handle);

    let app = eval_api::router::router()
        .with_state(state)
        .merge(metrics_app)
        .layer(cors)
        .layer(trace_layer)
        .layer(middleware::from_fn(eval_api::metrics::track_metrics))
        .layer(middleware::from_fn(
            eval_api::middleware::request_id::request_id_middleware,
        ));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(
        environment = ?config.env,
        max_diff_tokens = config.max_diff_tokens,
        "Server running on http://{address}"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
