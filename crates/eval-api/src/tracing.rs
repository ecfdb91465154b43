//! Log output for the service.
//!
//! Development gets pretty, human-readable events with source locations.
//! Production gets flattened JSON lines. `RUST_LOG` always wins over the
//! built-in directives (e.g. `RUST_LOG=info,eval_core=trace`).

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

/// Filter used when `RUST_LOG` is not set.
pub fn default_directives(env: &Environment) -> &'static str {
    match env {
        // per-attempt grading and diff events are debug level
        Environment::Development => "debug,tower_http=debug,eval_core=debug,eval_api=debug",
        Environment::Production => "info,tower_http=info,eval_core=warn,eval_api=info",
    }
}

pub fn init_tracing(env: &Environment) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(env)));

    let fmt = tracing_subscriber::fmt::layer().with_target(true);
    let layer = if env.is_development() {
        fmt.pretty()
            .with_file(true)
            .with_line_number(true)
            .with_filter(env_filter)
            .boxed()
    } else {
        fmt.json()
            .with_current_span(true)
            .with_span_list(false)
            .flatten_event(true)
            .with_filter(env_filter)
            .boxed()
    };

    tracing_subscriber::registry().with(layer).init();

    tracing::info!(environment = ?env, "Tracing initialized");
}
