pub mod config;
pub mod diff;
pub mod error;
pub mod grading;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod state;
pub mod tracing;

pub use config::ApiConfig;
pub use state::ApiState;
