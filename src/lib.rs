pub mod action;
pub mod agent;
pub mod config;
pub mod errors;
pub mod llm;
pub mod parser;

pub use crate::agent::bridge::TarsAgent;
pub use crate::errors::{TarsError, TarsResult};
pub use crate::parser::types::{ActionRecord, ParsedSections};
pub use crate::parser::{parse_response, ResponseParser};

/// Install the global tracing subscriber. `RUST_LOG` overrides `default_filter`.
/// Logs go to stderr; stdout is reserved for JSON output.
pub fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
