//! Command-line client for the hivedash admin API.
//!
//! Set HIVEDASH_API_URL and HIVEDASH_API_KEY. Requests use bearer auth.

pub mod api_client;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Format a signed percentage for display, e.g. `+12.50%`.
pub fn format_increase(increase: f64) -> String {
    format!("{:+.2}%", increase)
}
