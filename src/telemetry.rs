use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialises structured logging.
///
/// `RUST_LOG` controls the level (default `info`). JSON output is meant for
/// deployed environments; local development gets the human-readable format.
/// Records emitted through the `log` facade are forwarded as well.
pub fn init_telemetry(json: bool) {
    let env_filter = default_filter();

    if json {
        let formatting_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stdout)
            .json();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(formatting_layer)
            .init();
    } else {
        let formatting_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(formatting_layer)
            .init();
    }
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
