use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

/// Installs the global subscriber. Output goes to stderr so command output on
/// stdout stays machine readable. `RUST_LOG` overrides the `info` default.
pub fn init_tracing(json: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_log::LogTracer::init()?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        let subscriber = registry.with(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        );
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = registry.with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        );
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}
