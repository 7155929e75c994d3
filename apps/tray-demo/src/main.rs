//! notifyarea demo entry point.

mod app;
mod config;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting notifyarea demo"
    );

    let config = config::DemoConfig::load()?;
    tracing::info!(tip = %config.tip, guid = ?config.guid, "configuration loaded");

    let code = app::run(config)?;

    tracing::info!(code, "demo shut down cleanly");
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
