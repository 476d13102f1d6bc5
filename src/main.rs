//! Sukhi admin - backend for managing AI agent profiles and their prompts

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sukhi_admin=debug,tower_http=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting sukhi-admin v{}", env!("CARGO_PKG_VERSION"));

    // Run CLI
    sukhi_admin::cli::run()?;

    Ok(())
}
