use anyhow::Result;
use receptionist::config::AppConfig;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "receptionist=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Heritage Cafe receptionist dashboard");

    let config_path = std::env::args()
        .skip_while(|arg| arg != "--config")
        .nth(1);
    let config = AppConfig::load(config_path.as_deref())?;
    config.validate()?;

    receptionist::ui::run(config).map_err(|e| anyhow::anyhow!("UI error: {}", e))?;

    Ok(())
}
