use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use content_sync::app::App;
use content_sync::model::Config;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    let mut app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start content sync");
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    app.start();
    tracing::info!("Content sync running, press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    app.stop().await;

    Ok(())
}
