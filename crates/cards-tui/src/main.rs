mod action;
mod app;
mod app_state;
mod component;
mod components;
mod focus;
mod player;
mod theme;
mod widgets;

use cards_proto::config::Config;
use cards_proto::fetch::ItemsClient;
use cards_proto::platform;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = platform::log_path();

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // ── Load config ──────────────────────────────────────────────────────────
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("cards: config error, using defaults: {}", e);
            Config::default()
        }
    };

    // RUST_LOG wins over the configured filter.
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.log.filter.clone());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("cards log: {}", log_path.display());

    tracing::info!("cards starting, endpoint {}", config.source.endpoint);

    let client = ItemsClient::new(config.source.endpoint.clone())?;
    let app = app::App::new(config, client);
    app.run().await?;

    tracing::info!("cards exiting");
    Ok(())
}
