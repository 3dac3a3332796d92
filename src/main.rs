use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kaji_agent::{
    agent::Agent,
    calendar::CalendarClient,
    cli,
    config::Config,
    openai::ChatClient,
    store::TodoStore,
    tools::ToolContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ 設定エラー: {} (.envファイルを確認してください)", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        model = %config.openai.model,
        "Kaji agent starting..."
    );

    // Initialize chat client
    let chat = match ChatClient::new(&config.openai) {
        Ok(c) => {
            info!(base_url = %c.base_url(), "Chat client initialized");
            c
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize chat client");
            return Err(e.into());
        }
    };

    // Initialize calendar client
    let calendar = match CalendarClient::new(config.calendar.clone()) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Failed to initialize calendar client");
            return Err(e.into());
        }
    };

    // Todo store: created lazily on first write, missing file reads as empty
    let store = TodoStore::new(config.store.todo_path.clone());
    info!(path = %store.path().display(), "Todo store ready");

    let agent = Agent::new(chat, ToolContext { store, calendar }, &config);

    cli::run(agent).await?;

    info!("Shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        kaji_agent::config::LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        kaji_agent::config::LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
