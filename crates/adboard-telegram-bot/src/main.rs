mod logging;

use adboard_core::BoardSettings;
use adboard_transport_telegram::config::{BotSettings, TelegramSettings};
use adboard_transport_telegram::runner::run_bot;
use dotenvy::dotenv;
use logging::{init_logging, RedactionPatterns};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenv().ok();

    // Redaction has to exist before the first log line
    let patterns = Arc::new(RedactionPatterns::new().map_err(|e| {
        eprintln!("Failed to compile regex patterns: {e}");
        e
    })?);
    init_logging(patterns);

    info!("Starting ad board bot...");

    let settings = init_settings();
    run_bot(settings).await;

    Ok(())
}

fn init_settings() -> Arc<BotSettings> {
    let board_settings = match BoardSettings::new() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load board configuration: {}", e);
            std::process::exit(1);
        }
    };
    let telegram_settings = match TelegramSettings::new() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load telegram configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Configuration loaded successfully (cooldown: {} posts, max warnings: {}).",
        board_settings.publish_cooldown, board_settings.max_warnings
    );
    Arc::new(BotSettings::new(board_settings, telegram_settings))
}
