//! Telegram transport settings.

use adboard_core::board::Targets;
use adboard_core::BoardSettings;
use config::ConfigError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Port of the liveness endpoint when `PORT` is unset.
pub const DEFAULT_HEALTH_PORT: u16 = 8080;

/// Initial backoff before retrying a Telegram API call.
pub const TELEGRAM_API_INITIAL_BACKOFF_MS: u64 = 500;
/// Upper bound for a single retry delay.
pub const TELEGRAM_API_MAX_BACKOFF_MS: u64 = 4000;
/// Retries after the first failed attempt.
pub const TELEGRAM_API_MAX_RETRIES: usize = 3;

/// Telegram transport settings loaded from environment variables.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TelegramSettings {
    /// Telegram Bot API token.
    #[serde(alias = "tg_token")]
    pub telegram_token: String,
    /// Broadcast channel receiving published ads.
    pub channel_id: i64,
    /// Staff group; without it staff copies and moderation are disabled.
    pub group_id: Option<i64>,
    /// Port of the liveness endpoint.
    #[serde(default = "default_port")]
    pub port: u16,
}

const fn default_port() -> u16 {
    DEFAULT_HEALTH_PORT
}

impl TelegramSettings {
    /// Create new settings by loading from environment and files.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails or the token is missing.
    pub fn new() -> Result<Self, ConfigError> {
        let settings: Self = adboard_core::config::build_config()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects settings the bot cannot start with.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the token is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.telegram_token.trim().is_empty() {
            return Err(ConfigError::Message(
                "telegram_token (TG_TOKEN) is empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Posting targets derived from the configured chats.
    #[must_use]
    pub const fn targets(&self) -> Targets {
        Targets {
            channel_id: self.channel_id,
            staff_group: self.group_id,
        }
    }
}

/// Combined settings used by the Telegram transport layer.
#[derive(Clone)]
pub struct BotSettings {
    /// Board policy shared with the core.
    pub board: Arc<BoardSettings>,
    /// Telegram-specific settings.
    pub telegram: Arc<TelegramSettings>,
}

impl BotSettings {
    /// Create a new combined settings bundle.
    #[must_use]
    pub fn new(board: BoardSettings, telegram: TelegramSettings) -> Self {
        Self {
            board: Arc::new(board),
            telegram: Arc::new(telegram),
        }
    }
}
