//! Configuration and settings management
//!
//! Loads board policy from config files and environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Channel posts a submitter waits for after publishing.
pub const DEFAULT_PUBLISH_COOLDOWN: u64 = 3;
/// Maximum photos in one submission (Telegram media group limit).
pub const DEFAULT_MAX_PHOTOS: usize = 10;
/// Warnings that turn into a block.
pub const DEFAULT_MAX_WARNINGS: u8 = 3;

/// What happens to a photo sent after the draft is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoOverflowPolicy {
    /// Reply with a "max N photos" notice.
    #[default]
    Notify,
    /// Drop the photo without a reply.
    Drop,
}

/// Board policy settings.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BoardSettings {
    /// Channel posts required between two publishes of the same submitter.
    #[serde(default = "default_publish_cooldown")]
    pub publish_cooldown: u64,
    /// Photo cap per submission.
    #[serde(default = "default_max_photos")]
    pub max_photos: usize,
    /// Warning count at which a submitter is blocked.
    #[serde(default = "default_max_warnings")]
    pub max_warnings: u8,
    /// Behaviour for photos above the cap.
    #[serde(default)]
    pub photo_overflow: PhotoOverflowPolicy,
    /// Administrator handle shown when publishing fails for configuration reasons.
    pub admin_contact: Option<String>,
}

const fn default_publish_cooldown() -> u64 {
    DEFAULT_PUBLISH_COOLDOWN
}

const fn default_max_photos() -> usize {
    DEFAULT_MAX_PHOTOS
}

const fn default_max_warnings() -> u8 {
    DEFAULT_MAX_WARNINGS
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            publish_cooldown: DEFAULT_PUBLISH_COOLDOWN,
            max_photos: DEFAULT_MAX_PHOTOS,
            max_warnings: DEFAULT_MAX_WARNINGS,
            photo_overflow: PhotoOverflowPolicy::Notify,
            admin_contact: None,
        }
    }
}

impl BoardSettings {
    /// Create new settings by loading from environment and files.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails.
    pub fn new() -> Result<Self, ConfigError> {
        build_config()?.try_deserialize()
    }
}

/// Builds the layered configuration shared by every settings struct.
///
/// Sources, later ones overriding earlier ones: `config/default`,
/// `config/$RUN_MODE`, `config/local`, `APP__*` variables, then plain
/// environment variables (`PUBLISH_COOLDOWN=4` sets `publish_cooldown`).
///
/// # Errors
///
/// Returns a `ConfigError` if a present source cannot be parsed.
pub fn build_config() -> Result<Config, ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
        // Not checked into git
        .add_source(File::with_name("config/local").required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        // ignore_empty treats empty env vars as unset
        .add_source(Environment::default().ignore_empty(true))
        .build()
}
