//! Outbound chat transport seam.
//!
//! The board never talks to a messaging API directly. Everything it sends goes
//! through [`ChatTransport`], which the Telegram crate implements with teloxide
//! and tests implement with recording fakes or mocks.

use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a chat transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The target chat does not exist or the bot cannot see it.
    #[error("chat not found: {0}")]
    ChatNotFound(String),
    /// The bot is not allowed to post into the target chat.
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// Any other API or network failure.
    #[error("transport error: {0}")]
    Api(String),
}

impl TransportError {
    /// Classifies a raw API error message.
    ///
    /// # Examples
    ///
    /// ```
    /// use adboard_core::TransportError;
    ///
    /// let err = TransportError::classify("Bad Request: chat not found");
    /// assert!(err.is_configuration());
    ///
    /// let err = TransportError::classify("Network timeout");
    /// assert!(!err.is_configuration());
    /// ```
    #[must_use]
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        let lowered = message.to_lowercase();
        if lowered.contains("chat not found") {
            Self::ChatNotFound(message)
        } else if lowered.contains("forbidden") {
            Self::Forbidden(message)
        } else {
            Self::Api(message)
        }
    }

    /// Whether the failure points at a misconfigured target or missing rights.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::ChatNotFound(_) | Self::Forbidden(_))
    }
}

/// One inline button: a label and the callback payload it sends back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    /// Button label.
    pub text: String,
    /// Callback payload.
    pub data: String,
}

impl InlineButton {
    /// Creates a callback button.
    #[must_use]
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            data: data.into(),
        }
    }
}

/// Keyboard attached to an outbound text message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Markup {
    /// Leave whatever keyboard the user currently has.
    #[default]
    None,
    /// Reply keyboard with rows of button labels.
    Reply(Vec<Vec<String>>),
    /// Remove the reply keyboard.
    RemoveKeyboard,
    /// Inline keyboard with rows of callback buttons.
    Inline(Vec<Vec<InlineButton>>),
}

/// One photo of a grouped post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    /// Transport-level photo reference (a Telegram file id).
    pub photo: String,
    /// Caption, only ever set on the first item of a batch.
    pub caption: Option<String>,
}

/// Primitives the board needs from a messaging platform.
///
/// Text messages are rendered as HTML; callers escape user-provided content.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Sends a text message and returns its message id.
    async fn send_text(
        &self,
        chat_id: i64,
        text: String,
        markup: Markup,
    ) -> Result<i32, TransportError>;

    /// Sends photos as a single grouped post.
    async fn send_media_group(
        &self,
        chat_id: i64,
        media: Vec<MediaItem>,
    ) -> Result<(), TransportError>;

    /// Replaces the text of a previously sent message, dropping its inline keyboard.
    async fn edit_text(
        &self,
        chat_id: i64,
        message_id: i32,
        text: String,
    ) -> Result<(), TransportError>;
}
