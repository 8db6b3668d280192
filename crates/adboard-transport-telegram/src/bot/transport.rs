//! teloxide-backed [`ChatTransport`].

use crate::bot::resilient::{edit_message_resilient, send_message_resilient};
use adboard_core::transport::InlineButton;
use adboard_core::{ChatTransport, Markup, MediaItem, TransportError};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    ChatId, FileId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, InputMedia,
    InputMediaPhoto, KeyboardButton, KeyboardMarkup, KeyboardRemove, MessageId, ReplyMarkup,
};
use teloxide::RequestError;

/// Sends board output through the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    /// Wraps a bot handle.
    #[must_use]
    pub const fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn transport_error(e: &RequestError) -> TransportError {
    TransportError::classify(e.to_string())
}

fn inline_button(button: &InlineButton) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(button.text.clone(), button.data.clone())
}

/// Converts a core keyboard into its Telegram form.
#[must_use]
pub fn reply_markup(markup: &Markup) -> Option<ReplyMarkup> {
    match markup {
        Markup::None => None,
        Markup::Reply(rows) => {
            let keyboard: Vec<Vec<KeyboardButton>> = rows
                .iter()
                .map(|row| row.iter().map(KeyboardButton::new).collect())
                .collect();
            Some(KeyboardMarkup::new(keyboard).resize_keyboard().into())
        }
        Markup::RemoveKeyboard => Some(KeyboardRemove::new().into()),
        Markup::Inline(rows) => {
            let keyboard: Vec<Vec<InlineKeyboardButton>> = rows
                .iter()
                .map(|row| row.iter().map(inline_button).collect())
                .collect();
            Some(InlineKeyboardMarkup::new(keyboard).into())
        }
    }
}

fn input_photo(item: &MediaItem) -> InputFile {
    InputFile::file_id(FileId(item.photo.clone()))
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_text(
        &self,
        chat_id: i64,
        text: String,
        markup: Markup,
    ) -> Result<i32, TransportError> {
        let msg = send_message_resilient(&self.bot, ChatId(chat_id), &text, reply_markup(&markup))
            .await
            .map_err(|e| transport_error(&e))?;
        Ok(msg.id.0)
    }

    async fn send_media_group(
        &self,
        chat_id: i64,
        media: Vec<MediaItem>,
    ) -> Result<(), TransportError> {
        let chat_id = ChatId(chat_id);
        // sendMediaGroup needs at least two items.
        if let [item] = media.as_slice() {
            let mut req = self.bot.send_photo(chat_id, input_photo(item));
            if let Some(caption) = &item.caption {
                req = req.caption(caption.clone());
            }
            req.await.map_err(|e| transport_error(&e))?;
            return Ok(());
        }

        let group: Vec<InputMedia> = media
            .iter()
            .map(|item| {
                let mut photo = InputMediaPhoto::new(input_photo(item));
                if let Some(caption) = &item.caption {
                    photo = photo.caption(caption.clone());
                }
                InputMedia::Photo(photo)
            })
            .collect();
        self.bot
            .send_media_group(chat_id, group)
            .await
            .map_err(|e| transport_error(&e))?;
        Ok(())
    }

    async fn edit_text(
        &self,
        chat_id: i64,
        message_id: i32,
        text: String,
    ) -> Result<(), TransportError> {
        edit_message_resilient(&self.bot, ChatId(chat_id), MessageId(message_id), &text)
            .await
            .map_err(|e| transport_error(&e))
    }
}
