use crate::bot::TelegramTransport;
use adboard_core::{Board, Submitter, SubmitterInput};
use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::PhotoSize;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info};

/// Board instance wired to Telegram.
pub type TelegramBoard = Board<TelegramTransport>;

/// Supported commands for the bot
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    /// Start (or restart) a submission
    #[command(description = "Start the bot.")]
    Start,
    /// Same as `/start`
    #[command(description = "Start the bot.")]
    Auto,
    /// Show how posting works
    #[command(description = "How to post an ad.")]
    Help,
}

/// Identity of the message sender, if Telegram provided one.
#[must_use]
pub fn submitter_from(msg: &Message) -> Option<Submitter> {
    msg.from.as_ref().map(|user| Submitter {
        id: user.id.0.cast_signed(),
        username: user.username.clone(),
        first_name: user.first_name.clone(),
    })
}

/// Reference of the largest size of a photo.
#[must_use]
pub fn largest_photo(sizes: &[PhotoSize]) -> Option<String> {
    sizes
        .iter()
        .max_by_key(|p| u64::from(p.width) * u64::from(p.height))
        .map(|p| p.file.id.0.clone())
}

/// Classifies a private message into board input.
#[must_use]
pub fn submitter_input(msg: &Message) -> SubmitterInput {
    if let Some(text) = msg.text() {
        return SubmitterInput::Text(text.to_string());
    }
    match msg.photo().and_then(largest_photo) {
        Some(photo) => SubmitterInput::Photo(photo),
        None => SubmitterInput::Other,
    }
}

/// Command handler
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn command(msg: Message, cmd: Command, board: Arc<TelegramBoard>) -> Result<()> {
    let Some(from) = submitter_from(&msg) else {
        return Ok(());
    };
    match cmd {
        Command::Start | Command::Auto => {
            board.handle_submitter(&from, SubmitterInput::Start).await?;
        }
        Command::Help => {
            board.handle_help(&from).await?;
        }
    }
    Ok(())
}

/// Private-chat input handler (text, photos and everything else).
///
/// # Errors
///
/// Returns an error if a reply to the submitter cannot be sent.
pub async fn submitter_message(msg: Message, board: Arc<TelegramBoard>) -> Result<()> {
    let Some(from) = submitter_from(&msg) else {
        debug!("Ignoring private message without sender");
        return Ok(());
    };
    board.handle_submitter(&from, submitter_input(&msg)).await?;
    Ok(())
}

/// Channel post handler: feeds the channel counter.
pub async fn channel_post(msg: Message, board: Arc<TelegramBoard>) {
    board.handle_channel_post(msg.chat.id.0).await;
}

/// Moderation button handler.
///
/// # Errors
///
/// Returns an error if the reason prompt cannot be posted.
pub async fn staff_callback(bot: Bot, q: CallbackQuery, board: Arc<TelegramBoard>) -> Result<()> {
    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };

    let _ = bot.answer_callback_query(q.id.clone()).await;

    let Some(message) = q.message.as_ref() else {
        debug!("Callback {data:?} without message");
        return Ok(());
    };
    info!(
        "Staff member {} pressed {data:?}",
        q.from.id.0.cast_signed()
    );
    board
        .handle_staff_callback(message.chat().id.0, message.id().0, data)
        .await?;
    Ok(())
}

/// Staff-group reply handler: reasons and cancellations.
///
/// # Errors
///
/// Returns an error if the staff notice cannot be sent.
pub async fn staff_reply(msg: Message, board: Arc<TelegramBoard>) -> Result<()> {
    let (Some(replied), Some(text)) = (msg.reply_to_message(), msg.text()) else {
        return Ok(());
    };
    board
        .handle_staff_reply(msg.chat.id.0, replied.id.0, text)
        .await?;
    Ok(())
}
