use crate::bot::handlers::{self, Command, TelegramBoard};
use crate::bot::TelegramTransport;
use crate::config::BotSettings;
use crate::health;
use adboard_core::Board;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::{error, info};

/// Run the Telegram transport runtime.
pub async fn run_bot(settings: Arc<BotSettings>) {
    let bot = Bot::new(settings.telegram.telegram_token.clone());
    let board = init_board(&bot, &settings);
    spawn_health_server(settings.telegram.port);
    let handler = setup_handler();

    info!("Bot is running...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![board, settings])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

fn init_board(bot: &Bot, settings: &BotSettings) -> Arc<TelegramBoard> {
    let targets = settings.telegram.targets();
    info!(
        "Initializing board (channel: {}, staff group: {:?}, cooldown: {} posts, max photos: {})",
        targets.channel_id,
        targets.staff_group,
        settings.board.publish_cooldown,
        settings.board.max_photos
    );
    if targets.staff_group.is_none() {
        info!("No staff group configured; staff copies and moderation are disabled.");
    }
    Arc::new(Board::new(
        TelegramTransport::new(bot.clone()),
        settings.board.as_ref().clone(),
        targets,
    ))
}

fn spawn_health_server(port: u16) {
    tokio::spawn(async move {
        if let Err(e) = health::start_health_server(port).await {
            error!("Health endpoint stopped: {}", e);
        }
    });
}

fn is_staff_chat(chat_id: ChatId, settings: &BotSettings) -> bool {
    settings.telegram.group_id == Some(chat_id.0)
}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(Update::filter_channel_post().endpoint(handle_channel_post))
        .branch(
            Update::filter_callback_query()
                .filter(|q: CallbackQuery, settings: Arc<BotSettings>| {
                    q.message
                        .as_ref()
                        .is_some_and(|m| is_staff_chat(m.chat().id, &settings))
                })
                .endpoint(handle_staff_callback),
        )
        .branch(
            Update::filter_message()
                .branch(
                    dptree::filter(|msg: Message, settings: Arc<BotSettings>| {
                        is_staff_chat(msg.chat.id, &settings)
                            && msg.reply_to_message().is_some()
                            && msg.text().is_some()
                    })
                    .endpoint(handle_staff_reply),
                )
                .branch(
                    dptree::filter(|msg: Message| msg.chat.is_private())
                        .branch(
                            dptree::entry()
                                .filter_command::<Command>()
                                .endpoint(handle_command),
                        )
                        .branch(dptree::endpoint(handle_submitter_message)),
                ),
        )
}

async fn handle_channel_post(
    msg: Message,
    board: Arc<TelegramBoard>,
) -> Result<(), teloxide::RequestError> {
    handlers::channel_post(msg, board).await;
    respond(())
}

async fn handle_command(
    msg: Message,
    cmd: Command,
    board: Arc<TelegramBoard>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = handlers::command(msg, cmd, board).await {
        error!("Command error: {}", e);
    }
    respond(())
}

async fn handle_submitter_message(
    msg: Message,
    board: Arc<TelegramBoard>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = handlers::submitter_message(msg, board).await {
        error!("Submitter message handler error: {}", e);
    }
    respond(())
}

async fn handle_staff_callback(
    bot: Bot,
    q: CallbackQuery,
    board: Arc<TelegramBoard>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = handlers::staff_callback(bot, q, board).await {
        error!("Staff callback handler error: {}", e);
    }
    respond(())
}

async fn handle_staff_reply(
    msg: Message,
    board: Arc<TelegramBoard>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = handlers::staff_reply(msg, board).await {
        error!("Staff reply handler error: {}", e);
    }
    respond(())
}
