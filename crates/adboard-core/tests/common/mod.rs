#![allow(dead_code)]

use adboard_core::board::Targets;
use adboard_core::config::BoardSettings;
use adboard_core::{Board, ChatTransport, Markup, MediaItem, Submitter, SubmitterInput, TransportError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

pub const CHANNEL: i64 = -1_001_000;
pub const STAFF: i64 = -2_002_000;
pub const SELLER: i64 = 4242;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentText {
    pub chat_id: i64,
    pub message_id: i32,
    pub text: String,
    pub markup: Markup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentGroup {
    pub chat_id: i64,
    pub media: Vec<MediaItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub chat_id: i64,
    pub message_id: i32,
    pub text: String,
}

#[derive(Default)]
struct Log {
    texts: Vec<SentText>,
    groups: Vec<SentGroup>,
    edits: Vec<Edit>,
}

/// Transport fake that records everything and hands out increasing message ids.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    log: Arc<Mutex<Log>>,
    next_id: Arc<AtomicI32>,
    channel_failure: Arc<Mutex<Option<TransportError>>>,
    failing_after_publish: Arc<Mutex<Option<i64>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every media group sent to `CHANNEL` fail with `error`.
    pub fn fail_channel_with(&self, error: TransportError) {
        *self.channel_failure.lock().expect("lock") = Some(error);
    }

    /// Makes texts to `chat_id` fail once something was published in `CHANNEL`.
    pub fn fail_texts_after_publish(&self, chat_id: i64) {
        *self.failing_after_publish.lock().expect("lock") = Some(chat_id);
    }

    pub fn texts(&self) -> Vec<SentText> {
        self.log.lock().expect("lock").texts.clone()
    }

    pub fn texts_to(&self, chat_id: i64) -> Vec<SentText> {
        self.texts()
            .into_iter()
            .filter(|t| t.chat_id == chat_id)
            .collect()
    }

    pub fn last_text_to(&self, chat_id: i64) -> SentText {
        self.texts_to(chat_id)
            .pop()
            .expect("no message was sent to this chat")
    }

    pub fn groups(&self) -> Vec<SentGroup> {
        self.log.lock().expect("lock").groups.clone()
    }

    pub fn groups_to(&self, chat_id: i64) -> Vec<SentGroup> {
        self.groups()
            .into_iter()
            .filter(|g| g.chat_id == chat_id)
            .collect()
    }

    pub fn edits(&self) -> Vec<Edit> {
        self.log.lock().expect("lock").edits.clone()
    }

    pub fn message_count(&self) -> usize {
        let log = self.log.lock().expect("lock");
        log.texts.len() + log.groups.len() + log.edits.len()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_text(
        &self,
        chat_id: i64,
        text: String,
        markup: Markup,
    ) -> Result<i32, TransportError> {
        let failing = *self.failing_after_publish.lock().expect("lock");
        if failing == Some(chat_id) && !self.groups_to(CHANNEL).is_empty() {
            return Err(TransportError::classify("Network timeout"));
        }
        let message_id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.log.lock().expect("lock").texts.push(SentText {
            chat_id,
            message_id,
            text,
            markup,
        });
        Ok(message_id)
    }

    async fn send_media_group(
        &self,
        chat_id: i64,
        media: Vec<MediaItem>,
    ) -> Result<(), TransportError> {
        if chat_id == CHANNEL {
            if let Some(error) = self.channel_failure.lock().expect("lock").clone() {
                return Err(error);
            }
        }
        self.log
            .lock()
            .expect("lock")
            .groups
            .push(SentGroup { chat_id, media });
        Ok(())
    }

    async fn edit_text(
        &self,
        chat_id: i64,
        message_id: i32,
        text: String,
    ) -> Result<(), TransportError> {
        self.log.lock().expect("lock").edits.push(Edit {
            chat_id,
            message_id,
            text,
        });
        Ok(())
    }
}

pub fn seller() -> Submitter {
    Submitter {
        id: SELLER,
        username: Some("bike_seller".to_string()),
        first_name: "Alex".to_string(),
    }
}

pub fn board_with(transport: RecordingTransport, settings: BoardSettings) -> Board<RecordingTransport> {
    Board::new(
        transport,
        settings,
        Targets {
            channel_id: CHANNEL,
            staff_group: Some(STAFF),
        },
    )
}

pub fn board(transport: RecordingTransport) -> Board<RecordingTransport> {
    board_with(transport, BoardSettings::default())
}

pub fn text(t: &str) -> SubmitterInput {
    SubmitterInput::Text(t.to_string())
}

pub fn photo(id: &str) -> SubmitterInput {
    SubmitterInput::Photo(id.to_string())
}

/// Drives `from` through a whole submission up to the confirmation prompt.
pub async fn prepare_ad(
    board: &Board<RecordingTransport>,
    from: &Submitter,
    photos: &[&str],
    caption: &str,
) {
    use adboard_core::views::{FINISH_PHOTOS_BUTTON, SUBMIT_BUTTON};

    board
        .handle_submitter(from, text(SUBMIT_BUTTON))
        .await
        .expect("submit");
    for id in photos {
        board
            .handle_submitter(from, photo(id))
            .await
            .expect("photo");
    }
    board
        .handle_submitter(from, text(FINISH_PHOTOS_BUTTON))
        .await
        .expect("finish");
    board
        .handle_submitter(from, text(caption))
        .await
        .expect("caption");
}

pub async fn confirm(board: &Board<RecordingTransport>, from: &Submitter) {
    board
        .handle_submitter(from, text(adboard_core::views::CONFIRM_BUTTON))
        .await
        .expect("confirm");
}
