//! Event-processing facade.
//!
//! [`Board`] owns every piece of mutable board state (sessions, rate limiter,
//! channel counter, warnings, pending staff actions) behind one async mutex.
//! Each inbound event holds the lock for its whole run, so events are applied
//! one at a time in arrival order no matter how many dispatcher workers call in.

use crate::channel::ChannelMonitor;
use crate::config::{BoardSettings, PhotoOverflowPolicy, DEFAULT_MAX_PHOTOS};
use crate::dialogue::{DialogueEvent, DialogueState, Session, Step, MAX_CAPTION_CHARS};
use crate::draft::Draft;
use crate::moderation::{
    CallbackAction, ModerationAction, PendingAction, PendingActions, WarnOutcome, WarningLedger,
};
use crate::rate_limit::{RateLimiter, RateStatus};
use crate::transport::{ChatTransport, Markup, MediaItem, TransportError};
use crate::views::{self, BoardView, DefaultBoardView, StaffView, CANCEL_WORD};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Errors surfaced by board event handlers.
#[derive(Error, Debug)]
pub enum BoardError {
    /// Sending a reply failed.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Identity of the person behind a submitter event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitter {
    /// User id; also the id of their private chat with the bot.
    pub id: i64,
    /// Public username without `@`.
    pub username: Option<String>,
    /// First name, used when there is no username.
    pub first_name: String,
}

impl Submitter {
    /// Display handle for staff notices: `@username` or the first name.
    #[must_use]
    pub fn handle(&self) -> String {
        match &self.username {
            Some(username) => format!("@{username}"),
            None if !self.first_name.is_empty() => self.first_name.clone(),
            None => format!("id {}", self.id),
        }
    }
}

/// Raw input from a submitter's private chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitterInput {
    /// `/start` (or `/auto`).
    Start,
    /// Any text, button presses included.
    Text(String),
    /// A photo, as the reference of its largest size.
    Photo(String),
    /// Anything else (stickers, documents, voice…).
    Other,
}

/// Where the board posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Targets {
    /// Broadcast channel receiving published ads.
    pub channel_id: i64,
    /// Staff group receiving copies and moderation controls.
    pub staff_group: Option<i64>,
}

struct BoardState {
    sessions: HashMap<i64, Session>,
    limiter: RateLimiter,
    monitor: ChannelMonitor,
    warnings: WarningLedger,
    pending: PendingActions,
    profiles: HashMap<i64, String>,
}

impl BoardState {
    fn handle_of(&self, user: i64) -> String {
        self.profiles
            .get(&user)
            .cloned()
            .unwrap_or_else(|| format!("id {user}"))
    }
}

/// The classified-ad board.
pub struct Board<T> {
    transport: T,
    settings: BoardSettings,
    targets: Targets,
    state: Mutex<BoardState>,
}

impl<T: ChatTransport> Board<T> {
    /// Creates a board posting through `transport`.
    ///
    /// `max_photos` is clamped to what a single media group can carry.
    pub fn new(transport: T, mut settings: BoardSettings, targets: Targets) -> Self {
        settings.max_photos = settings.max_photos.clamp(1, DEFAULT_MAX_PHOTOS);
        let state = BoardState {
            sessions: HashMap::new(),
            limiter: RateLimiter::new(settings.publish_cooldown),
            monitor: ChannelMonitor::new(targets.channel_id),
            warnings: WarningLedger::new(settings.max_warnings),
            pending: PendingActions::new(),
            profiles: HashMap::new(),
        };
        Self {
            transport,
            settings,
            targets,
            state: Mutex::new(state),
        }
    }

    /// Board policy in effect.
    pub const fn settings(&self) -> &BoardSettings {
        &self.settings
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Submitter side
    // ─────────────────────────────────────────────────────────────────────────

    /// Handles one input from a submitter's private chat.
    ///
    /// # Errors
    ///
    /// Returns an error if a reply to the submitter cannot be sent. Publish
    /// failures are reported to the submitter and are not errors.
    pub async fn handle_submitter(
        &self,
        from: &Submitter,
        input: SubmitterInput,
    ) -> Result<(), BoardError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let user = from.id;

        if self.reject_blocked(state, from).await? {
            return Ok(());
        }
        state.profiles.insert(user, from.handle());

        let current = state
            .sessions
            .get(&user)
            .map_or(DialogueState::Idle, Session::state);
        let event = match input {
            SubmitterInput::Start => DialogueEvent::Start,
            SubmitterInput::Text(text) => DialogueEvent::from_text(current, &text),
            SubmitterInput::Photo(photo) => DialogueEvent::Photo(photo),
            SubmitterInput::Other => DialogueEvent::NonText,
        };

        let needs_rate_check = match event {
            DialogueEvent::SubmitPressed => true,
            DialogueEvent::Confirm => current == DialogueState::AwaitingConfirmation,
            _ => false,
        };
        if needs_rate_check {
            if let RateStatus::Limited { remaining } =
                state.limiter.is_limited(user, state.monitor.count())
            {
                info!("User {user} is rate limited ({remaining} channel posts left).");
                self.send(user, DefaultBoardView::rate_limited(remaining), Markup::None)
                    .await?;
                return Ok(());
            }
        }

        let max_photos = self.settings.max_photos;
        let step = match state.sessions.get_mut(&user) {
            Some(session) => session.apply(event, max_photos),
            None if matches!(event, DialogueEvent::Start | DialogueEvent::SubmitPressed) => {
                let mut session = Session::new();
                let step = session.apply(event, max_photos);
                state.sessions.insert(user, session);
                step
            }
            None => Step::Ignored,
        };

        match step {
            Step::Welcomed => {
                info!("User {user} ({}) initiated /start command.", from.handle());
                self.send(user, DefaultBoardView::welcome(), views::start_keyboard())
                    .await?;
            }
            Step::AskedPhotos | Step::Restarted => {
                info!("User {user} started a new submission.");
                self.send(user, DefaultBoardView::ask_photos(), Markup::RemoveKeyboard)
                    .await?;
            }
            Step::PhotoAdded(count) => {
                self.send(
                    user,
                    DefaultBoardView::photo_received(count, max_photos),
                    views::finish_photos_keyboard(),
                )
                .await?;
            }
            Step::PhotoRejected => match self.settings.photo_overflow {
                PhotoOverflowPolicy::Notify => {
                    self.send(user, DefaultBoardView::photo_limit(max_photos), Markup::None)
                        .await?;
                }
                PhotoOverflowPolicy::Drop => {
                    debug!("Dropping photo above the limit from user {user}");
                }
            },
            Step::NoPhotos => {
                self.send(user, DefaultBoardView::no_photos(), Markup::None)
                    .await?;
            }
            Step::AskedCaption => {
                self.send(user, DefaultBoardView::ask_caption(), Markup::RemoveKeyboard)
                    .await?;
            }
            Step::NeedText => {
                self.send(user, DefaultBoardView::need_text(), Markup::None)
                    .await?;
            }
            Step::CaptionTooLong => {
                self.send(
                    user,
                    DefaultBoardView::caption_too_long(MAX_CAPTION_CHARS),
                    Markup::None,
                )
                .await?;
            }
            Step::AwaitingConfirmation => {
                self.send(
                    user,
                    DefaultBoardView::confirm_prompt(),
                    views::confirm_keyboard(),
                )
                .await?;
            }
            Step::Publish(batch) => {
                self.publish(state, from, batch).await?;
            }
            Step::Ignored => {
                debug!("Ignoring input from user {user} in state {current:?}");
            }
        }
        Ok(())
    }

    /// Answers `/help`. Blocked submitters get the blocked notice instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the reply cannot be sent.
    pub async fn handle_help(&self, from: &Submitter) -> Result<(), BoardError> {
        let guard = self.state.lock().await;
        if self.reject_blocked(&guard, from).await? {
            return Ok(());
        }
        self.send(from.id, DefaultBoardView::help(), Markup::None)
            .await
    }

    /// Sends the blocked notice if `from` is blocked. Returns whether they were.
    async fn reject_blocked(&self, state: &BoardState, from: &Submitter) -> Result<bool, BoardError> {
        if !state.warnings.is_blocked(from.id) {
            return Ok(false);
        }
        info!("Blocked user {} ({}) tried to use the bot.", from.id, from.handle());
        self.send(from.id, DefaultBoardView::blocked_notice(), Markup::None)
            .await?;
        Ok(true)
    }

    async fn publish(
        &self,
        state: &mut BoardState,
        from: &Submitter,
        batch: Vec<MediaItem>,
    ) -> Result<(), BoardError> {
        let user = from.id;
        if let Err(e) = self
            .transport
            .send_media_group(self.targets.channel_id, batch)
            .await
        {
            error!("Failed to publish ad of user {user}: {e}");
            let text = if e.is_configuration() {
                DefaultBoardView::publishing_closed(self.settings.admin_contact.as_deref())
            } else {
                DefaultBoardView::publish_failed().to_string()
            };
            self.send(user, text, Markup::None).await?;
            return Ok(());
        }

        let draft = state
            .sessions
            .get(&user)
            .map(|session| session.draft().clone())
            .unwrap_or_default();
        if let Some(session) = state.sessions.get_mut(&user) {
            session.published();
        }
        state.limiter.set_limit(user, state.monitor.count());
        info!(
            "Published ad of user {user} ({} photos); next allowed at channel count {:?}.",
            draft.photos().len(),
            state.limiter.threshold(user)
        );

        // The ad is live from here on; reply failures must not skip the staff copy.
        if let Err(e) = self
            .send(
                user,
                DefaultBoardView::published(state.limiter.cooldown()),
                views::start_keyboard(),
            )
            .await
        {
            warn!("Failed to acknowledge publish to user {user}: {e}");
        }
        self.send_staff_copy(&from.handle(), user, &draft).await;
        Ok(())
    }

    async fn send_staff_copy(&self, handle: &str, user: i64, draft: &Draft) {
        let Some(group) = self.targets.staff_group else {
            debug!("No staff group configured; skipping copy of user {user}'s ad.");
            return;
        };
        let caption = draft.caption().unwrap_or_default();
        let mut header = StaffView::submission_header(handle, caption);
        if header.chars().count() > MAX_CAPTION_CHARS {
            header = StaffView::submission_header(handle, "");
        }
        if let Some(media) = draft.media_batch_with_caption(&header) {
            if let Err(e) = self.transport.send_media_group(group, media).await {
                error!("Failed to send staff copy of user {user}'s ad: {e}");
            }
        }
        if let Err(e) = self
            .transport
            .send_text(
                group,
                StaffView::submission_controls(handle, user, caption),
                views::moderation_keyboard(user),
            )
            .await
        {
            error!("Failed to send moderation controls for user {user}: {e}");
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Channel side
    // ─────────────────────────────────────────────────────────────────────────

    /// Registers a post in `chat_id`; only the configured channel counts.
    ///
    /// Returns the new counter value when the post was counted.
    pub async fn handle_channel_post(&self, chat_id: i64) -> Option<u64> {
        self.state.lock().await.monitor.observe(chat_id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Staff side
    // ─────────────────────────────────────────────────────────────────────────

    /// Handles an inline-button press in chat `chat_id` on message `message_id`.
    ///
    /// Presses outside the staff group and malformed payloads are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the reason prompt cannot be posted.
    pub async fn handle_staff_callback(
        &self,
        chat_id: i64,
        message_id: i32,
        data: &str,
    ) -> Result<(), BoardError> {
        if self.targets.staff_group != Some(chat_id) {
            debug!("Ignoring callback from chat {chat_id} outside the staff group");
            return Ok(());
        }
        let Some(action) = CallbackAction::parse(data) else {
            debug!("Ignoring malformed callback payload {data:?}");
            return Ok(());
        };

        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        match action {
            CallbackAction::Open(action, target) => {
                let handle = state.handle_of(target);
                let prompt_id = self
                    .transport
                    .send_text(
                        chat_id,
                        StaffView::reason_prompt(action, &handle),
                        views::cancel_keyboard(),
                    )
                    .await?;
                state
                    .pending
                    .insert(prompt_id, PendingAction { action, target });
                info!("Staff opened {action} for user {target} (prompt {prompt_id}).");
            }
            CallbackAction::Cancel => {
                self.cancel_pending(state, chat_id, message_id).await;
            }
        }
        Ok(())
    }

    async fn cancel_pending(&self, state: &mut BoardState, chat_id: i64, prompt_id: i32) {
        let Some(pending) = state.pending.take(prompt_id) else {
            debug!("No pending action behind prompt {prompt_id}");
            return;
        };
        info!(
            "Staff cancelled {} for user {}.",
            pending.action, pending.target
        );
        if let Err(e) = self
            .transport
            .edit_text(
                chat_id,
                prompt_id,
                StaffView::cancelled(pending.action).to_string(),
            )
            .await
        {
            warn!("Failed to edit cancelled prompt {prompt_id}: {e}");
        }
    }

    /// Handles a staff-group text replying to message `replied_to`.
    ///
    /// Replies to anything but a pending reason prompt are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be updated with the outcome.
    pub async fn handle_staff_reply(
        &self,
        chat_id: i64,
        replied_to: i32,
        text: &str,
    ) -> Result<(), BoardError> {
        if self.targets.staff_group != Some(chat_id) {
            return Ok(());
        }
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        if state.pending.get(replied_to).is_none() {
            debug!("Ignoring staff reply to message {replied_to}");
            return Ok(());
        }
        let reason = text.trim();
        if reason.eq_ignore_ascii_case(CANCEL_WORD) {
            self.cancel_pending(state, chat_id, replied_to).await;
            return Ok(());
        }
        if reason.is_empty() {
            return Ok(());
        }
        let Some(PendingAction { action, target }) = state.pending.take(replied_to) else {
            return Ok(());
        };

        let handle = state.handle_of(target);
        let max = state.warnings.max_warnings();
        let (staff_text, user_text) = match action {
            ModerationAction::Warn => match state.warnings.warn(target) {
                WarnOutcome::Warned(level) => (
                    StaffView::warned(&handle, level, max, reason),
                    Some(StaffView::warned_user(level, max, reason)),
                ),
                WarnOutcome::Blocked => (
                    StaffView::last_warning(&handle, max, reason),
                    Some(StaffView::last_warning_user(max, reason)),
                ),
                WarnOutcome::AlreadyBlocked => (StaffView::already_blocked(&handle), None),
            },
            ModerationAction::Block => {
                if state.warnings.block(target) {
                    (
                        StaffView::blocked(&handle, reason),
                        Some(StaffView::blocked_user(reason)),
                    )
                } else {
                    (StaffView::already_blocked(&handle), None)
                }
            }
        };
        info!(
            "Staff resolved {action} for user {target}; warnings now {}/{max}.",
            state.warnings.warnings(target)
        );

        if let Some(user_text) = user_text {
            if let Err(e) = self.transport.send_text(target, user_text, Markup::None).await {
                warn!("Failed to notify user {target} about {action}: {e}");
            }
        }
        self.transport
            .edit_text(chat_id, replied_to, staff_text)
            .await?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Introspection
    // ─────────────────────────────────────────────────────────────────────────

    /// Dialogue state of `user`.
    pub async fn dialogue_state(&self, user: i64) -> DialogueState {
        self.state
            .lock()
            .await
            .sessions
            .get(&user)
            .map_or(DialogueState::Idle, Session::state)
    }

    /// Copy of the draft of `user`, if a session exists.
    pub async fn draft(&self, user: i64) -> Option<Draft> {
        self.state
            .lock()
            .await
            .sessions
            .get(&user)
            .map(|session| session.draft().clone())
    }

    /// Rate-limit status of `user` at the current channel count.
    pub async fn rate_status(&self, user: i64) -> RateStatus {
        let state = self.state.lock().await;
        state.limiter.is_limited(user, state.monitor.count())
    }

    /// Stored rate-limit threshold of `user`.
    pub async fn rate_threshold(&self, user: i64) -> Option<u64> {
        self.state.lock().await.limiter.threshold(user)
    }

    /// Posts observed in the channel so far.
    pub async fn channel_count(&self) -> u64 {
        self.state.lock().await.monitor.count()
    }

    /// Warning count of `user`.
    pub async fn warnings(&self, user: i64) -> u8 {
        self.state.lock().await.warnings.warnings(user)
    }

    /// Whether `user` is blocked.
    pub async fn is_blocked(&self, user: i64) -> bool {
        self.state.lock().await.warnings.is_blocked(user)
    }

    /// Staff prompts still waiting for a reason.
    pub async fn pending_actions(&self) -> usize {
        self.state.lock().await.pending.len()
    }

    async fn send(
        &self,
        chat_id: i64,
        text: impl Into<String>,
        markup: Markup,
    ) -> Result<(), BoardError> {
        self.transport
            .send_text(chat_id, text.into(), markup)
            .await?;
        Ok(())
    }
}
