//! Submission dialogue state machine.
//!
//! Each submitter has a [`Session`]: an explicit [`DialogueState`] plus the
//! [`Draft`] being built. [`Session::apply`] is the transition table; it only
//! touches the session and reports what happened as a [`Step`]. Side effects
//! (messages, publishing, rate limiting) belong to the board.

use crate::draft::{Draft, PhotoAdd};
use crate::transport::MediaItem;
use crate::views::{CONFIRM_BUTTON, EDIT_BUTTON, FINISH_PHOTOS_BUTTON, SUBMIT_BUTTON};
use serde::{Deserialize, Serialize};

/// Telegram caps media captions at 1024 characters.
pub const MAX_CAPTION_CHARS: usize = 1024;

/// Where a submitter is in the dialogue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogueState {
    /// No submission in progress.
    #[default]
    Idle,
    /// Waiting for photos or the finish button.
    CollectingPhotos,
    /// Waiting for the caption text.
    AwaitingCaption,
    /// Waiting for confirm or edit.
    AwaitingConfirmation,
}

/// Input from a submitter, already classified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogueEvent {
    /// `/start` command.
    Start,
    /// The submit button.
    SubmitPressed,
    /// A photo, as its largest-size reference.
    Photo(String),
    /// The finish-photos button.
    FinishPhotos,
    /// Free text.
    Text(String),
    /// Anything that is neither text nor photo.
    NonText,
    /// The confirm button.
    Confirm,
    /// The edit button.
    Edit,
}

/// What a transition did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Draft reset after `/start`.
    Welcomed,
    /// Draft reset after the submit button; photos requested.
    AskedPhotos,
    /// Photo stored; carries the new count.
    PhotoAdded(usize),
    /// Photo refused because the draft is full.
    PhotoRejected,
    /// Finish pressed without photos.
    NoPhotos,
    /// Photo collection done; caption requested.
    AskedCaption,
    /// Waiting for text, got something else.
    NeedText,
    /// Caption longer than a media caption allows.
    CaptionTooLong,
    /// Caption stored; confirmation requested.
    AwaitingConfirmation,
    /// Ready to publish this batch. The session stays in
    /// `AwaitingConfirmation` until [`Session::published`] is called.
    Publish(Vec<MediaItem>),
    /// Draft discarded; back to photo collection.
    Restarted,
    /// Event does not apply in the current state.
    Ignored,
}

impl DialogueEvent {
    /// Classifies a text message for a session in `state`.
    ///
    /// While a caption is expected every text is the caption, button labels
    /// included. Elsewhere the reply-keyboard labels become their events.
    #[must_use]
    pub fn from_text(state: DialogueState, text: &str) -> Self {
        if state == DialogueState::AwaitingCaption {
            return Self::Text(text.to_string());
        }
        match text {
            SUBMIT_BUTTON => Self::SubmitPressed,
            FINISH_PHOTOS_BUTTON => Self::FinishPhotos,
            CONFIRM_BUTTON => Self::Confirm,
            EDIT_BUTTON => Self::Edit,
            _ => Self::Text(text.to_string()),
        }
    }
}

/// Dialogue state and draft of one submitter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    state: DialogueState,
    draft: Draft,
}

impl Session {
    /// Creates an idle session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> DialogueState {
        self.state
    }

    /// Current draft.
    #[must_use]
    pub const fn draft(&self) -> &Draft {
        &self.draft
    }

    fn restart(&mut self) {
        self.draft = Draft::new();
        self.state = DialogueState::CollectingPhotos;
    }

    /// Applies one event. `max_photos` is the draft cap.
    pub fn apply(&mut self, event: DialogueEvent, max_photos: usize) -> Step {
        use DialogueEvent as E;
        use DialogueState as S;

        match (self.state, event) {
            (_, E::Start) => {
                self.restart();
                Step::Welcomed
            }
            (_, E::SubmitPressed) => {
                self.restart();
                Step::AskedPhotos
            }
            (S::CollectingPhotos, E::Photo(photo)) => {
                match self.draft.add_photo(photo, max_photos) {
                    PhotoAdd::Added(count) => Step::PhotoAdded(count),
                    PhotoAdd::Full => Step::PhotoRejected,
                }
            }
            (S::CollectingPhotos, E::FinishPhotos) => {
                if self.draft.is_empty() {
                    Step::NoPhotos
                } else {
                    self.state = S::AwaitingCaption;
                    Step::AskedCaption
                }
            }
            (S::AwaitingCaption, E::Text(text)) => self.caption_step(text),
            (S::AwaitingCaption, E::Photo(_) | E::NonText) => Step::NeedText,
            (S::AwaitingConfirmation, E::Confirm) => match self.draft.media_batch() {
                Some(batch) => Step::Publish(batch),
                None => Step::Ignored,
            },
            (S::AwaitingConfirmation, E::Edit) => {
                self.restart();
                Step::Restarted
            }
            _ => Step::Ignored,
        }
    }

    fn caption_step(&mut self, text: String) -> Step {
        if text.chars().count() > MAX_CAPTION_CHARS {
            return Step::CaptionTooLong;
        }
        self.draft.set_caption(text);
        self.state = DialogueState::AwaitingConfirmation;
        Step::AwaitingConfirmation
    }

    /// Marks the pending publish as done: clears the draft and goes idle.
    pub fn published(&mut self) {
        self.draft = Draft::new();
        self.state = DialogueState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(id: &str) -> DialogueEvent {
        DialogueEvent::Photo(id.to_string())
    }

    fn text(t: &str) -> DialogueEvent {
        DialogueEvent::Text(t.to_string())
    }

    #[test]
    fn test_happy_path() {
        let mut session = Session::new();
        assert_eq!(session.apply(DialogueEvent::SubmitPressed, 10), Step::AskedPhotos);
        assert_eq!(session.apply(photo("a"), 10), Step::PhotoAdded(1));
        assert_eq!(session.apply(photo("b"), 10), Step::PhotoAdded(2));
        assert_eq!(session.apply(DialogueEvent::FinishPhotos, 10), Step::AskedCaption);
        assert_eq!(session.state(), DialogueState::AwaitingCaption);
        assert_eq!(session.apply(text("Selling bike"), 10), Step::AwaitingConfirmation);

        let Step::Publish(batch) = session.apply(DialogueEvent::Confirm, 10) else {
            panic!("expected publish step");
        };
        assert_eq!(batch.len(), 2);
        assert_eq!(session.state(), DialogueState::AwaitingConfirmation);

        session.published();
        assert_eq!(session.state(), DialogueState::Idle);
        assert!(session.draft().is_empty());
    }

    #[test]
    fn test_idle_ignores_stray_events() {
        let mut session = Session::new();
        for event in [
            photo("a"),
            DialogueEvent::FinishPhotos,
            text("hello"),
            DialogueEvent::Confirm,
            DialogueEvent::Edit,
            DialogueEvent::NonText,
        ] {
            assert_eq!(session.apply(event, 10), Step::Ignored);
        }
        assert_eq!(session, Session::new());
    }

    #[test]
    fn test_finish_without_photos_stays() {
        let mut session = Session::new();
        session.apply(DialogueEvent::Start, 10);
        assert_eq!(session.apply(DialogueEvent::FinishPhotos, 10), Step::NoPhotos);
        assert_eq!(session.state(), DialogueState::CollectingPhotos);
    }

    #[test]
    fn test_cap_rejects_extra_photo() {
        let mut session = Session::new();
        session.apply(DialogueEvent::Start, 2);
        session.apply(photo("a"), 2);
        session.apply(photo("b"), 2);
        assert_eq!(session.apply(photo("c"), 2), Step::PhotoRejected);
        assert_eq!(session.draft().photos(), ["a", "b"]);
    }

    #[test]
    fn test_caption_rearms_on_non_text() {
        let mut session = Session::new();
        session.apply(DialogueEvent::Start, 10);
        session.apply(photo("a"), 10);
        session.apply(DialogueEvent::FinishPhotos, 10);

        assert_eq!(session.apply(photo("b"), 10), Step::NeedText);
        assert_eq!(session.apply(DialogueEvent::NonText, 10), Step::NeedText);
        assert_eq!(session.state(), DialogueState::AwaitingCaption);
        assert_eq!(session.draft().photos(), ["a"]);

        assert_eq!(session.apply(text("ok"), 10), Step::AwaitingConfirmation);
    }

    #[test]
    fn test_caption_too_long_is_rejected() {
        let mut session = Session::new();
        session.apply(DialogueEvent::Start, 10);
        session.apply(photo("a"), 10);
        session.apply(DialogueEvent::FinishPhotos, 10);

        let long = "x".repeat(MAX_CAPTION_CHARS + 1);
        assert_eq!(session.apply(text(&long), 10), Step::CaptionTooLong);
        assert_eq!(session.state(), DialogueState::AwaitingCaption);
    }

    #[test]
    fn test_edit_discards_draft() {
        let mut session = Session::new();
        session.apply(DialogueEvent::Start, 10);
        session.apply(photo("a"), 10);
        session.apply(DialogueEvent::FinishPhotos, 10);
        session.apply(text("caption"), 10);

        assert_eq!(session.apply(DialogueEvent::Edit, 10), Step::Restarted);
        assert_eq!(session.state(), DialogueState::CollectingPhotos);
        assert!(session.draft().is_empty());
        assert_eq!(session.draft().caption(), None);
    }

    #[test]
    fn test_button_labels_are_captions_while_awaiting_caption() {
        assert_eq!(
            DialogueEvent::from_text(DialogueState::AwaitingCaption, CONFIRM_BUTTON),
            text(CONFIRM_BUTTON)
        );
        assert_eq!(
            DialogueEvent::from_text(DialogueState::AwaitingConfirmation, CONFIRM_BUTTON),
            DialogueEvent::Confirm
        );
        assert_eq!(
            DialogueEvent::from_text(DialogueState::Idle, SUBMIT_BUTTON),
            DialogueEvent::SubmitPressed
        );
    }
}
