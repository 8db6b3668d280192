//! Board UI components
//!
//! Contains keyboards, text messages, and formatters for submitters and staff.
//! Texts are HTML; everything coming from users goes through [`escape`].

use crate::moderation::{CallbackAction, ModerationAction};
use crate::transport::{InlineButton, Markup};

// ─────────────────────────────────────────────────────────────────────────────
// Reply keyboard labels
// ─────────────────────────────────────────────────────────────────────────────

/// Starts a new submission.
pub const SUBMIT_BUTTON: &str = "📝 Submit an ad";
/// Ends photo collection.
pub const FINISH_PHOTOS_BUTTON: &str = "Finish sending photos ✅";
/// Publishes the draft.
pub const CONFIRM_BUTTON: &str = "Done ☑️";
/// Discards the draft and starts over.
pub const EDIT_BUTTON: &str = "Edit";

/// Staff reply text that cancels a pending moderation action.
pub const CANCEL_WORD: &str = "cancel";

// ─────────────────────────────────────────────────────────────────────────────
// Keyboards
// ─────────────────────────────────────────────────────────────────────────────

/// Keyboard shown after `/start`.
#[must_use]
pub fn start_keyboard() -> Markup {
    Markup::Reply(vec![vec![SUBMIT_BUTTON.to_string()]])
}

/// Keyboard shown while photos are being collected.
#[must_use]
pub fn finish_photos_keyboard() -> Markup {
    Markup::Reply(vec![vec![FINISH_PHOTOS_BUTTON.to_string()]])
}

/// Keyboard shown once the draft is complete.
#[must_use]
pub fn confirm_keyboard() -> Markup {
    Markup::Reply(vec![vec![
        CONFIRM_BUTTON.to_string(),
        EDIT_BUTTON.to_string(),
    ]])
}

/// Block / warn controls attached to a staff copy of a submission.
#[must_use]
pub fn moderation_keyboard(target: i64) -> Markup {
    Markup::Inline(vec![vec![
        InlineButton::callback(
            "Block",
            CallbackAction::Open(ModerationAction::Block, target).encode(),
        ),
        InlineButton::callback(
            "Warn",
            CallbackAction::Open(ModerationAction::Warn, target).encode(),
        ),
    ]])
}

/// Cancel control attached to a reason prompt.
#[must_use]
pub fn cancel_keyboard() -> Markup {
    Markup::Inline(vec![vec![InlineButton::callback(
        "Cancel",
        CallbackAction::Cancel.encode(),
    )]])
}

/// Escapes user-provided text for HTML messages.
#[must_use]
pub fn escape(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Trait definition
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for board UI view rendering
pub trait BoardView {
    /// Reply to `/start`.
    fn welcome() -> &'static str;
    /// Asks for the first photos.
    fn ask_photos() -> &'static str;
    /// Confirms a stored photo.
    fn photo_received(count: usize, max: usize) -> String;
    /// The draft is full.
    fn photo_limit(max: usize) -> String;
    /// Finish pressed with an empty draft.
    fn no_photos() -> &'static str;
    /// Asks for the caption.
    fn ask_caption() -> &'static str;
    /// Something other than text arrived while waiting for the caption.
    fn need_text() -> &'static str;
    /// Caption exceeds what a media caption may hold.
    fn caption_too_long(max: usize) -> String;
    /// Asks to confirm or edit.
    fn confirm_prompt() -> &'static str;
    /// Publish succeeded.
    fn published(cooldown: u64) -> String;
    /// Submitter must wait for more channel posts.
    fn rate_limited(remaining: u64) -> String;
    /// Publish failed because the channel is unreachable for the bot.
    fn publishing_closed(admin_contact: Option<&str>) -> String;
    /// Publish failed for any other reason.
    fn publish_failed() -> &'static str;
    /// The submitter is blocked.
    fn blocked_notice() -> &'static str;
    /// Reply to `/help`.
    fn help() -> &'static str;
}

/// Default (English) texts.
pub struct DefaultBoardView;

impl BoardView for DefaultBoardView {
    fn welcome() -> &'static str {
        "Hi! To submit an ad, press the button below 👇"
    }

    fn ask_photos() -> &'static str {
        "Send the photo(s) for your ad"
    }

    fn photo_received(count: usize, max: usize) -> String {
        format!("Photo received ({count}/{max}).\n\nAdd more photos or finish?")
    }

    fn photo_limit(max: usize) -> String {
        format!("You can attach at most {max} photos.")
    }

    fn no_photos() -> &'static str {
        "You have not sent any photos!"
    }

    fn ask_caption() -> &'static str {
        "Now send the text of your ad"
    }

    fn need_text() -> &'static str {
        "Please send text."
    }

    fn caption_too_long(max: usize) -> String {
        format!("The text is too long. Please keep it under {max} characters.")
    }

    fn confirm_prompt() -> &'static str {
        "Your ad is ready to be published. Are you sure?\n\nChoose an action below:"
    }

    fn published(cooldown: u64) -> String {
        format!(
            "Your ad is published!\n\nYou can submit the next one after {cooldown} posts in the channel."
        )
    }

    fn rate_limited(remaining: u64) -> String {
        format!(
            "You cannot submit an ad yet.\n\n<b>{remaining}</b> more posts have to appear in the channel."
        )
    }

    fn publishing_closed(admin_contact: Option<&str>) -> String {
        match admin_contact {
            Some(contact) => format!(
                "Posting is closed right now. Please contact the administrator: {}",
                escape(contact)
            ),
            None => "Posting is closed right now. Please contact the administrator.".to_string(),
        }
    }

    fn publish_failed() -> &'static str {
        "Failed to publish the ad, please try again later."
    }

    fn blocked_notice() -> &'static str {
        "⛔️ You are blocked and cannot use this bot."
    }

    fn help() -> &'static str {
        "Press «📝 Submit an ad», send up to 10 photos, then the text. \
         After you confirm, the ad is posted to the channel."
    }
}

/// Texts sent to the staff group and to moderated users.
pub struct StaffView;

impl StaffView {
    /// Plain-text caption of the staff copy media group.
    #[must_use]
    pub fn submission_header(handle: &str, caption: &str) -> String {
        if caption.is_empty() {
            format!("User {handle} submitted an ad.")
        } else {
            format!("User {handle} submitted an ad.\n\n{caption}")
        }
    }

    /// Message carrying the ad text and the moderation controls.
    #[must_use]
    pub fn submission_controls(handle: &str, target: i64, caption: &str) -> String {
        format!(
            "<b>Ad from {} (id {target}):</b>\n\n{}\n\nModeration:",
            escape(handle),
            escape(caption)
        )
    }

    /// Asks staff for the reason of an action.
    #[must_use]
    pub fn reason_prompt(action: ModerationAction, handle: &str) -> String {
        let what = match action {
            ModerationAction::Block => "blocking",
            ModerationAction::Warn => "warning",
        };
        format!(
            "Reply to this message with the reason for {what} {}.",
            escape(handle)
        )
    }

    /// Prompt text after cancellation.
    #[must_use]
    pub const fn cancelled(action: ModerationAction) -> &'static str {
        match action {
            ModerationAction::Block => "Block cancelled.",
            ModerationAction::Warn => "Warning cancelled.",
        }
    }

    /// Staff notice for a plain warning.
    #[must_use]
    pub fn warned(handle: &str, level: u8, max: u8, reason: &str) -> String {
        format!(
            "User {} received warning {level}/{max}. Reason: {}",
            escape(handle),
            escape(reason)
        )
    }

    /// Target notice for a plain warning.
    #[must_use]
    pub fn warned_user(level: u8, max: u8, reason: &str) -> String {
        format!(
            "You received warning {level}/{max}. Reason: {}. Please follow the rules.",
            escape(reason)
        )
    }

    /// Staff notice for the warning that turned into a block.
    #[must_use]
    pub fn last_warning(handle: &str, max: u8, reason: &str) -> String {
        format!(
            "User {} received warning {max}/{max} and is now blocked. Reason: {}",
            escape(handle),
            escape(reason)
        )
    }

    /// Target notice for the warning that turned into a block.
    #[must_use]
    pub fn last_warning_user(max: u8, reason: &str) -> String {
        format!(
            "You received warning {max}/{max}. Reason: {}. You are blocked.",
            escape(reason)
        )
    }

    /// Staff notice for a direct block.
    #[must_use]
    pub fn blocked(handle: &str, reason: &str) -> String {
        format!(
            "User {} is blocked. Reason: {}",
            escape(handle),
            escape(reason)
        )
    }

    /// Target notice for a direct block.
    #[must_use]
    pub fn blocked_user(reason: &str) -> String {
        format!(
            "You have been blocked by the administration and can no longer use this bot. Reason: {}",
            escape(reason)
        )
    }

    /// The target was blocked before the reason arrived.
    #[must_use]
    pub fn already_blocked(handle: &str) -> String {
        format!("User {} is already blocked.", escape(handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moderation_keyboard_carries_target() {
        let Markup::Inline(rows) = moderation_keyboard(12345) else {
            panic!("expected inline keyboard");
        };
        let payloads: Vec<&str> = rows[0].iter().map(|b| b.data.as_str()).collect();
        assert_eq!(payloads, vec!["mod:block:12345", "mod:warn:12345"]);
    }

    #[test]
    fn test_user_content_is_escaped() {
        let text = StaffView::warned("@bob", 1, 3, "<spam> & scam");
        assert!(text.contains("&lt;spam&gt; &amp; scam"));
    }

    #[test]
    fn test_publishing_closed_mentions_contact() {
        let text = DefaultBoardView::publishing_closed(Some("@admin"));
        assert!(text.contains("@admin"));
    }
}
