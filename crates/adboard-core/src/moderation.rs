//! Staff moderation: warning records, blocks and pending actions.
//!
//! A staff member presses "Block" or "Warn" under a submission, the bot posts
//! a reason prompt and remembers `(action, target)` under the prompt's message
//! id. The reply to that prompt completes the action.

use std::collections::HashMap;
use std::fmt;

const CALLBACK_PREFIX: &str = "mod";

/// Kind of staff action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModerationAction {
    /// Increment the warning record.
    Warn,
    /// Block the user outright.
    Block,
}

impl ModerationAction {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Block => "block",
        }
    }
}

impl fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded inline-button payload of the moderation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    /// Open a reason prompt for `action` against the user id.
    Open(ModerationAction, i64),
    /// Cancel the pending action of the prompt the button belongs to.
    Cancel,
}

impl CallbackAction {
    /// Encodes the payload (`mod:warn:<id>`, `mod:block:<id>`, `mod:cancel`).
    #[must_use]
    pub fn encode(self) -> String {
        match self {
            Self::Open(action, target) => format!("{CALLBACK_PREFIX}:{action}:{target}"),
            Self::Cancel => format!("{CALLBACK_PREFIX}:cancel"),
        }
    }

    /// Parses a payload; malformed or foreign payloads yield `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use adboard_core::moderation::{CallbackAction, ModerationAction};
    ///
    /// assert_eq!(
    ///     CallbackAction::parse("mod:warn:42"),
    ///     Some(CallbackAction::Open(ModerationAction::Warn, 42))
    /// );
    /// assert_eq!(CallbackAction::parse("mod:warn:abc"), None);
    /// ```
    #[must_use]
    pub fn parse(data: &str) -> Option<Self> {
        let mut parts = data.split(':');
        if parts.next()? != CALLBACK_PREFIX {
            return None;
        }
        let action = match parts.next()? {
            "cancel" => {
                return parts.next().is_none().then_some(Self::Cancel);
            }
            "warn" => ModerationAction::Warn,
            "block" => ModerationAction::Block,
            _ => return None,
        };
        let target = parts.next()?.parse::<i64>().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self::Open(action, target))
    }
}

/// Result of issuing a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarnOutcome {
    /// Warning recorded; carries the new level.
    Warned(u8),
    /// This warning reached the maximum; the user is now blocked.
    Blocked,
    /// The user was already blocked; nothing changed.
    AlreadyBlocked,
}

/// Per-user warning counts.
///
/// A count equal to `max_warnings` means the user is blocked for the rest of
/// the process lifetime.
#[derive(Debug, Clone)]
pub struct WarningLedger {
    records: HashMap<i64, u8>,
    max_warnings: u8,
}

impl WarningLedger {
    /// Creates an empty ledger with the given block threshold.
    #[must_use]
    pub fn new(max_warnings: u8) -> Self {
        Self {
            records: HashMap::new(),
            max_warnings: max_warnings.max(1),
        }
    }

    /// Warning level at which users are blocked.
    #[must_use]
    pub const fn max_warnings(&self) -> u8 {
        self.max_warnings
    }

    /// Current warning count of `user`.
    #[must_use]
    pub fn warnings(&self, user: i64) -> u8 {
        self.records.get(&user).copied().unwrap_or(0)
    }

    /// Whether `user` is blocked.
    #[must_use]
    pub fn is_blocked(&self, user: i64) -> bool {
        self.warnings(user) >= self.max_warnings
    }

    /// Adds one warning, escalating to a block at the maximum.
    pub fn warn(&mut self, user: i64) -> WarnOutcome {
        if self.is_blocked(user) {
            return WarnOutcome::AlreadyBlocked;
        }
        let level = self.warnings(user) + 1;
        self.records.insert(user, level);
        if level >= self.max_warnings {
            WarnOutcome::Blocked
        } else {
            WarnOutcome::Warned(level)
        }
    }

    /// Blocks `user` directly. Returns `false` if they were already blocked.
    pub fn block(&mut self, user: i64) -> bool {
        if self.is_blocked(user) {
            return false;
        }
        self.records.insert(user, self.max_warnings);
        true
    }
}

/// A staff action waiting for its reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAction {
    /// What to do.
    pub action: ModerationAction,
    /// Who it targets.
    pub target: i64,
}

/// Pending actions keyed by the reason prompt's message id.
#[derive(Debug, Clone, Default)]
pub struct PendingActions {
    by_prompt: HashMap<i32, PendingAction>,
}

impl PendingActions {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembers `pending` under the prompt message id.
    pub fn insert(&mut self, prompt_id: i32, pending: PendingAction) {
        self.by_prompt.insert(prompt_id, pending);
    }

    /// Looks up the action behind a prompt without removing it.
    #[must_use]
    pub fn get(&self, prompt_id: i32) -> Option<PendingAction> {
        self.by_prompt.get(&prompt_id).copied()
    }

    /// Removes and returns the action behind a prompt.
    pub fn take(&mut self, prompt_id: i32) -> Option<PendingAction> {
        self.by_prompt.remove(&prompt_id)
    }

    /// Number of prompts still waiting for a reason.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_prompt.len()
    }

    /// Whether no prompt is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_prompt.is_empty()
    }
}
