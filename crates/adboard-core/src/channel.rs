//! Channel activity monitor.
//!
//! Counts posts observed in the broadcast channel. The counter is the clock
//! that the rate limiter measures cooldowns against.

use tracing::{debug, info};

/// Global post counter for the monitored channel.
#[derive(Debug, Clone)]
pub struct ChannelMonitor {
    channel_id: i64,
    count: u64,
}

impl ChannelMonitor {
    /// Creates a monitor for `channel_id` starting at zero.
    #[must_use]
    pub const fn new(channel_id: i64) -> Self {
        Self {
            channel_id,
            count: 0,
        }
    }

    /// Identity of the monitored channel.
    #[must_use]
    pub const fn channel_id(&self) -> i64 {
        self.channel_id
    }

    /// Current number of observed channel posts.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Registers a post seen in `chat_id`.
    ///
    /// Returns the new counter value, or `None` when the post belongs to some
    /// other chat.
    pub fn observe(&mut self, chat_id: i64) -> Option<u64> {
        if chat_id != self.channel_id {
            debug!("Ignoring channel post from unmonitored chat {chat_id}");
            return None;
        }
        self.count = self.count.saturating_add(1);
        info!("Channel counter increased: {}", self.count);
        Some(self.count)
    }
}
