//! Publish cooldown measured in channel posts.
//!
//! After a successful publish a submitter has to wait until the channel has
//! seen `cooldown` more posts before the next submission is accepted.

use std::collections::HashMap;

/// Result of a rate-limit lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateStatus {
    /// The submitter may start a new submission.
    Open,
    /// The submitter has to wait for more channel posts.
    Limited {
        /// Channel posts still missing before the limit lifts.
        remaining: u64,
    },
}

impl RateStatus {
    /// Returns `true` if the submitter is currently limited.
    #[must_use]
    pub const fn is_limited(self) -> bool {
        matches!(self, Self::Limited { .. })
    }
}

/// Maps submitters to the channel counter value they have to wait for.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    thresholds: HashMap<i64, u64>,
    cooldown: u64,
}

impl RateLimiter {
    /// Creates a limiter with the given cooldown in channel posts.
    #[must_use]
    pub fn new(cooldown: u64) -> Self {
        Self {
            thresholds: HashMap::new(),
            cooldown,
        }
    }

    /// Number of channel posts a submitter waits after publishing.
    #[must_use]
    pub const fn cooldown(&self) -> u64 {
        self.cooldown
    }

    /// Checks whether `submitter` is still limited at channel count `counter`.
    ///
    /// # Examples
    ///
    /// ```
    /// use adboard_core::rate_limit::{RateLimiter, RateStatus};
    ///
    /// let mut limiter = RateLimiter::new(3);
    /// assert_eq!(limiter.is_limited(42, 10), RateStatus::Open);
    ///
    /// limiter.set_limit(42, 10);
    /// assert_eq!(limiter.is_limited(42, 11), RateStatus::Limited { remaining: 2 });
    /// assert_eq!(limiter.is_limited(42, 13), RateStatus::Open);
    /// ```
    #[must_use]
    pub fn is_limited(&self, submitter: i64, counter: u64) -> RateStatus {
        match self.thresholds.get(&submitter) {
            Some(&threshold) if counter < threshold => RateStatus::Limited {
                remaining: threshold - counter,
            },
            _ => RateStatus::Open,
        }
    }

    /// Records a publish at channel count `counter`.
    ///
    /// Overwrites any previous threshold for the submitter.
    pub fn set_limit(&mut self, submitter: i64, counter: u64) {
        let threshold = counter.saturating_add(self.cooldown);
        self.thresholds.insert(submitter, threshold);
    }

    /// Threshold stored for `submitter`, if any.
    #[must_use]
    pub fn threshold(&self, submitter: i64) -> Option<u64> {
        self.thresholds.get(&submitter).copied()
    }
}
