#![deny(missing_docs)]
//! Adboard core library.
//!
//! Transport-agnostic logic of the classified-ad board: the submission
//! dialogue, channel-driven rate limiting, publishing and staff moderation.

/// Event-processing facade that owns all board state.
pub mod board;
/// Channel activity monitoring.
pub mod channel;
/// Configuration management.
pub mod config;
/// Submission dialogue state machine.
pub mod dialogue;
/// In-progress submissions.
pub mod draft;
/// Warnings, blocks and pending staff actions.
pub mod moderation;
/// Per-submitter publish cooldown.
pub mod rate_limit;
/// Outbound chat transport seam.
pub mod transport;
/// Texts and keyboards shown to submitters and staff.
pub mod views;

pub use board::{Board, BoardError, Submitter, SubmitterInput};
pub use config::BoardSettings;
pub use transport::{ChatTransport, Markup, MediaItem, TransportError};
