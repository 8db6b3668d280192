/// Update handlers: commands, submitter input and staff actions
pub mod handlers;
/// Resilient messaging with automatic retry for Telegram API operations
pub mod resilient;
/// `ChatTransport` implementation backed by teloxide
pub mod transport;

pub use transport::TelegramTransport;
