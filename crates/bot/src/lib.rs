//! Chat-bot front end for the vitrina catalog.
//!
//! Implements the two-phase submission protocol over Telegram webhook
//! updates: a command opens a submission, a JSON message stages the payload,
//! and the next photo finalizes the record. Located products are forwarded
//! to the catalog HTTP endpoint (duplicate-detection gate); promotions and
//! new items are appended to their collections directly.

pub mod error;
pub mod gateway;
pub mod machine;
pub mod pending;
pub mod telegram;

pub use error::BotError;
pub use gateway::{CatalogGateway, ForwardOutcome, HttpCatalogGateway};
pub use machine::SubmissionMachine;
pub use pending::{ConversationState, PendingTable};
pub use telegram::{TelegramApi, TelegramClient, Update};
