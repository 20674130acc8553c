use std::sync::Arc;

use vitrina_bot::SubmissionMachine;
use vitrina_store::{ImageStore, JsonStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Flat-JSON collection store.
    pub store: Arc<JsonStore>,
    /// Uploaded submission photos.
    pub images: Arc<ImageStore>,
    /// The chat-bot submission machine; `None` when `BOT_TOKEN` is unset,
    /// in which case `/webhook` answers 403.
    pub bot: Option<Arc<SubmissionMachine>>,
}
