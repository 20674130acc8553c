/// Bot-side failure: Telegram transport/API trouble or a failed forward to
/// the catalog endpoint. Every variant is recovered at the single-update
/// boundary and turned into a reply (or silence); nothing propagates past
/// one webhook event.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// The Telegram Bot API answered but reported failure.
    #[error("Telegram API error: {0}")]
    Telegram(String),

    /// The HTTP call itself failed (connect, timeout, decode).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Forwarding a located product to the catalog failed or timed out.
    #[error("catalog forwarding failed: {0}")]
    Upstream(String),

    /// Writing the photo or a collection file failed.
    #[error(transparent)]
    Storage(#[from] vitrina_store::StoreError),
}
