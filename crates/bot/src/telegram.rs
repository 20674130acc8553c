//! Minimal Telegram Bot API surface: inbound update types and an outbound
//! client for the handful of methods the bot needs.
//!
//! The transport sits behind [`TelegramApi`] so the state machine can be
//! exercised in tests with a recording fake.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::BotError;

// ---------------------------------------------------------------------------
// Inbound update types (webhook payload)
// ---------------------------------------------------------------------------

/// A webhook update. Only message updates are relevant; everything else
/// deserializes with `message: None` and is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    /// Telegram sends photo sizes smallest-first; the last entry is the
    /// original resolution.
    #[serde(default)]
    pub photo: Option<Vec<PhotoSize>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
}

// ---------------------------------------------------------------------------
// Outbound API trait
// ---------------------------------------------------------------------------

/// The outbound Telegram operations the submission machine needs.
#[async_trait]
pub trait TelegramApi: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), BotError>;

    /// Resolve a `file_id` to a downloadable file path.
    async fn get_file_path(&self, file_id: &str) -> Result<String, BotError>;

    async fn download_file(&self, file_path: &str) -> Result<Vec<u8>, BotError>;

    async fn set_webhook(&self, url: &str) -> Result<(), BotError>;

    async fn delete_webhook(&self) -> Result<(), BotError>;
}

// ---------------------------------------------------------------------------
// reqwest client
// ---------------------------------------------------------------------------

/// Wire envelope every Bot API method returns.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::Deserialize<'de>"))]
struct ApiEnvelope<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileInfo {
    #[serde(default)]
    file_path: Option<String>,
}

/// Production [`TelegramApi`] implementation over HTTPS.
pub struct TelegramClient {
    http: reqwest::Client,
    token: String,
}

/// Bound on every Telegram API call.
const TELEGRAM_TIMEOUT: Duration = Duration::from_secs(10);

impl TelegramClient {
    pub fn new(token: String) -> Result<Self, BotError> {
        let http = reqwest::Client::builder()
            .timeout(TELEGRAM_TIMEOUT)
            .build()?;
        Ok(Self { http, token })
    }

    fn method_url(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{method}", self.token)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("https://api.telegram.org/file/bot{}/{file_path}", self.token)
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> Result<Option<T>, BotError> {
        let envelope: ApiEnvelope<T> = self
            .http
            .post(self.method_url(method))
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if !envelope.ok {
            return Err(BotError::Telegram(
                envelope
                    .description
                    .unwrap_or_else(|| format!("{method} failed")),
            ));
        }
        Ok(envelope.result)
    }
}

#[async_trait]
impl TelegramApi for TelegramClient {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), BotError> {
        self.call::<serde_json::Value>("sendMessage", json!({"chat_id": chat_id, "text": text}))
            .await?;
        Ok(())
    }

    async fn get_file_path(&self, file_id: &str) -> Result<String, BotError> {
        let info: Option<FileInfo> = self.call("getFile", json!({"file_id": file_id})).await?;
        info.and_then(|f| f.file_path)
            .ok_or_else(|| BotError::Telegram("getFile returned no file_path".into()))
    }

    async fn download_file(&self, file_path: &str) -> Result<Vec<u8>, BotError> {
        let response = self
            .http
            .get(self.file_url(file_path))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn set_webhook(&self, url: &str) -> Result<(), BotError> {
        self.call::<serde_json::Value>("setWebhook", json!({"url": url}))
            .await?;
        Ok(())
    }

    async fn delete_webhook(&self) -> Result<(), BotError> {
        self.call::<serde_json::Value>("deleteWebhook", json!({})).await?;
        Ok(())
    }
}

/// File extension for a Telegram file path: last dot segment, lower-cased,
/// alphanumeric only. Falls back to `jpg`.
pub fn extension_for(file_path: &str) -> String {
    let candidate = file_path.rsplit('.').next().unwrap_or_default();
    if !candidate.is_empty()
        && candidate.len() <= 5
        && candidate.chars().all(|c| c.is_ascii_alphanumeric())
        && candidate != file_path
    {
        candidate.to_ascii_lowercase()
    } else {
        "jpg".to_string()
    }
}
