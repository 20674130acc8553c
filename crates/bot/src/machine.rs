//! The two-phase submission state machine.
//!
//! Per conversation: `IDLE → AWAITING_JSON(kind) → AWAITING_PHOTO → IDLE`.
//! A command selects the submission kind, the next JSON message stages the
//! payload, and the next photo finalizes it. A validation failure in the
//! JSON phase aborts an open prompt; a photo with no staged payload is
//! silently ignored;
//! the staged entry is consumed on the photo phase whether it succeeds or
//! not, so the only retry path is restarting the flow.

use std::sync::Arc;
use std::time::Duration;

use vitrina_core::error::CoreError;
use vitrina_core::submission::{merge_image_url, parse_submission, PendingSubmission, SubmissionKind};
use vitrina_store::{Collection, ImageStore, JsonStore};

use crate::error::BotError;
use crate::gateway::{CatalogGateway, ForwardOutcome};
use crate::pending::{ConversationState, PendingTable};
use crate::telegram::{extension_for, PhotoSize, TelegramApi, Update};

// ---------------------------------------------------------------------------
// Reply texts
// ---------------------------------------------------------------------------

const USAGE: &str = "Commands:\n\
    /tovar — add a product (JSON first, then a photo)\n\
    /akcia — add a promotion\n\
    /new — add a new item\n\
    /example — payload example";

const EXAMPLE: &str = "{\n\
    \"category\": \"Напитки\",\n\
    \"brand\": \"Бодрость\",\n\
    \"name\": \"Лимонад\",\n\
    \"flavor\": \"Классический\",\n\
    \"city\": \"Архангельск\",\n\
    \"street\": \"Ленина, 1\",\n\
    \"price\": 150,\n\
    \"description\": \"Холодный и сладкий.\"\n\
}\n\
Do not include image_url — the photo supplies it.\n\
For /akcia and /new drop city and street.";

const JSON_ACCEPTED: &str = "JSON accepted. Now send the photo.";
const INVALID_JSON: &str = "Invalid JSON. Use /example";
const PRODUCT_ADDED: &str = "Product added!";
const PRODUCT_EXISTS: &str = "This product already exists.";
const PROMOTION_ADDED: &str = "Promotion added!";
const NEW_ITEM_ADDED: &str = "New item added!";
const SUBMISSION_FAILED: &str = "Submission failed. Please start again.";

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

/// Drives all conversations. One instance lives in the server state; the
/// webhook handler feeds it updates.
pub struct SubmissionMachine {
    telegram: Arc<dyn TelegramApi>,
    catalog: Arc<dyn CatalogGateway>,
    store: Arc<JsonStore>,
    images: Arc<ImageStore>,
    pending: PendingTable,
}

impl SubmissionMachine {
    pub fn new(
        telegram: Arc<dyn TelegramApi>,
        catalog: Arc<dyn CatalogGateway>,
        store: Arc<JsonStore>,
        images: Arc<ImageStore>,
        pending_ttl: Option<Duration>,
    ) -> Self {
        Self {
            telegram,
            catalog,
            store,
            images,
            pending: PendingTable::new(pending_ttl),
        }
    }

    /// Entry point for one webhook update. Never fails the webhook request:
    /// everything is handled (or logged) here.
    pub async fn handle_update(&self, update: Update) {
        let Some(message) = update.message else {
            return;
        };
        let chat_id = message.chat.id;

        let result = if let Some(photo) = message.photo.as_deref() {
            self.handle_photo(chat_id, photo).await
        } else if let Some(text) = message.text.as_deref() {
            self.handle_text(chat_id, text).await
        } else {
            Ok(())
        };

        if let Err(error) = result {
            tracing::warn!(chat_id, %error, "Failed to handle bot update");
        }
    }

    async fn handle_text(&self, chat_id: i64, text: &str) -> Result<(), BotError> {
        let text = text.trim();
        if text.starts_with('/') {
            self.handle_command(chat_id, text).await
        } else {
            self.handle_json_phase(chat_id, text).await
        }
    }

    async fn handle_command(&self, chat_id: i64, text: &str) -> Result<(), BotError> {
        match text.split_whitespace().next().unwrap_or_default() {
            "/start" | "/help" => self.telegram.send_message(chat_id, USAGE).await,
            "/example" => self.telegram.send_message(chat_id, EXAMPLE).await,
            "/tovar" => self.begin(chat_id, SubmissionKind::Located).await,
            "/akcia" => self.begin(chat_id, SubmissionKind::Promotion).await,
            "/new" => self.begin(chat_id, SubmissionKind::New).await,
            _ => Ok(()),
        }
    }

    /// `request(kind)`: open the awaiting-JSON phase and list the required
    /// fields.
    async fn begin(&self, chat_id: i64, kind: SubmissionKind) -> Result<(), BotError> {
        self.pending
            .set(chat_id, ConversationState::AwaitingJson(kind))
            .await;

        let label = match kind {
            SubmissionKind::Located => "product",
            SubmissionKind::Promotion => "promotion",
            SubmissionKind::New => "new item",
        };
        let prompt = format!(
            "Send the {label} JSON (WITHOUT image_url).\nFields: {}",
            kind.required_fields().join(", "),
        );
        self.telegram.send_message(chat_id, &prompt).await
    }

    /// `submit_json`: stage a validated payload for the conversation.
    ///
    /// With an already-staged payload, a further valid JSON overwrites it
    /// (last write wins, no warning); an invalid one leaves it in place.
    /// Free text from an idle conversation is ignored.
    async fn handle_json_phase(&self, chat_id: i64, text: &str) -> Result<(), BotError> {
        let kind = match self.pending.get(chat_id).await {
            Some(ConversationState::AwaitingJson(kind)) => kind,
            Some(ConversationState::AwaitingPhoto(previous)) => previous.kind,
            None => return Ok(()),
        };

        match parse_submission(kind, text) {
            Ok(pending) => {
                self.pending
                    .set(chat_id, ConversationState::AwaitingPhoto(pending))
                    .await;
                self.telegram.send_message(chat_id, JSON_ACCEPTED).await
            }
            Err(error) => {
                // A parse/validation failure aborts an open prompt; an
                // already-staged payload from a previous valid JSON stays.
                if matches!(
                    self.pending.get(chat_id).await,
                    Some(ConversationState::AwaitingJson(_))
                ) {
                    self.pending.clear(chat_id).await;
                }
                let reply = match &error {
                    CoreError::Parse(_) => INVALID_JSON.to_string(),
                    other => other.to_string(),
                };
                self.telegram.send_message(chat_id, &reply).await
            }
        }
    }

    /// `submit_photo`: finalize the staged submission.
    ///
    /// No staged payload means no-op (no reply). The staged entry is
    /// consumed before any fallible work, so failure still clears it.
    async fn handle_photo(&self, chat_id: i64, photos: &[PhotoSize]) -> Result<(), BotError> {
        let Some(pending) = self.pending.take_awaiting_photo(chat_id).await else {
            return Ok(());
        };

        match self.finalize(chat_id, pending, photos).await {
            Ok(reply) => self.telegram.send_message(chat_id, reply).await,
            Err(error) => {
                tracing::warn!(chat_id, %error, "Submission finalization failed");
                self.telegram.send_message(chat_id, SUBMISSION_FAILED).await
            }
        }
    }

    async fn finalize(
        &self,
        chat_id: i64,
        pending: PendingSubmission,
        photos: &[PhotoSize],
    ) -> Result<&'static str, BotError> {
        let file_id = photos
            .last()
            .map(|p| p.file_id.as_str())
            .ok_or_else(|| BotError::Telegram("photo message with no sizes".into()))?;

        let file_path = self.telegram.get_file_path(file_id).await?;
        let bytes = self.telegram.download_file(&file_path).await?;
        let filename = self.images.save(&bytes, &extension_for(&file_path)).await?;
        tracing::info!(chat_id, %filename, "Submission photo stored");

        let mut payload = pending.payload;
        merge_image_url(&mut payload, &format!("/images/{filename}"));

        match pending.kind {
            SubmissionKind::Located => match self.catalog.add_product(&payload).await? {
                ForwardOutcome::Created { id } => {
                    tracing::info!(chat_id, %id, "Located product forwarded to catalog");
                    Ok(PRODUCT_ADDED)
                }
                ForwardOutcome::Duplicate => Ok(PRODUCT_EXISTS),
            },
            SubmissionKind::Promotion => {
                self.store.append(Collection::Promotions, payload).await?;
                tracing::info!(chat_id, "Promotion stored");
                Ok(PROMOTION_ADDED)
            }
            SubmissionKind::New => {
                self.store.append(Collection::NewItems, payload).await?;
                tracing::info!(chat_id, "New item stored");
                Ok(NEW_ITEM_ADDED)
            }
        }
    }

    /// Live staged conversations (for introspection/tests).
    pub async fn pending_count(&self) -> usize {
        self.pending.len().await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
