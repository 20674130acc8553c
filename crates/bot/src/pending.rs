//! Per-conversation submission state.
//!
//! The state is an explicit per-conversation enum in an owned table; no
//! phase is ever inferred from reply text. Entries expire after a TTL,
//! swept on access, so an abandoned submission cannot pin memory forever.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use vitrina_core::submission::{PendingSubmission, SubmissionKind};

/// Where a conversation stands in the two-phase flow. Absence from the
/// table is the idle state.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversationState {
    /// A kind was selected; the next JSON message stages the payload.
    AwaitingJson(SubmissionKind),
    /// A payload is staged; the next photo finalizes the record.
    AwaitingPhoto(PendingSubmission),
}

struct Slot {
    state: ConversationState,
    created_at: Instant,
}

/// Shared table of conversation states, safe for concurrent webhook events.
pub struct PendingTable {
    ttl: Option<Duration>,
    slots: Mutex<HashMap<i64, Slot>>,
}

impl PendingTable {
    /// `ttl: None` disables expiry.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Set or replace a conversation's state (last write wins).
    pub async fn set(&self, chat_id: i64, state: ConversationState) {
        let mut slots = self.slots.lock().await;
        self.sweep(&mut slots);
        slots.insert(
            chat_id,
            Slot {
                state,
                created_at: Instant::now(),
            },
        );
    }

    /// Current state of a conversation, if any.
    pub async fn get(&self, chat_id: i64) -> Option<ConversationState> {
        let mut slots = self.slots.lock().await;
        self.sweep(&mut slots);
        slots.get(&chat_id).map(|slot| slot.state.clone())
    }

    /// Remove and return the staged payload iff the conversation is in the
    /// awaiting-photo phase. An awaiting-JSON conversation is left alone so
    /// a stray photo does not cancel the open prompt.
    pub async fn take_awaiting_photo(&self, chat_id: i64) -> Option<PendingSubmission> {
        let mut slots = self.slots.lock().await;
        self.sweep(&mut slots);
        match slots.get(&chat_id) {
            Some(Slot {
                state: ConversationState::AwaitingPhoto(_),
                ..
            }) => match slots.remove(&chat_id) {
                Some(Slot {
                    state: ConversationState::AwaitingPhoto(pending),
                    ..
                }) => Some(pending),
                _ => None,
            },
            _ => None,
        }
    }

    /// Drop a conversation's state (abort path).
    pub async fn clear(&self, chat_id: i64) {
        let mut slots = self.slots.lock().await;
        slots.remove(&chat_id);
    }

    /// Number of live (unswept) conversations.
    pub async fn len(&self) -> usize {
        let mut slots = self.slots.lock().await;
        self.sweep(&mut slots);
        slots.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn sweep(&self, slots: &mut HashMap<i64, Slot>) {
        if let Some(ttl) = self.ttl {
            let now = Instant::now();
            slots.retain(|_, slot| now.duration_since(slot.created_at) < ttl);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
