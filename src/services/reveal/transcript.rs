//! In-memory render surface that HTTP clients poll.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::models::Role;

use super::{RenderSurface, SlotHandle};

/// One bubble of the transcript
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptSlot {
    pub id: SlotHandle,
    pub role: Role,
    pub text: String,
    pub finalized: bool,
    pub opened_at: DateTime<Utc>,
    pub finalized_at: Option<DateTime<Utc>>,
}

/// Point-in-time copy of the transcript
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TranscriptSnapshot {
    /// Bumped on every mutation so pollers can skip unchanged frames
    pub revision: u64,
    pub slots: Vec<TranscriptSlot>,
}

#[derive(Debug, Default)]
struct TranscriptInner {
    slots: Vec<TranscriptSlot>,
    revision: u64,
    pending_scroll: bool,
    scrolls_issued: u64,
}

/// Chat transcript held in memory
#[derive(Debug, Default)]
pub struct Transcript {
    inner: RwLock<TranscriptInner>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> TranscriptSnapshot {
        let inner = self.inner.read().await;
        TranscriptSnapshot {
            revision: inner.revision,
            slots: inner.slots.clone(),
        }
    }

    /// Hands out a pending scroll command once; later calls return false
    pub async fn take_scroll_command(&self) -> bool {
        let mut inner = self.inner.write().await;
        std::mem::take(&mut inner.pending_scroll)
    }

    /// Total scroll commands ever issued to this transcript
    pub async fn scrolls_issued(&self) -> u64 {
        self.inner.read().await.scrolls_issued
    }

    /// Drops every slot, keeping the revision counter monotonic
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.slots.clear();
        inner.pending_scroll = false;
        inner.revision += 1;
    }
}

#[async_trait]
impl RenderSurface for Transcript {
    async fn open_slot(&self, role: Role) -> SlotHandle {
        let mut inner = self.inner.write().await;
        let id = SlotHandle(inner.slots.len());
        inner.slots.push(TranscriptSlot {
            id,
            role,
            text: String::new(),
            finalized: false,
            opened_at: Utc::now(),
            finalized_at: None,
        });
        inner.revision += 1;
        id
    }

    async fn update_slot(&self, slot: SlotHandle, text: &str) {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        match inner.slots.get_mut(slot.0) {
            Some(entry) if !entry.finalized => {
                entry.text.clear();
                entry.text.push_str(text);
                inner.revision += 1;
            }
            _ => tracing::debug!(slot = slot.0, "Ignoring update to closed or missing slot"),
        }
    }

    async fn finalize_slot(&self, slot: SlotHandle) {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        if let Some(entry) = inner.slots.get_mut(slot.0) {
            if !entry.finalized {
                entry.finalized = true;
                entry.finalized_at = Some(Utc::now());
                inner.revision += 1;
            }
        }
    }

    async fn scroll_into_view(&self) {
        let mut inner = self.inner.write().await;
        inner.pending_scroll = true;
        inner.scrolls_issued += 1;
        inner.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_slot_lifecycle() {
        let transcript = Transcript::new();
        let slot = transcript.open_slot(Role::Assistant).await;
        transcript.update_slot(slot, "*typing.*").await;
        transcript.update_slot(slot, "Hel").await;
        transcript.update_slot(slot, "Hello").await;
        transcript.finalize_slot(slot).await;
        transcript.update_slot(slot, "changed after finalize").await;

        let snapshot = transcript.snapshot().await;
        assert_eq!(snapshot.slots.len(), 1);
        assert_eq!(snapshot.slots[0].text, "Hello");
        assert!(snapshot.slots[0].finalized);
        assert!(snapshot.slots[0].finalized_at.is_some());
    }

    #[tokio::test]
    async fn test_scroll_command_is_taken_once() {
        let transcript = Transcript::new();
        assert!(!transcript.take_scroll_command().await);
        transcript.scroll_into_view().await;
        assert!(transcript.take_scroll_command().await);
        assert!(!transcript.take_scroll_command().await);
        assert_eq!(transcript.scrolls_issued().await, 1);
    }

    #[tokio::test]
    async fn test_clear_keeps_revision_monotonic() {
        let transcript = Transcript::new();
        let slot = transcript.open_slot(Role::User).await;
        transcript.update_slot(slot, "echo").await;
        let before = transcript.snapshot().await.revision;

        transcript.clear().await;
        let after = transcript.snapshot().await;
        assert!(after.slots.is_empty());
        assert!(after.revision > before);

        let slot = transcript.open_slot(Role::User).await;
        assert_eq!(slot, SlotHandle(0));
    }
}
