use async_trait::async_trait;
use serde::Serialize;

use crate::models::Role;

/// Addresses one transcript slot on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SlotHandle(pub usize);

/// Where a reveal is drawn.
///
/// A slot is opened per message, overwritten while the message is revealed,
/// then finalized. Surfaces cannot fail; a surface that loses its display
/// simply drops the writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RenderSurface: Send + Sync {
    /// Appends an empty bubble for `role`
    async fn open_slot(&self, role: Role) -> SlotHandle;

    /// Replaces the whole text of an open slot
    async fn update_slot(&self, slot: SlotHandle, text: &str);

    /// Marks a slot as complete; it receives no further updates
    async fn finalize_slot(&self, slot: SlotHandle);

    /// Brings the transcript into the user's view
    async fn scroll_into_view(&self);
}
