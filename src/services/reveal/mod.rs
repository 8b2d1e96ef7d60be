//! Reveal Engine: paces a script into a transcript, one message at a time.

pub mod engine;
pub mod pacing;
pub mod plan;
pub mod surface;
pub mod transcript;

pub use engine::RevealEngine;
pub use pacing::{Pacing, PacingError};
pub use plan::{RevealPlan, RevealStep};
#[cfg(test)]
pub use surface::MockRenderSurface;
pub use surface::{RenderSurface, SlotHandle};
pub use transcript::{Transcript, TranscriptSlot, TranscriptSnapshot};
