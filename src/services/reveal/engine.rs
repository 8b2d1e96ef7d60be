use crate::services::script::Script;

use super::{Pacing, RenderSurface, RevealPlan, RevealStep};

/// Plays reveal plans against a render surface on the tokio timer.
///
/// Steps run strictly in order and every pause is awaited before the next
/// step, so a message never starts before the previous one is finalized.
#[derive(Debug, Clone)]
pub struct RevealEngine {
    pacing: Pacing,
    indicator_label: String,
}

impl RevealEngine {
    pub fn new(pacing: Pacing, assistant_name: &str) -> Self {
        Self {
            pacing,
            indicator_label: format!("{assistant_name} is typing"),
        }
    }

    /// Compiles `script`; `scroll` adds the one-shot scroll request up front
    pub fn plan(&self, script: &Script, scroll: bool) -> RevealPlan {
        RevealPlan::build(script, &self.pacing, &self.indicator_label, scroll)
    }

    /// Runs every step of `plan`. Returns the number of finalized slots.
    pub async fn play<S>(&self, plan: &RevealPlan, surface: &S) -> usize
    where
        S: RenderSurface + ?Sized,
    {
        let mut open = None;
        let mut finalized = 0;

        for step in plan.steps() {
            match step {
                RevealStep::ScrollIntoView => surface.scroll_into_view().await,
                RevealStep::Open(role) => {
                    let slot = surface.open_slot(*role).await;
                    tracing::debug!(slot = slot.0, role = ?role, "Opened transcript slot");
                    open = Some(slot);
                }
                RevealStep::Indicator(_) | RevealStep::Show { .. } => {
                    if let (Some(slot), Some(text)) = (open, plan.render(step)) {
                        surface.update_slot(slot, &text).await;
                    }
                }
                RevealStep::Finalize => {
                    if let Some(slot) = open.take() {
                        surface.finalize_slot(slot).await;
                        finalized += 1;
                    }
                }
                RevealStep::Pause(delay) => tokio::time::sleep(*delay).await,
            }
        }

        finalized
    }
}
