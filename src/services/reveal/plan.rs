//! A reveal compiled into a flat list of timed steps.

use std::{borrow::Cow, time::Duration};

use crate::{models::Role, services::script::Script};

use super::Pacing;

const INDICATOR_DOTS: [&str; 4] = ["", ".", "..", "..."];

/// One instruction of a reveal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStep {
    /// One-shot request to bring the transcript into view
    ScrollIntoView,
    /// Open a new slot; later writes go to it
    Open(Role),
    /// Show typing indicator frame `n` (cycles through 0–3 trailing dots)
    Indicator(usize),
    /// Show the prefix `texts[text][..end]`
    Show { text: usize, end: usize },
    /// Finalize the open slot
    Finalize,
    Pause(Duration),
}

/// Ordered steps plus the texts they reveal
#[derive(Debug, Clone, PartialEq)]
pub struct RevealPlan {
    texts: Vec<String>,
    indicator_label: String,
    steps: Vec<RevealStep>,
}

impl RevealPlan {
    /// Compiles `script` into steps.
    ///
    /// User messages appear at once. Assistant lines get the indicator phase,
    /// the character phase and the inter-message pause. Heading, cards and
    /// closing appear at once after the last line.
    pub fn build(script: &Script, pacing: &Pacing, indicator_label: &str, scroll: bool) -> Self {
        let mut plan = Self {
            texts: Vec::new(),
            indicator_label: indicator_label.to_string(),
            steps: Vec::new(),
        };

        if scroll {
            plan.steps.push(RevealStep::ScrollIntoView);
        }
        for message in &script.messages {
            match message.role {
                Role::User => plan.push_instant(Role::User, &message.text),
                Role::Assistant => plan.push_typed(&message.text, pacing),
            }
        }
        plan.push_instant(Role::Assistant, &script.heading);
        for recommendation in &script.recommendations {
            plan.push_instant(Role::Assistant, &recommendation.card_text());
        }
        plan.push_instant(Role::Assistant, &script.closing);
        plan
    }

    fn push_text(&mut self, text: &str) -> usize {
        self.texts.push(text.to_string());
        self.texts.len() - 1
    }

    fn push_pause(&mut self, delay: Duration) {
        if !delay.is_zero() {
            self.steps.push(RevealStep::Pause(delay));
        }
    }

    fn push_instant(&mut self, role: Role, text: &str) {
        let index = self.push_text(text);
        self.steps.push(RevealStep::Open(role));
        self.steps.push(RevealStep::Show {
            text: index,
            end: text.len(),
        });
        self.steps.push(RevealStep::Finalize);
    }

    fn push_typed(&mut self, text: &str, pacing: &Pacing) {
        let index = self.push_text(text);
        self.steps.push(RevealStep::Open(Role::Assistant));

        let frame_delay = pacing.indicator_frame_delay();
        for frame in 0..pacing.indicator_frames() as usize {
            self.steps.push(RevealStep::Indicator(frame % INDICATOR_DOTS.len()));
            self.push_pause(frame_delay);
        }

        if text.is_empty() {
            self.steps.push(RevealStep::Show { text: index, end: 0 });
        }
        for (offset, ch) in text.char_indices() {
            self.steps.push(RevealStep::Show {
                text: index,
                end: offset + ch.len_utf8(),
            });
            self.push_pause(pacing.char_reveal_delay);
        }

        self.steps.push(RevealStep::Finalize);
        self.push_pause(pacing.inter_message_pause);
    }

    pub fn steps(&self) -> &[RevealStep] {
        &self.steps
    }

    /// Text a step writes into the open slot, if it writes any
    pub fn render(&self, step: &RevealStep) -> Option<Cow<'_, str>> {
        match *step {
            RevealStep::Indicator(frame) => Some(Cow::Owned(format!(
                "*{}{}*",
                self.indicator_label,
                INDICATOR_DOTS[frame % INDICATOR_DOTS.len()]
            ))),
            RevealStep::Show { text, end } => self
                .texts
                .get(text)
                .and_then(|t| t.get(..end))
                .map(Cow::Borrowed),
            _ => None,
        }
    }

    /// Number of slots the plan opens
    pub fn slot_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, RevealStep::Open(_)))
            .count()
    }

    /// Sum of all pauses: the least wall-clock time the reveal can take
    pub fn min_duration(&self) -> Duration {
        self.steps
            .iter()
            .filter_map(|s| match s {
                RevealStep::Pause(d) => Some(*d),
                _ => None,
            })
            .sum()
    }
}
