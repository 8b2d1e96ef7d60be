//! Per-user session state and its transitions.
//!
//! `Idle → Configuring → Revealing → Complete`, plus the Invalidated edge back
//! to `Configuring` whenever the live draft stops matching the accepted one.
//! This is the single source of truth for whether a submission already has
//! recommendations, so repeated renders never regenerate them.

use serde::Serialize;
use uuid::Uuid;

use crate::{
    models::{PreferenceQuery, QueryDraft, QueryError, QuerySignature, Recommendation},
    services::script::Script,
};

/// Oldest notices are dropped beyond this many
const MAX_NOTICES: usize = 16;

const INVALIDATED_NOTICE: &str =
    "Your preferences changed, so the previous recommendations were cleared. \
     Generate again to get new ones.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    Configuring,
    Revealing,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// Message for the form layer's feedback area
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Result of an accepted submit
#[derive(Debug)]
pub enum SubmitOutcome {
    /// A new submission; its script still has to be revealed
    Started { submission_id: Uuid, script: Script },
    /// Same signature as the active submission; nothing was touched
    Unchanged { submission_id: Uuid },
}

/// Serializable copy of the session for clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub phase: SessionPhase,
    pub has_auto_scrolled: bool,
    pub submission_id: Option<Uuid>,
    pub signature: Option<QuerySignature>,
    pub active_query: Option<PreferenceQuery>,
    pub recommendations: Vec<Recommendation>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Default)]
pub struct RevealSession {
    phase: SessionPhase,
    has_auto_scrolled: bool,
    active_query: Option<PreferenceQuery>,
    active_recommendations: Vec<Recommendation>,
    last_accepted_signature: Option<QuerySignature>,
    submission_id: Option<Uuid>,
    notices: Vec<Notice>,
}

impl RevealSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn has_auto_scrolled(&self) -> bool {
        self.has_auto_scrolled
    }

    pub fn active_query(&self) -> Option<&PreferenceQuery> {
        self.active_query.as_ref()
    }

    pub fn active_recommendations(&self) -> &[Recommendation] {
        &self.active_recommendations
    }

    pub fn last_accepted_signature(&self) -> Option<&QuerySignature> {
        self.last_accepted_signature.as_ref()
    }

    pub fn submission_id(&self) -> Option<Uuid> {
        self.submission_id
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            phase: self.phase,
            has_auto_scrolled: self.has_auto_scrolled,
            submission_id: self.submission_id,
            signature: self.last_accepted_signature.clone(),
            active_query: self.active_query.clone(),
            recommendations: self.active_recommendations.clone(),
            notices: self.notices.clone(),
        }
    }

    /// A render of the page. Only the very first one changes anything.
    pub fn render(&mut self) {
        if self.phase == SessionPhase::Idle {
            self.phase = SessionPhase::Configuring;
        }
    }

    /// Feedback for a rejected draft
    pub fn report_validation_failure(&mut self, reason: &QueryError) {
        tracing::warn!(reason = %reason, "Rejected preference submission");
        self.push_notice(NoticeLevel::Warning, reason.to_string());
    }

    /// Handles the generate action.
    ///
    /// An invalid draft is reported and leaves the session as it was. A draft
    /// matching the active submission is a no-op. Anything else clears the old
    /// recommendations first, then calls `build` for the new script.
    pub fn submit<F>(&mut self, draft: &QueryDraft, build: F) -> Result<SubmitOutcome, QueryError>
    where
        F: FnOnce(&PreferenceQuery) -> Result<Script, QueryError>,
    {
        self.render();

        let query = match PreferenceQuery::try_from(draft) {
            Ok(query) => query,
            Err(e) => {
                self.report_validation_failure(&e);
                return Err(e);
            }
        };

        let signature = query.signature();
        if let Some(submission_id) = self.submission_id.filter(|_| self.matches(&signature)) {
            tracing::debug!(%submission_id, "Submission unchanged");
            return Ok(SubmitOutcome::Unchanged { submission_id });
        }

        if !self.active_recommendations.is_empty() {
            self.invalidate();
        }

        let script = match build(&query) {
            Ok(script) => script,
            Err(e) => {
                self.report_validation_failure(&e);
                return Err(e);
            }
        };

        let submission_id = Uuid::new_v4();
        tracing::info!(
            %submission_id,
            signature = %signature,
            recommendation_count = script.recommendations.len(),
            "Submission accepted"
        );

        self.active_query = Some(query);
        self.active_recommendations = script.recommendations.clone();
        self.last_accepted_signature = Some(signature);
        self.has_auto_scrolled = false;
        self.submission_id = Some(submission_id);
        self.phase = SessionPhase::Revealing;
        self.notices.retain(|n| n.level != NoticeLevel::Warning);

        Ok(SubmitOutcome::Started {
            submission_id,
            script,
        })
    }

    /// A control changed. Returns true if that invalidated the recommendations.
    pub fn field_changed(&mut self, draft: &QueryDraft) -> bool {
        self.render();
        if self.active_recommendations.is_empty() {
            return false;
        }
        if self.matches(&draft.signature()) {
            return false;
        }
        self.invalidate();
        true
    }

    /// Claims the reveal for `submission_id`.
    ///
    /// Returns `None` when the submission is no longer current, otherwise
    /// whether this reveal should scroll the transcript into view. Only the
    /// first claim per submission gets `Some(true)`.
    pub fn begin_reveal(&mut self, submission_id: Uuid) -> Option<bool> {
        if self.submission_id != Some(submission_id) {
            return None;
        }
        let scroll = !self.has_auto_scrolled;
        self.has_auto_scrolled = true;
        Some(scroll)
    }

    /// Marks the reveal of `submission_id` as finished. Ignored if stale.
    pub fn complete(&mut self, submission_id: Uuid) -> bool {
        if self.submission_id != Some(submission_id) || self.phase != SessionPhase::Revealing {
            return false;
        }
        self.phase = SessionPhase::Complete;
        true
    }

    /// Session teardown
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn matches(&self, signature: &QuerySignature) -> bool {
        !self.active_recommendations.is_empty()
            && self.last_accepted_signature.as_ref() == Some(signature)
    }

    fn invalidate(&mut self) {
        tracing::info!(
            submission_id = ?self.submission_id,
            "Preferences diverged from accepted submission, clearing recommendations"
        );
        self.active_recommendations.clear();
        self.active_query = None;
        self.last_accepted_signature = None;
        self.submission_id = None;
        self.has_auto_scrolled = false;
        self.phase = SessionPhase::Configuring;
        self.push_notice(NoticeLevel::Info, INVALIDATED_NOTICE.to_string());
    }

    fn push_notice(&mut self, level: NoticeLevel, message: String) {
        self.notices.push(Notice { level, message });
        if self.notices.len() > MAX_NOTICES {
            let excess = self.notices.len() - MAX_NOTICES;
            self.notices.drain(..excess);
        }
    }
}
