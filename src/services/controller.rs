use std::sync::Arc;

use serde::Serialize;
use tokio::{sync::Mutex, task::JoinHandle};
use uuid::Uuid;

use crate::{
    models::{QueryDraft, QueryError, QuerySignature},
    services::{
        perturbation::PerturbationSource,
        reveal::{RevealEngine, Transcript, TranscriptSnapshot},
        script::{build_script, Script, ScriptOptions},
        session::{RevealSession, SessionPhase, SessionView, SubmitOutcome},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptStatus {
    /// A new reveal was scheduled
    Started,
    /// The draft matches the active submission; nothing was scheduled
    Unchanged,
}

/// Answer to an accepted submit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Accepted {
    pub status: AcceptStatus,
    pub submission_id: Uuid,
    pub signature: QuerySignature,
}

/// What a polling client needs to draw the transcript
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptFrame {
    pub phase: SessionPhase,
    /// True at most once per accepted submission
    pub scroll_into_view: bool,
    #[serde(flatten)]
    pub transcript: TranscriptSnapshot,
}

/// Drives one user's session: accepts events from the form layer and runs
/// each accepted submission's reveal as a background task.
///
/// Reveals go through a single lane, so a newer submission's reveal waits
/// until the running one has returned. A reveal whose submission is no longer
/// current by then is skipped.
pub struct RevealController {
    session: Arc<Mutex<RevealSession>>,
    transcript: Arc<Transcript>,
    engine: Arc<RevealEngine>,
    options: ScriptOptions,
    perturbation: Mutex<Box<dyn PerturbationSource>>,
    lane: Arc<Mutex<()>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl RevealController {
    pub fn new(
        engine: RevealEngine,
        options: ScriptOptions,
        perturbation: Box<dyn PerturbationSource>,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(RevealSession::new())),
            transcript: Arc::new(Transcript::new()),
            engine: Arc::new(engine),
            options,
            perturbation: Mutex::new(perturbation),
            lane: Arc::new(Mutex::new(())),
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn options(&self) -> &ScriptOptions {
        &self.options
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Render event; returns the session as it now stands
    pub async fn render(&self) -> SessionView {
        let mut session = self.session.lock().await;
        session.render();
        session.view()
    }

    /// A form control changed to `draft`
    pub async fn field_changed(&self, draft: &QueryDraft) -> SessionView {
        let mut session = self.session.lock().await;
        session.field_changed(draft);
        session.view()
    }

    /// Generate action
    pub async fn submit(&self, draft: &QueryDraft) -> Result<Accepted, QueryError> {
        let outcome = {
            let mut session = self.session.lock().await;
            let mut source = self.perturbation.lock().await;
            session.submit(draft, |query| {
                build_script(query, &self.options, &mut **source)
            })?
        };
        let signature = draft.signature();

        match outcome {
            SubmitOutcome::Started {
                submission_id,
                script,
            } => {
                self.spawn_reveal(submission_id, script).await;
                Ok(Accepted {
                    status: AcceptStatus::Started,
                    submission_id,
                    signature,
                })
            }
            SubmitOutcome::Unchanged { submission_id } => Ok(Accepted {
                status: AcceptStatus::Unchanged,
                submission_id,
                signature,
            }),
        }
    }

    /// Current transcript; hands out a pending scroll command exactly once
    pub async fn poll_transcript(&self) -> TranscriptFrame {
        let phase = self.session.lock().await.phase();
        TranscriptFrame {
            phase,
            scroll_into_view: self.transcript.take_scroll_command().await,
            transcript: self.transcript.snapshot().await,
        }
    }

    /// Session teardown: stops outstanding reveals and starts over
    pub async fn reset(&self) {
        for task in self.tasks.lock().await.drain(..) {
            task.abort();
        }
        self.session.lock().await.reset();
        self.transcript.clear().await;
        tracing::info!("Session reset");
    }

    /// Waits for every scheduled reveal to return
    pub async fn wait_for_reveals(&self) {
        let tasks = std::mem::take(&mut *self.tasks.lock().await);
        for task in tasks {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    tracing::error!(error = %e, "Reveal task failed");
                }
            }
        }
    }

    async fn spawn_reveal(&self, submission_id: Uuid, script: Script) {
        let session = Arc::clone(&self.session);
        let transcript = Arc::clone(&self.transcript);
        let engine = Arc::clone(&self.engine);
        let lane = Arc::clone(&self.lane);

        let task = tokio::spawn(async move {
            let _lane = lane.lock_owned().await;

            let claim = session.lock().await.begin_reveal(submission_id);
            let Some(scroll) = claim else {
                tracing::debug!(%submission_id, "Skipping reveal of superseded submission");
                return;
            };

            transcript.clear().await;
            let plan = engine.plan(&script, scroll);
            tracing::info!(
                %submission_id,
                slots = plan.slot_count(),
                min_duration_ms = plan.min_duration().as_millis() as u64,
                scroll,
                "Reveal started"
            );

            let finalized = engine.play(&plan, transcript.as_ref()).await;

            if session.lock().await.complete(submission_id) {
                tracing::info!(%submission_id, finalized, "Reveal complete");
            } else {
                tracing::info!(%submission_id, finalized, "Reveal finished after its submission was superseded");
            }
        });

        let mut tasks = self.tasks.lock().await;
        tasks.retain(|t| !t.is_finished());
        tasks.push(task);
    }
}
