//! Gate decision engine — turns accumulated narration into go/no-go slide
//! decisions.
//!
//! At most one evaluation is in flight at a time; a concurrent request is
//! dropped, not queued, favoring the freshest transcript over ordering
//! fidelity. A transcript identical to the last one evaluated is skipped so
//! an unchanged buffer never costs a second network round-trip.
//!
//! ```text
//! Idle ──evaluate()──▶ Evaluating ──▶ accepted: clear transcript,
//!                                     record idea, render slide
//!                                 ──▶ rejected: surface reason
//!                                 ──▶ errored:  keep transcript, retry on
//!                                               the next segment
//! ```

use std::sync::{Arc, Mutex};

use crate::generate::{GateRequest, GateService, GenerationAdapter};
use crate::session::{GateStatus, SharedSession};
use crate::slide::IdeaSeed;

// ---------------------------------------------------------------------------
// GateEngine
// ---------------------------------------------------------------------------

/// Owns the in-flight guard and the last-evaluated-transcript dedup state.
pub struct GateEngine {
    session: SharedSession,
    service: Arc<dyn GateService>,
    adapter: Arc<GenerationAdapter>,
    inner: Mutex<GateInner>,
}

#[derive(Default)]
struct GateInner {
    in_flight: bool,
    last_transcript: Option<String>,
}

impl GateEngine {
    pub fn new(
        session: SharedSession,
        service: Arc<dyn GateService>,
        adapter: Arc<GenerationAdapter>,
    ) -> Self {
        Self {
            session,
            service,
            adapter,
            inner: Mutex::new(GateInner::default()),
        }
    }

    /// Ask the gate whether `transcript` is slide-worthy and react.
    ///
    /// Silently skipped when a decision is already in flight or when the
    /// transcript has not grown since the last evaluation. Threshold policy
    /// (how long the transcript must be before asking at all) is the
    /// caller's job.
    pub async fn evaluate(&self, transcript: String) {
        let transcript = transcript.trim().to_string();
        if transcript.is_empty() {
            return;
        }

        {
            let mut guard = self.inner.lock().unwrap();
            if guard.in_flight {
                log::debug!("gate: evaluation already in flight, dropping request");
                return;
            }
            if guard.last_transcript.as_deref() == Some(transcript.as_str()) {
                log::debug!("gate: transcript unchanged since last evaluation, skipping");
                return;
            }
            guard.in_flight = true;
            guard.last_transcript = Some(transcript.clone());
        }

        let request = {
            let mut session = self.session.lock().unwrap();
            session.is_processing = true;
            session.gate_status = GateStatus::Evaluating;
            GateRequest {
                transcript: transcript.clone(),
                prior_ideas: session.prior_ideas.clone(),
                accepted_slides: session.history.accepted().to_vec(),
                is_first_slide: session.history.is_empty(),
            }
        };

        let outcome = self.service.evaluate(&request).await;

        match outcome {
            Ok(decision) if decision.should_create_slide => {
                match decision.slide_content {
                    Some(content) => {
                        let landed = {
                            let mut session = self.session.lock().unwrap();
                            if session.recording {
                                session.transcript.clear();
                                session.prior_ideas.push(IdeaSeed {
                                    title: content.headline.clone(),
                                    content: content.visual_description.clone(),
                                    category: content.category.clone(),
                                });
                                session.gate_status = GateStatus::Accepted;
                                true
                            } else {
                                // Session stopped while the call was in
                                // flight; the fresh session must not absorb
                                // this result.
                                false
                            }
                        };
                        if landed {
                            if let Err(e) = self.adapter.generate_accepted(content).await {
                                log::warn!("gate: generation after acceptance failed: {e}");
                                self.set_status(GateStatus::Failed);
                            }
                        }
                    }
                    None => {
                        log::warn!("gate: accepted without slide content");
                        self.set_status(GateStatus::Failed);
                    }
                }
            }
            Ok(decision) => {
                let reason = decision
                    .reason
                    .unwrap_or_else(|| "not slide-worthy yet".to_string());
                log::debug!("gate: rejected ({reason})");
                self.set_status(GateStatus::Rejected { reason });
            }
            Err(e) => {
                // Transcript deliberately left intact: the next segment grows
                // the buffer and re-triggers an evaluation.
                log::warn!("gate: evaluation failed: {e}");
                self.set_status(GateStatus::Failed);
            }
        }

        {
            let mut session = self.session.lock().unwrap();
            session.is_processing = false;
        }
        self.inner.lock().unwrap().in_flight = false;
    }

    /// Forget the dedup state (session reset).
    pub fn reset(&self) {
        let mut guard = self.inner.lock().unwrap();
        guard.in_flight = false;
        guard.last_transcript = None;
    }

    fn set_status(&self, status: GateStatus) {
        let mut session = self.session.lock().unwrap();
        if session.recording {
            session.gate_status = status;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
