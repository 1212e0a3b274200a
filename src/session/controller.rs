//! Session lifecycle controller — the surface the presentation layer talks
//! to.
//!
//! [`SessionController`] wires the gate engine, the exploratory scheduler
//! and the generation adapter around one [`SharedSession`], and owns the
//! start/stop/pause/resume lifecycle. `stop()` resets every subsystem as
//! one logical unit; a partial reset is a correctness bug.
//!
//! # Intake surface
//!
//! ```text
//! transcript events ──▶ handle_transcript ──▶ accumulator ──▶ gate engine
//! presenter prompt  ──▶ enqueue_presenter_prompt ──┐
//! accepted slide    ──▶ accept_slide ──────────────┼──▶ scheduler
//! audience answer   ──▶ add_audience_slide ────────┘
//! deck upload       ──▶ add_deck_slides ──▶ deck channel + context
//! ```
//!
//! All service calls are fire-and-forget: intake methods never block on the
//! network, they spawn and return.

use std::sync::Arc;

use crate::channel::{ChannelInfo, ChannelKind, Direction};
use crate::config::{AppConfig, GateMode};
use crate::gate::GateEngine;
use crate::generate::{FollowupService, GateService, GenerationAdapter, GenerationService};
use crate::scheduler::{ExploratoryScheduler, Trigger};
use crate::session::state::{new_shared_session, SessionStatus, SharedSession};
use crate::slide::{PresenterPrompt, Slide};
use crate::transcript::TranscriptEvent;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// SessionController
// ---------------------------------------------------------------------------

/// Drives one recording session.
pub struct SessionController {
    config: AppConfig,
    session: SharedSession,
    gate: Arc<GateEngine>,
    scheduler: Arc<ExploratoryScheduler>,
}

impl SessionController {
    /// Wire a controller from config and the three service seams.
    ///
    /// One object may implement all three traits (as
    /// [`ApiSlideService`](crate::generate::ApiSlideService) does); pass it
    /// three times.
    pub fn new(
        config: AppConfig,
        gate_service: Arc<dyn GateService>,
        generation: Arc<dyn GenerationService>,
        followup: Arc<dyn FollowupService>,
    ) -> Self {
        let session = new_shared_session(&config);
        let adapter = Arc::new(GenerationAdapter::new(
            session.clone(),
            generation,
            followup,
            config.generate.clone(),
        ));
        let gate = Arc::new(GateEngine::new(
            session.clone(),
            gate_service,
            adapter.clone(),
        ));
        let scheduler = Arc::new(ExploratoryScheduler::new(
            session.clone(),
            adapter,
            &config.scheduler,
        ));

        Self {
            config,
            session,
            gate,
            scheduler,
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Begin accepting speech input.
    pub fn start(&self) {
        let mut session = self.session.lock().unwrap();
        if session.recording {
            log::warn!("session: start() while already recording — ignored");
            return;
        }
        session.recording = true;
        log::info!("session: started");
    }

    /// Stop the session and return every subsystem to its initial state:
    /// speech input off, debounce timer cancelled, pending context discarded
    /// (not flushed), dispatch clock reset, transcript cleared, all three
    /// channels emptied, ledger and style references cleared, slide counter
    /// zeroed, paused flag cleared, gate dedup state forgotten.
    pub fn stop(&self) {
        self.scheduler.reset();
        self.gate.reset();
        self.session.lock().unwrap().reset();
        log::info!("session: stopped, state reset");
    }

    /// Pause generation: triggers and narration keep accumulating, but no
    /// service call is dispatched.
    pub fn pause(&self) {
        self.session.lock().unwrap().generation_paused = true;
        self.scheduler.pause();
        log::info!("session: generation paused");
    }

    /// Resume generation; narration accumulated across the pause is folded
    /// into an immediate forced dispatch.
    pub fn resume(&self) {
        self.session.lock().unwrap().generation_paused = false;
        self.scheduler.resume();
        log::info!("session: generation resumed");
    }

    // -----------------------------------------------------------------------
    // Transcript intake
    // -----------------------------------------------------------------------

    /// Consume one event from the transcription transport.
    ///
    /// Interim events only update the live caption. Final events feed the
    /// accumulator (gated mode) or go straight to the gate (streaming mode)
    /// once past the caller-side length threshold.
    pub fn handle_transcript(&self, event: TranscriptEvent) {
        {
            let mut session = self.session.lock().unwrap();
            if !session.recording {
                log::debug!("session: transcript event while stopped — ignored");
                return;
            }
            if !event.is_final {
                session.live_caption = Some(event.text);
                return;
            }
            session.live_caption = None;
        }

        match self.config.gate.mode {
            GateMode::Gated => {
                self.session
                    .lock()
                    .unwrap()
                    .transcript
                    .append_final(&event.text);
                self.maybe_evaluate_buffer();
            }
            GateMode::Streaming => self.maybe_evaluate_segment(event.text),
        }
    }

    /// Gated mode: ask the gate once the buffer has grown past the
    /// threshold. First-slide narration gets a lower bar than follow-on
    /// slides.
    fn maybe_evaluate_buffer(&self) {
        let snapshot = {
            let session = self.session.lock().unwrap();
            if session.generation_paused {
                return;
            }
            let threshold = if session.history.is_empty() {
                self.config.gate.first_slide_min_chars
            } else {
                self.config.gate.next_slide_min_chars
            };
            if session.transcript.char_len() <= threshold {
                return;
            }
            session.transcript.snapshot()
        };
        self.spawn_evaluation(snapshot);
    }

    /// Streaming mode: a long-enough final segment is a complete idea on its
    /// own; short ones are dropped.
    fn maybe_evaluate_segment(&self, text: String) {
        {
            let session = self.session.lock().unwrap();
            if session.generation_paused {
                return;
            }
            let threshold = if session.history.is_empty() {
                self.config.gate.first_slide_min_chars
            } else {
                self.config.gate.next_slide_min_chars
            };
            if text.chars().count() <= threshold {
                return;
            }
        }
        self.spawn_evaluation(text);
    }

    fn spawn_evaluation(&self, transcript: String) {
        let gate = Arc::clone(&self.gate);
        tokio::spawn(async move {
            gate.evaluate(transcript).await;
        });
    }

    // -----------------------------------------------------------------------
    // Trigger intake
    // -----------------------------------------------------------------------

    /// The presenter typed a free-form prompt; dispatch immediately (unless
    /// paused — then it is recorded and flushed on resume).
    pub fn enqueue_presenter_prompt(&self, prompt: String, current_slide: Option<Slide>) {
        self.scheduler.enqueue(Trigger::PresenterPrompt(PresenterPrompt {
            prompt,
            current_slide,
        }));
    }

    /// The presenter committed a slide: record it in the ledger (exactly
    /// once per id) and nudge the scheduler for a follow-up.
    pub fn accept_slide(&self, slide: Slide) {
        let recorded = self.session.lock().unwrap().history.record(&slide);
        if recorded {
            self.scheduler.enqueue(Trigger::SlideAccepted(slide));
        }
    }

    /// An audience question was answered with a slide: it lands in the
    /// audience channel and nudges the scheduler.
    pub fn add_audience_slide(&self, slide: Slide) {
        self.session
            .lock()
            .unwrap()
            .channels
            .append(ChannelKind::Audience, slide.clone());
        self.scheduler.enqueue(Trigger::AudienceAnswered(slide));
    }

    /// Deck-extraction output: slides land in the deck channel and the
    /// summary becomes context for future follow-up requests.
    pub fn add_deck_slides(&self, slides: Vec<Slide>, context_summary: Option<String>) {
        let mut session = self.session.lock().unwrap();
        for slide in slides {
            session.channels.append(ChannelKind::Deck, slide);
        }
        if context_summary.is_some() {
            session.deck_context = context_summary;
        }
    }

    // -----------------------------------------------------------------------
    // Channel surface
    // -----------------------------------------------------------------------

    pub fn navigate(&self, kind: ChannelKind, direction: Direction) {
        self.session.lock().unwrap().channels.navigate(kind, direction);
    }

    pub fn peek_current(&self, kind: ChannelKind) -> Option<Slide> {
        self.session
            .lock()
            .unwrap()
            .channels
            .peek_current(kind)
            .cloned()
    }

    pub fn channel_info(&self, kind: ChannelKind) -> ChannelInfo {
        self.session.lock().unwrap().channels.info(kind)
    }

    pub fn take(&self, kind: ChannelKind) -> Option<Slide> {
        self.session.lock().unwrap().channels.take(kind)
    }

    pub fn remove(&self, kind: ChannelKind, id: Uuid) -> Option<Slide> {
        self.session.lock().unwrap().channels.remove(kind, id)
    }

    // -----------------------------------------------------------------------
    // Status
    // -----------------------------------------------------------------------

    pub fn status(&self) -> SessionStatus {
        let session = self.session.lock().unwrap();
        SessionStatus {
            recording: session.recording,
            is_processing: session.is_processing,
            gate_status: session.gate_status.clone(),
            is_generation_paused: session.generation_paused,
        }
    }

    /// Shared handle for surfaces that read state directly (e.g. a UI loop).
    pub fn session(&self) -> SharedSession {
        self.session.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
