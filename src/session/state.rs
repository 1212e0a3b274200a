//! Shared session state — the single source of truth for the orchestration
//! core.
//!
//! [`SessionState`] owns every piece of mutable per-session data: the three
//! slide channels, the accepted-slide history, the transcript buffer, the
//! prior-idea list, the slide counter and the lifecycle flags. It is held
//! behind [`SharedSession`] (`Arc<Mutex<SessionState>>`) — cheap to clone
//! and safe to share across tasks.
//!
//! Async callbacks must read this state at the moment of use, never capture
//! a copy at registration time; that is what keeps the in-flight guards and
//! the paused flag honest across interleaved completions.

use std::sync::{Arc, Mutex};

use crate::channel::ChannelStore;
use crate::config::AppConfig;
use crate::history::SlideHistory;
use crate::slide::IdeaSeed;
use crate::transcript::TranscriptAccumulator;

// ---------------------------------------------------------------------------
// GateStatus
// ---------------------------------------------------------------------------

/// State of the gate decision engine, as surfaced to the presentation
/// surface.
///
/// ```text
/// Idle ──evaluation starts──▶ Evaluating
///                             ──accepted──▶ Accepted ─┐
///                             ──declined──▶ Rejected ─┼─▶ (next evaluation) Evaluating
///                             ──error────▶ Failed ────┘
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum GateStatus {
    /// No evaluation has run yet, or the session was reset.
    Idle,
    /// A gate decision call is in flight.
    Evaluating,
    /// The last evaluation produced a slide.
    Accepted,
    /// The gate declined; `reason` is shown to the presenter.
    Rejected { reason: String },
    /// The gate or generation call failed; the transcript was kept so the
    /// next segment re-triggers an evaluation.
    Failed,
}

impl GateStatus {
    /// A short human-readable label suitable for a status display.
    pub fn label(&self) -> &'static str {
        match self {
            GateStatus::Idle => "Idle",
            GateStatus::Evaluating => "Evaluating",
            GateStatus::Accepted => "Accepted",
            GateStatus::Rejected { .. } => "Rejected",
            GateStatus::Failed => "Failed",
        }
    }

    /// The rejection reason, when there is one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            GateStatus::Rejected { reason } => Some(reason),
            _ => None,
        }
    }
}

impl Default for GateStatus {
    fn default() -> Self {
        GateStatus::Idle
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// All mutable per-session orchestration state.
pub struct SessionState {
    /// Whether the session is accepting speech input.
    pub recording: bool,

    /// The three slide channels.
    pub channels: ChannelStore,

    /// Accepted-slide ledger plus style references.
    pub history: SlideHistory,

    /// Accumulated finalized narration (gated mode only).
    pub transcript: TranscriptAccumulator,

    /// Ideas the gate has already accepted, for de-duplication.
    pub prior_ideas: Vec<IdeaSeed>,

    /// Monotonically increasing counter stamped onto generation requests.
    pub slide_counter: u32,

    /// While set, triggers accumulate but nothing is dispatched.
    pub generation_paused: bool,

    /// Whether any service call is currently in flight.
    pub is_processing: bool,

    /// Last gate outcome, for the presentation surface.
    pub gate_status: GateStatus,

    /// Most recent interim transcription text — display only.
    pub live_caption: Option<String>,

    /// Summary of uploaded deck content, merged into follow-up requests.
    pub deck_context: Option<String>,
}

impl SessionState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            recording: false,
            channels: ChannelStore::new(&config.channels),
            history: SlideHistory::new(),
            transcript: TranscriptAccumulator::new(),
            prior_ideas: Vec::new(),
            slide_counter: 0,
            generation_paused: false,
            is_processing: false,
            gate_status: GateStatus::Idle,
            live_caption: None,
            deck_context: None,
        }
    }

    /// Return every subsystem to its initial state. Called by `stop()`;
    /// leaving any field out of this list is a correctness bug.
    pub fn reset(&mut self) {
        self.recording = false;
        self.channels.reset_all();
        self.history.clear();
        self.transcript.clear();
        self.prior_ideas.clear();
        self.slide_counter = 0;
        self.generation_paused = false;
        self.is_processing = false;
        self.gate_status = GateStatus::Idle;
        self.live_caption = None;
        self.deck_context = None;
    }

    /// Increment and return the slide counter.
    pub fn next_slide_number(&mut self) -> u32 {
        self.slide_counter += 1;
        self.slide_counter
    }
}

// ---------------------------------------------------------------------------
// SharedSession
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`SessionState`].
///
/// Cheap to clone (`Arc` clone). Lock with `.lock().unwrap()` for a short
/// critical section; do **not** hold the lock across `.await` points.
pub type SharedSession = Arc<Mutex<SessionState>>;

/// Construct a new [`SharedSession`] for one recording session.
pub fn new_shared_session(config: &AppConfig) -> SharedSession {
    Arc::new(Mutex::new(SessionState::new(config)))
}

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

/// Snapshot of the status fields exposed to the presentation surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStatus {
    pub recording: bool,
    pub is_processing: bool,
    pub gate_status: GateStatus,
    pub is_generation_paused: bool,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
