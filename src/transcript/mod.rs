//! Transcript accumulation for the gated narration path.
//!
//! The transcription transport streams `{text, is_final}` events. Interim
//! events are display-only; finalized ones land here until the gate decides
//! the buffer is slide-worthy and clears it. In streaming mode the
//! accumulator is bypassed entirely.

pub mod accumulator;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use accumulator::TranscriptAccumulator;

use serde::{Deserialize, Serialize};

/// One event from the transcription transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEvent {
    pub text: String,
    pub is_final: bool,
}
