//! Running buffer of finalized narration segments.
//!
//! The transcription transport can deliver the same finalized segment twice
//! (reconnects, at-least-once delivery); a segment exactly equal to the
//! immediately previous one is skipped.

// ---------------------------------------------------------------------------
// TranscriptAccumulator
// ---------------------------------------------------------------------------

/// Collects finalized speech segments into one space-joined buffer.
///
/// # Example
/// ```rust
/// use slidecast::transcript::TranscriptAccumulator;
///
/// let mut acc = TranscriptAccumulator::new();
/// acc.append_final("we are launching");
/// acc.append_final("a new product line");
/// assert_eq!(acc.snapshot(), "we are launching a new product line");
/// ```
#[derive(Debug, Default)]
pub struct TranscriptAccumulator {
    buffer: String,
    last_segment: Option<String>,
}

impl TranscriptAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Append a finalized segment, joined with a single space.
    ///
    /// Empty/whitespace segments and exact repeats of the previous segment
    /// are skipped.
    pub fn append_final(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if self.last_segment.as_deref() == Some(text) {
            log::debug!("transcript: skipping duplicate segment ({} chars)", text.len());
            return;
        }

        if !self.buffer.is_empty() {
            self.buffer.push(' ');
        }
        self.buffer.push_str(text);
        self.last_segment = Some(text.to_string());
    }

    /// Empty the buffer and forget the duplicate-suppression state.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.last_segment = None;
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The current buffer contents.
    pub fn snapshot(&self) -> String {
        self.buffer.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Buffer length in characters (the unit the gate thresholds use).
    pub fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
