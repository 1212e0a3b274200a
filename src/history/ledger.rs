//! Accepted-slide ledger and style references.
//!
//! The ledger is the append-only record of slides the presenter committed to
//! show; each entry is a compact projection used as context for future
//! generation calls. The first [`STYLE_REFERENCE_CAP`] entries double as
//! style references that bias the generation pipeline toward visual
//! consistency for the rest of the session.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::slide::Slide;

/// How many accepted slides seed the style-reference set.
pub const STYLE_REFERENCE_CAP: usize = 2;

// ---------------------------------------------------------------------------
// AcceptedSlide
// ---------------------------------------------------------------------------

/// Compact projection of an accepted slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedSlide {
    pub id: Uuid,
    pub headline: String,
    pub visual_description: String,
    pub category: String,
}

impl From<&Slide> for AcceptedSlide {
    fn from(slide: &Slide) -> Self {
        Self {
            id: slide.id,
            headline: slide
                .headline
                .clone()
                .unwrap_or_else(|| slide.idea.title.clone()),
            visual_description: slide.idea.content.clone(),
            category: slide.idea.category.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// SlideHistory
// ---------------------------------------------------------------------------

/// Append-only accepted-slide ledger plus the derived style-reference set.
#[derive(Debug, Default)]
pub struct SlideHistory {
    accepted: Vec<AcceptedSlide>,
    style_refs: Vec<AcceptedSlide>,
}

impl SlideHistory {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Record an accepted slide. Returns `false` (and records nothing) when
    /// this slide id was already recorded — each slide is appended exactly
    /// once.
    pub fn record(&mut self, slide: &Slide) -> bool {
        if self.accepted.iter().any(|entry| entry.id == slide.id) {
            log::debug!("history: slide {} already recorded", slide.id);
            return false;
        }

        let entry = AcceptedSlide::from(slide);
        if self.style_refs.len() < STYLE_REFERENCE_CAP {
            self.style_refs.push(entry.clone());
        }
        self.accepted.push(entry);
        true
    }

    /// Forget everything (session reset).
    pub fn clear(&mut self) {
        self.accepted.clear();
        self.style_refs.clear();
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The last `n` accepted entries, oldest first.
    pub fn recent(&self, n: usize) -> &[AcceptedSlide] {
        let start = self.accepted.len().saturating_sub(n);
        &self.accepted[start..]
    }

    pub fn accepted(&self) -> &[AcceptedSlide] {
        &self.accepted
    }

    /// The style-reference set: the first entries of the session, capped at
    /// [`STYLE_REFERENCE_CAP`] and immutable once full.
    pub fn style_references(&self) -> &[AcceptedSlide] {
        &self.style_refs
    }

    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
