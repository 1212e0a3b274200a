//! The not-yet-dispatched accumulation of exploratory trigger inputs.
//!
//! [`PendingContext`] is the "batching gate" accumulator: triggers are
//! pushed in, the whole value is swapped out atomically at dispatch time,
//! and a failed batch is merged back *in front of* whatever arrived during
//! the failed call — events are deferred, never lost or double-sent.

use crate::slide::{PresenterPrompt, Slide};

// ---------------------------------------------------------------------------
// Trigger
// ---------------------------------------------------------------------------

/// One "please consider generating something" signal.
#[derive(Debug, Clone)]
pub enum Trigger {
    /// The presenter committed a slide; a follow-up may be worth suggesting.
    SlideAccepted(Slide),
    /// An audience question was answered with a slide.
    AudienceAnswered(Slide),
    /// The presenter typed a free-form prompt and is actively waiting.
    PresenterPrompt(PresenterPrompt),
}

impl Trigger {
    /// Presenter prompts dispatch immediately; passive triggers debounce.
    pub fn is_forced(&self) -> bool {
        matches!(self, Trigger::PresenterPrompt(_))
    }
}

// ---------------------------------------------------------------------------
// PendingContext
// ---------------------------------------------------------------------------

/// Mutable accumulator of trigger inputs awaiting dispatch.
#[derive(Debug, Clone, Default)]
pub struct PendingContext {
    pub accepted_slides: Vec<Slide>,
    pub audience_questions: Vec<Slide>,
    pub presenter_prompts: Vec<PresenterPrompt>,
}

impl PendingContext {
    pub fn push(&mut self, trigger: Trigger) {
        match trigger {
            Trigger::SlideAccepted(slide) => self.accepted_slides.push(slide),
            Trigger::AudienceAnswered(slide) => self.audience_questions.push(slide),
            Trigger::PresenterPrompt(prompt) => self.presenter_prompts.push(prompt),
        }
    }

    /// Merge an earlier (failed) batch back in, preserving arrival order:
    /// the earlier batch's entries end up before anything that accumulated
    /// while its dispatch was in flight.
    pub fn merge_front(&mut self, earlier: PendingContext) {
        let PendingContext {
            mut accepted_slides,
            mut audience_questions,
            mut presenter_prompts,
        } = earlier;

        accepted_slides.append(&mut self.accepted_slides);
        audience_questions.append(&mut self.audience_questions);
        presenter_prompts.append(&mut self.presenter_prompts);

        self.accepted_slides = accepted_slides;
        self.audience_questions = audience_questions;
        self.presenter_prompts = presenter_prompts;
    }

    pub fn is_empty(&self) -> bool {
        self.accepted_slides.is_empty()
            && self.audience_questions.is_empty()
            && self.presenter_prompts.is_empty()
    }

    /// Total trigger count across all three lists.
    pub fn len(&self) -> usize {
        self.accepted_slides.len() + self.audience_questions.len() + self.presenter_prompts.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
