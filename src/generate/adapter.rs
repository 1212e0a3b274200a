//! Generation pipeline adapter — builds outbound requests and routes
//! results into the channel store.
//!
//! Two paths write through here:
//!
//! * the gate-accepted path (`generate_accepted`): one generation-service
//!   call per accepted idea;
//! * the exploratory path (`run_exploratory`): one follow-up-service call
//!   per coalesced batch, capped at one resulting slide so the channel is
//!   never flooded.
//!
//! On failure both paths return the error to the caller and write nothing —
//! never a partial write. The session lock is only held while building the
//! request or landing the result, never across the network call.

use std::sync::Arc;

use crate::channel::ChannelKind;
use crate::config::{GenerateConfig, OnEmpty};
use crate::scheduler::PendingContext;
use crate::session::SharedSession;
use crate::slide::{Slide, SlideContent, SlideSource};

use super::service::{
    FollowupRequest, FollowupService, GeneratedSlide, GenerationRequest, GenerationService,
    ServiceError,
};

// ---------------------------------------------------------------------------
// GenerationAdapter
// ---------------------------------------------------------------------------

/// Builds outbound generation requests and lands the results.
pub struct GenerationAdapter {
    session: SharedSession,
    generation: Arc<dyn GenerationService>,
    followup: Arc<dyn FollowupService>,
    config: GenerateConfig,
}

impl GenerationAdapter {
    pub fn new(
        session: SharedSession,
        generation: Arc<dyn GenerationService>,
        followup: Arc<dyn FollowupService>,
        config: GenerateConfig,
    ) -> Self {
        Self {
            session,
            generation,
            followup,
            config,
        }
    }

    // -----------------------------------------------------------------------
    // Gate-accepted path
    // -----------------------------------------------------------------------

    /// Render one slide from gate-accepted content and append it to the
    /// exploratory channel.
    pub async fn generate_accepted(&self, content: SlideContent) -> Result<(), ServiceError> {
        let request = {
            let mut session = self.session.lock().unwrap();
            GenerationRequest {
                slide_content: content.clone(),
                style_references: session.history.style_references().to_vec(),
                slide_number: session.next_slide_number(),
            }
        };

        let generated = self.generation.generate(&request).await?;
        let slide = merge_generated(&content, generated);

        log::debug!("adapter: generated slide {} from accepted idea", slide.id);
        self.land(slide);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Exploratory path
    // -----------------------------------------------------------------------

    /// Dispatch one coalesced batch to the follow-up service. Writes at most
    /// one slide; an `Err` means nothing was written and the caller should
    /// roll the batch back.
    pub async fn run_exploratory(&self, batch: &PendingContext) -> Result<(), ServiceError> {
        let request = self.build_followup_request(batch);

        let ideas = self.followup.followups(&request).await?;
        let discarded = ideas.len().saturating_sub(1);
        if discarded > 0 {
            log::debug!("adapter: keeping 1 of {} follow-ups", ideas.len());
        }

        let content = match ideas.into_iter().next() {
            Some(idea) => idea.into_content(),
            None => match self.config.on_empty {
                OnEmpty::Surface => return Err(ServiceError::EmptyResponse),
                OnEmpty::Synthesize => {
                    log::warn!("adapter: empty follow-up response, synthesizing fallback slide");
                    synthesize_fallback(batch)
                }
            },
        };

        let slide = Slide::from_content(&content, SlideSource::Exploratory);
        self.land(slide);
        Ok(())
    }

    /// Append a result to the exploratory channel — unless the session
    /// stopped while the call was in flight, in which case the fresh session
    /// must not absorb it.
    fn land(&self, slide: Slide) {
        let mut session = self.session.lock().unwrap();
        if !session.recording {
            log::debug!("adapter: dropping result {}, session inactive", slide.id);
            return;
        }
        session.channels.append(ChannelKind::Exploratory, slide);
    }

    /// Merge the batch with session context into one follow-up request.
    fn build_followup_request(&self, batch: &PendingContext) -> FollowupRequest {
        let mut session = self.session.lock().unwrap();

        let last_prompt = batch.presenter_prompts.last();
        let audience_start = batch
            .audience_questions
            .len()
            .saturating_sub(self.config.audience_context);

        FollowupRequest {
            prompt: last_prompt.map(|p| p.prompt.clone()),
            current_slide: last_prompt.and_then(|p| p.current_slide.clone()),
            transcript_context: session.transcript.snapshot(),
            slide_history_context: session.history.recent(self.config.history_context).to_vec(),
            uploaded_slides_context: session.deck_context.clone(),
            audience_context: batch.audience_questions[audience_start..]
                .iter()
                .map(|slide| {
                    slide
                        .headline
                        .clone()
                        .unwrap_or_else(|| slide.idea.title.clone())
                })
                .collect(),
            style_references: session.history.style_references().to_vec(),
            slide_number: session.next_slide_number(),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Combine gate-accepted content with whatever the generation service
/// rendered; service fields win, request content fills the gaps.
fn merge_generated(content: &SlideContent, generated: GeneratedSlide) -> Slide {
    let mut slide = Slide::from_content(content, SlideSource::Exploratory);
    slide.image_url = generated.image_url;
    slide.style_token = generated.style_token;
    if generated.headline.is_some() {
        slide.headline = generated.headline;
    }
    if generated.subheadline.is_some() {
        slide.subheadline = generated.subheadline;
    }
    if !generated.bullets.is_empty() {
        slide.bullets = generated.bullets;
    }
    slide
}

/// Locally synthesized slide content for an empty follow-up response, so a
/// dispatch is never silently a no-op from the presenter's perspective.
fn synthesize_fallback(batch: &PendingContext) -> SlideContent {
    let headline = batch
        .presenter_prompts
        .last()
        .map(|p| p.prompt.clone())
        .or_else(|| {
            batch
                .accepted_slides
                .last()
                .and_then(|s| s.headline.clone())
                .map(|h| format!("Building on \"{h}\""))
        })
        .unwrap_or_else(|| "Where this is heading".to_string());

    SlideContent {
        headline,
        subheadline: None,
        bullets: Vec::new(),
        visual_description: "clean typographic slide continuing the current theme".into(),
        category: "exploratory".into(),
        source_transcript: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
