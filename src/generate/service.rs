//! Service traits and wire contracts for the external slide services.
//!
//! Three collaborators sit behind these seams: the gate decision service
//! (is this narration slide-worthy?), the generation service (render one
//! slide from structured content), and the follow-up service (propose the
//! next exploratory slide from merged context). Implementors must be
//! `Send + Sync` so they can be shared as `Arc<dyn …>`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::history::AcceptedSlide;
use crate::slide::{IdeaSeed, Slide, SlideContent};

// ---------------------------------------------------------------------------
// ServiceError
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to a slide service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("slide service request timed out")]
    Timeout,

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse service response: {0}")]
    Parse(String),

    /// The service returned a response with no usable content.
    #[error("service returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ServiceError::Timeout
        } else {
            ServiceError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Gate wire contract
// ---------------------------------------------------------------------------

/// Request to the gate decision service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateRequest {
    pub transcript: String,
    /// Ideas already accepted this session, for de-duplication.
    pub prior_ideas: Vec<IdeaSeed>,
    pub accepted_slides: Vec<AcceptedSlide>,
    pub is_first_slide: bool,
}

/// The gate's verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateDecision {
    pub should_create_slide: bool,
    /// Present when `should_create_slide` is true.
    pub slide_content: Option<SlideContent>,
    /// Present when the gate declined; shown to the presenter.
    pub reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Generation wire contract
// ---------------------------------------------------------------------------

/// Request to render one slide from structured content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub slide_content: SlideContent,
    pub style_references: Vec<AcceptedSlide>,
    /// Monotonic position of this slide within the session, for style
    /// sequencing.
    pub slide_number: u32,
}

/// Rendered slide fields as returned by the generation service. Everything
/// is optional; missing text falls back to the request's content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSlide {
    pub image_url: Option<String>,
    pub headline: Option<String>,
    pub subheadline: Option<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
    pub style_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub slide: GeneratedSlide,
}

// ---------------------------------------------------------------------------
// Follow-up wire contract
// ---------------------------------------------------------------------------

/// One batched exploratory request — the union of recent signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowupRequest {
    /// The presenter's most recent explicit prompt, if any.
    pub prompt: Option<String>,
    /// The slide the presenter was viewing when they typed the prompt.
    pub current_slide: Option<Slide>,
    /// Still-accumulated narration.
    pub transcript_context: String,
    /// Recent accepted slides (capped by config).
    pub slide_history_context: Vec<AcceptedSlide>,
    /// Summary of uploaded deck content, when a deck was ingested.
    pub uploaded_slides_context: Option<String>,
    /// Recent audience questions (capped by config).
    pub audience_context: Vec<String>,
    pub style_references: Vec<AcceptedSlide>,
    pub slide_number: u32,
}

/// One proposed follow-up slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowupIdea {
    pub headline: String,
    pub subheadline: Option<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
    pub visual_description: String,
    pub category: String,
}

impl FollowupIdea {
    /// Lift a proposal into renderable slide content.
    pub fn into_content(self) -> SlideContent {
        SlideContent {
            headline: self.headline,
            subheadline: self.subheadline,
            bullets: self.bullets,
            visual_description: self.visual_description,
            category: self.category,
            source_transcript: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowupResponse {
    #[serde(default)]
    pub followups: Vec<FollowupIdea>,
}

// ---------------------------------------------------------------------------
// Service traits
// ---------------------------------------------------------------------------

/// Decides whether accumulated narration justifies creating a slide.
#[async_trait]
pub trait GateService: Send + Sync {
    async fn evaluate(&self, request: &GateRequest) -> Result<GateDecision, ServiceError>;
}

/// Renders one slide from structured content.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedSlide, ServiceError>;
}

/// Proposes exploratory follow-up slides from merged context.
#[async_trait]
pub trait FollowupService: Send + Sync {
    async fn followups(&self, request: &FollowupRequest)
        -> Result<Vec<FollowupIdea>, ServiceError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn followup_response_tolerates_missing_list() {
        // A service replying `{}` must deserialize to zero follow-ups rather
        // than a parse error, so the on-empty policy can decide what happens.
        let parsed: FollowupResponse = serde_json::from_str("{}").expect("parse");
        assert!(parsed.followups.is_empty());
    }

    #[test]
    fn gate_decision_round_trips() {
        let decision = GateDecision {
            should_create_slide: false,
            slide_content: None,
            reason: Some("not enough context yet".into()),
        };
        let json = serde_json::to_string(&decision).expect("serialize");
        let back: GateDecision = serde_json::from_str(&json).expect("parse");
        assert_eq!(decision, back);
    }

    #[test]
    fn followup_idea_lifts_into_content() {
        let idea = FollowupIdea {
            headline: "Risks".into(),
            subheadline: None,
            bullets: vec!["supply chain".into()],
            visual_description: "storm clouds over a roadmap".into(),
            category: "analysis".into(),
        };
        let content = idea.into_content();
        assert_eq!(content.headline, "Risks");
        assert_eq!(content.bullets.len(), 1);
        assert!(content.source_transcript.is_none());
    }

    #[test]
    fn generated_slide_defaults_are_all_empty() {
        let parsed: GeneratedSlide = serde_json::from_str("{}").expect("parse");
        assert!(parsed.image_url.is_none());
        assert!(parsed.headline.is_none());
        assert!(parsed.bullets.is_empty());
    }
}
