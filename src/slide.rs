//! Core slide domain types shared by every orchestration module.
//!
//! A [`Slide`] is immutable once created; its `id` is the only key used for
//! removal and de-duplication. [`SlideContent`] is the structured output of
//! the gate and follow-up services before a slide has been rendered.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// SlideSource
// ---------------------------------------------------------------------------

/// Which intake path produced a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlideSource {
    /// Generated from narration or a coalesced exploratory dispatch.
    Exploratory,
    /// Created while answering an audience question.
    Audience,
    /// Extracted from an uploaded deck.
    Deck,
}

// ---------------------------------------------------------------------------
// IdeaSeed
// ---------------------------------------------------------------------------

/// Provenance triple carried by every slide: the idea it grew from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaSeed {
    pub title: String,
    pub content: String,
    pub category: String,
}

// ---------------------------------------------------------------------------
// SlideContent
// ---------------------------------------------------------------------------

/// Structured slide content as returned by the gate decision service,
/// before rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideContent {
    pub headline: String,
    pub subheadline: Option<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
    /// Prompt-ready description of the visual the slide should carry.
    pub visual_description: String,
    pub category: String,
    /// The narration excerpt this content was distilled from.
    pub source_transcript: Option<String>,
}

// ---------------------------------------------------------------------------
// Slide
// ---------------------------------------------------------------------------

/// An immutable-once-created slide record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// Globally unique within a session; the only removal/dedup key.
    pub id: Uuid,
    /// Rendered artifact reference, when the generation service produced one.
    pub image_url: Option<String>,
    pub headline: Option<String>,
    pub subheadline: Option<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
    /// Background / style token used for visual sequencing.
    pub style_token: Option<String>,
    /// The idea this slide grew from.
    pub idea: IdeaSeed,
    /// Creation time, milliseconds since the Unix epoch.
    pub created_at_ms: u64,
    pub source: SlideSource,
}

impl Slide {
    /// Build an unrendered slide straight from structured content.
    pub fn from_content(content: &SlideContent, source: SlideSource) -> Self {
        Self {
            id: Uuid::new_v4(),
            image_url: None,
            headline: Some(content.headline.clone()),
            subheadline: content.subheadline.clone(),
            bullets: content.bullets.clone(),
            style_token: None,
            idea: IdeaSeed {
                title: content.headline.clone(),
                content: content.visual_description.clone(),
                category: content.category.clone(),
            },
            created_at_ms: now_ms(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// PresenterPrompt
// ---------------------------------------------------------------------------

/// A free-form prompt typed by the presenter, optionally anchored to the
/// slide they were looking at when they typed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenterPrompt {
    pub prompt: String,
    pub current_slide: Option<Slide>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Milliseconds since the Unix epoch; 0 if the clock is before the epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> SlideContent {
        SlideContent {
            headline: "Launch timeline".into(),
            subheadline: Some("Q3 milestones".into()),
            bullets: vec!["Beta in July".into(), "GA in September".into()],
            visual_description: "roadmap with three milestone markers".into(),
            category: "product".into(),
            source_transcript: Some("we are launching in Q3".into()),
        }
    }

    #[test]
    fn from_content_carries_text_and_provenance() {
        let slide = Slide::from_content(&content(), SlideSource::Exploratory);

        assert_eq!(slide.headline.as_deref(), Some("Launch timeline"));
        assert_eq!(slide.subheadline.as_deref(), Some("Q3 milestones"));
        assert_eq!(slide.bullets.len(), 2);
        assert_eq!(slide.idea.title, "Launch timeline");
        assert_eq!(slide.idea.category, "product");
        assert_eq!(slide.source, SlideSource::Exploratory);
        assert!(slide.image_url.is_none());
    }

    #[test]
    fn from_content_assigns_unique_ids() {
        let a = Slide::from_content(&content(), SlideSource::Exploratory);
        let b = Slide::from_content(&content(), SlideSource::Exploratory);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn now_ms_is_monotonic_enough() {
        let a = now_ms();
        let b = now_ms();
        assert!(b >= a);
    }
}
