//! Generation pipeline — service seams, HTTP client, and the adapter that
//! routes results into the channel store.
//!
//! # Architecture
//!
//! ```text
//! GateEngine ──accepted content──▶ ┌───────────────────┐   POST /v1/generate
//!                                  │ GenerationAdapter │ ─────────────────────▶
//! Scheduler ──coalesced batch────▶ │                   │   POST /v1/followups
//!                                  └─────────┬─────────┘
//!                                            │ at most one slide per dispatch
//!                                            ▼
//!                                  ChannelStore (exploratory)
//! ```
//!
//! The adapter never partially writes: a failed call returns the error to
//! the caller (the scheduler rolls its batch back) and leaves every channel
//! untouched.

pub mod adapter;
pub mod api;
pub mod service;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use adapter::GenerationAdapter;
pub use api::ApiSlideService;
pub use service::{
    FollowupIdea, FollowupRequest, FollowupResponse, FollowupService, GateDecision, GateRequest,
    GateService, GeneratedSlide, GenerationRequest, GenerationResponse, GenerationService,
    ServiceError,
};
