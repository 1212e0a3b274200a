//! slidecast — live narration in, presentation-ready slides out.
//!
//! The orchestration core for a presentation tool where a presenter
//! narrates and slides materialize automatically, while uploaded deck
//! content and audience questions flow into the same presentation.
//!
//! # Data flow
//!
//! ```text
//! speech ──▶ TranscriptAccumulator ──▶ GateEngine ──▶ GenerationAdapter ─┐
//!                                                                       │
//! accepted slides ─┐                                                    ▼
//! audience answers ┼─▶ ExploratoryScheduler ─▶ GenerationAdapter ─▶ ChannelStore
//! presenter prompt ┘    (debounce + coalesce + rollback)                │
//!                                                                       ▼
//!                                                        presentation surface
//! ```
//!
//! Everything behind the service seams (transcription transport, gate
//! decision, slide generation, follow-up proposals) is an external
//! collaborator reached through the traits in [`generate`].
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use slidecast::config::AppConfig;
//! use slidecast::generate::ApiSlideService;
//! use slidecast::session::SessionController;
//! use slidecast::transcript::TranscriptEvent;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::load().unwrap_or_default();
//!     let service = Arc::new(ApiSlideService::from_config(&config.service));
//!
//!     let controller = SessionController::new(
//!         config,
//!         service.clone(),
//!         service.clone(),
//!         service,
//!     );
//!
//!     controller.start();
//!     controller.handle_transcript(TranscriptEvent {
//!         text: "we are launching a new product line this quarter".into(),
//!         is_final: true,
//!     });
//!     // … slides arrive in the exploratory channel as the gate accepts.
//! }
//! ```

pub mod channel;
pub mod config;
pub mod gate;
pub mod generate;
pub mod history;
pub mod scheduler;
pub mod session;
pub mod slide;
pub mod transcript;
