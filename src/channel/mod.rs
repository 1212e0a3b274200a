//! Slide channel store — three independently-navigable slide queues.
//!
//! # Architecture
//!
//! ```text
//! GenerationAdapter ──append──▶ ┌──────────────────────────────┐
//! audience intake   ──append──▶ │ ChannelStore                 │
//! deck intake       ──append──▶ │  [Exploratory] queue+cursor  │ ◀── navigate /
//!                               │  [Audience]    queue+cursor  │     peek / take
//!                               │  [Deck]        queue+cursor  │     (presentation
//!                               └──────────────────────────────┘      surface)
//! ```
//!
//! Only the exploratory channel is capacity-bounded; see
//! [`ChannelConfig`](crate::config::ChannelConfig).

pub mod store;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use store::{ChannelInfo, ChannelKind, ChannelStore, Direction};
