//! Exploratory trigger scheduling — the batching gate at the heart of the
//! orchestration core.
//!
//! # Architecture
//!
//! ```text
//! accept_slide ──────┐
//! audience answer ───┼─▶ enqueue ─▶ PendingContext ─┐
//! presenter prompt ──┘   (forced)                   │ swap-capture
//!                                                   ▼
//!                        debounce timer ──▶ dispatch(batch) ──▶ adapter
//!                                                   │
//!                                 failure: merge_front(batch) back in
//! ```
//!
//! The pending context is only ever mutated by whole-value swap, which is
//! what makes the capture/rollback protocol safe without explicit locking
//! around the network call.

pub mod pending;
pub mod trigger;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use pending::{PendingContext, Trigger};
pub use trigger::ExploratoryScheduler;
