//! Accepted-slide ledger and derived style references.

pub mod ledger;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use ledger::{AcceptedSlide, SlideHistory, STYLE_REFERENCE_CAP};
