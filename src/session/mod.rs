//! Session state and lifecycle control.
//!
//! # Architecture
//!
//! ```text
//! SessionController  ← start/stop/pause/resume + intake surface
//!   ├─ GateEngine            (narration → go/no-go)
//!   ├─ ExploratoryScheduler  (trigger coalescing)
//!   └─ GenerationAdapter     (outbound requests → channel store)
//!          │
//!          ▼
//! SharedSession (Arc<Mutex<SessionState>>) ←── read by the presentation
//!                                              surface
//! ```

pub mod controller;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use controller::SessionController;
pub use state::{new_shared_session, GateStatus, SessionState, SessionStatus, SharedSession};
