//! Shared data structures for the manufacturing copilot pipeline:
//! - Request/response envelope for a diagnosis run
//! - WorkflowState (single-assignment stage outputs + append-only error trail)
//! - Per-stage result types (vision, guidance, prediction, analytics)

mod state;
mod request;
mod vision;
mod guidance;
mod prediction;
mod analytics;

pub use state::*;
pub use request::*;
pub use vision::*;
pub use guidance::*;
pub use prediction::*;
pub use analytics::*;
