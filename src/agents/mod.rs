//! Diagnostic agents and the pipeline that sequences them.
//!
//! ## Agents
//!
//! 1. **Vision** - defect detection from equipment imagery
//! 2. **Guidance** - retrieval-augmented maintenance steps
//! 3. **Report** - structured incident report composition
//! 4. **Prediction** - failure-risk scoring (independent of the main pipeline)
//! 5. **Analytics** - trends, fleet comparison, plant KPIs (independent)
//!
//! Agents 1-3 are sequenced by [`DiagnosisPipeline`]; 4 and 5 share no mutable
//! state with it and may run concurrently with the pipeline or each other.
//! Every agent converts internal failures into degraded-but-well-formed
//! results; nothing here raises past a stage boundary.

pub mod vision;
pub mod guidance;
pub mod report;
pub mod prediction;
pub mod analytics;
pub mod orchestrator;

pub use vision::{DefectDetector, KeywordDetector, VisionAgent};
pub use guidance::GuidanceAgent;
pub use report::ReportAgent;
pub use prediction::PredictionAgent;
pub use analytics::{AnalyticsAgent, SyntheticTelemetry, TelemetrySource};
pub use orchestrator::DiagnosisPipeline;
