//! PlantPilot: Manufacturing Copilot Diagnostic Intelligence
//!
//! Multi-agent architecture for plant equipment diagnostics and maintenance guidance.
//!
//! ## Architecture
//!
//! - **Vision Agent**: Defect detection from equipment imagery (simulated classifier)
//! - **Guidance Agent**: Retrieval-augmented maintenance guidance over a document store
//! - **Report Agent**: Structured incident report composition
//! - **Prediction Agent**: Failure-risk scoring (model-backed or rule-based fallback)
//! - **Analytics Agent**: Performance trends, fleet comparison, plant KPIs
//! - **Diagnosis Pipeline**: Linear Vision → Guidance → Report orchestration with
//!   per-stage fault absorption and an append-only error trail

pub mod config;
pub mod types;
pub mod context;
pub mod llm;
pub mod ml;
pub mod agents;

// Re-export commonly used types
pub use types::{
    AnalyticsResult, DiagnosisRequest, DiagnosisResponse, GuidanceResult, MetricTrend,
    PipelinePhase, PredictionResult, RiskTier, SensorSnapshot, StageOutcome, StateError,
    TimeRange, TrendDirection, VisionResult, WorkflowState,
};

// Re-export agents
pub use agents::{
    AnalyticsAgent, DiagnosisPipeline, GuidanceAgent, PredictionAgent, ReportAgent, VisionAgent,
};

// Re-export collaborator seams
pub use context::{DocumentStore, NoOpStore, Passage, StaticMaintenanceCorpus};
pub use llm::{TemplateBackend, TextGenerator};
pub use ml::{FailureClassifier, FeatureVector};
