//! Workflow state for a single diagnosis run.
//!
//! One `WorkflowState` exists per request and is owned exclusively by the
//! pipeline for the lifetime of that request. Inputs are set once at creation;
//! each stage output is a single-assignment field written by exactly one stage;
//! the error trail is append-only and preserves stage execution order.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{DiagnosisRequest, GuidanceResult, VisionResult};

// ============================================================================
// Pipeline phase
// ============================================================================

/// Progress of the linear diagnosis pipeline.
///
/// Transitions are strictly linear and unconditional:
/// `Created → VisionDone → GuidanceDone → ReportDone`. A stage that failed
/// internally still advances the phase with a degraded result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PipelinePhase {
    #[default]
    Created,
    VisionDone,
    GuidanceDone,
    /// Terminal phase - the state can be finalized into a response.
    ReportDone,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Created => write!(f, "Created"),
            PipelinePhase::VisionDone => write!(f, "VisionDone"),
            PipelinePhase::GuidanceDone => write!(f, "GuidanceDone"),
            PipelinePhase::ReportDone => write!(f, "ReportDone"),
        }
    }
}

// ============================================================================
// Stage outcome
// ============================================================================

/// Output of one pipeline stage.
///
/// Stages never raise to the pipeline: an internal failure is converted into a
/// degraded-but-well-formed `output` plus a `fault` message. The pipeline owns
/// recording the fault into the state's error trail; the stage itself never
/// touches shared state.
#[derive(Debug, Clone)]
pub struct StageOutcome<T> {
    /// Well-formed stage result (possibly a zero-confidence fallback).
    pub output: T,
    /// Diagnostic recorded by the pipeline when the stage degraded.
    pub fault: Option<String>,
}

impl<T> StageOutcome<T> {
    /// Successful stage pass.
    pub fn clean(output: T) -> Self {
        Self { output, fault: None }
    }

    /// Degraded stage pass: well-formed fallback output plus a diagnostic.
    pub fn degraded(output: T, fault: impl Into<String>) -> Self {
        Self {
            output,
            fault: Some(fault.into()),
        }
    }

    /// Whether this stage signaled an internal failure.
    pub fn is_degraded(&self) -> bool {
        self.fault.is_some()
    }
}

// ============================================================================
// State errors (catastrophic path)
// ============================================================================

/// State-corruption errors.
///
/// These indicate a pipeline bug (double write, out-of-order transition), not a
/// stage failure, and are the only errors that escape the pipeline internals.
/// The pipeline maps them to a best-effort degraded response instead of
/// dropping the request.
#[derive(Debug, Error, PartialEq)]
pub enum StateError {
    #[error("stage output '{field}' already assigned")]
    AlreadyAssigned { field: &'static str },

    #[error("invalid phase transition: {from} -> {to}")]
    PhaseOrder {
        from: PipelinePhase,
        to: PipelinePhase,
    },

    #[error("confidence score {0} outside [0, 1]")]
    ConfidenceOutOfRange(f64),
}

// ============================================================================
// Workflow state
// ============================================================================

/// Mutable record threaded through every stage of one diagnosis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowState {
    // Immutable inputs, set once at creation
    pub plant_id: String,
    pub equipment_id: String,
    pub problem_description: String,
    pub image_ref: Option<String>,

    phase: PipelinePhase,

    // Single-assignment stage outputs
    vision_result: Option<VisionResult>,
    guidance_result: Option<GuidanceResult>,
    report_text: Option<String>,
    confidence_score: f64,

    // Append-only, never cleared; order = stage execution order
    errors: Vec<String>,
}

impl WorkflowState {
    /// Create a fresh state from validated request inputs.
    pub fn new(request: &DiagnosisRequest) -> Self {
        Self {
            plant_id: request.plant_id.clone(),
            equipment_id: request.equipment_id.clone(),
            problem_description: request.problem_description.clone(),
            image_ref: request.image_ref.clone(),
            phase: PipelinePhase::Created,
            vision_result: None,
            guidance_result: None,
            report_text: None,
            confidence_score: 0.0,
            errors: Vec::new(),
        }
    }

    /// Current pipeline phase.
    pub fn phase(&self) -> PipelinePhase {
        self.phase
    }

    /// Record the vision stage output. Single assignment; advances
    /// `Created → VisionDone`.
    pub fn record_vision(&mut self, result: VisionResult) -> Result<(), StateError> {
        if self.vision_result.is_some() {
            return Err(StateError::AlreadyAssigned { field: "vision_result" });
        }
        self.advance(PipelinePhase::Created, PipelinePhase::VisionDone)?;
        self.vision_result = Some(result);
        Ok(())
    }

    /// Record the guidance stage output. Single assignment; advances
    /// `VisionDone → GuidanceDone`.
    pub fn record_guidance(&mut self, result: GuidanceResult) -> Result<(), StateError> {
        if self.guidance_result.is_some() {
            return Err(StateError::AlreadyAssigned { field: "guidance_result" });
        }
        self.advance(PipelinePhase::VisionDone, PipelinePhase::GuidanceDone)?;
        self.guidance_result = Some(result);
        Ok(())
    }

    /// Record the report stage output. Single assignment; advances
    /// `GuidanceDone → ReportDone` (terminal).
    pub fn record_report(&mut self, text: String, confidence: f64) -> Result<(), StateError> {
        if self.report_text.is_some() {
            return Err(StateError::AlreadyAssigned { field: "report_text" });
        }
        if !(0.0..=1.0).contains(&confidence) || confidence.is_nan() {
            return Err(StateError::ConfidenceOutOfRange(confidence));
        }
        self.advance(PipelinePhase::GuidanceDone, PipelinePhase::ReportDone)?;
        self.report_text = Some(text);
        self.confidence_score = confidence;
        Ok(())
    }

    fn advance(&mut self, expected: PipelinePhase, next: PipelinePhase) -> Result<(), StateError> {
        if self.phase != expected {
            return Err(StateError::PhaseOrder {
                from: self.phase,
                to: next,
            });
        }
        self.phase = next;
        Ok(())
    }

    /// Append a stage diagnostic to the error trail.
    ///
    /// A non-empty trail signals a degraded (not failed) response.
    pub fn push_error(&mut self, stage: &str, message: impl AsRef<str>) {
        self.errors.push(format!("{}: {}", stage, message.as_ref()));
    }

    pub fn vision(&self) -> Option<&VisionResult> {
        self.vision_result.as_ref()
    }

    pub fn guidance(&self) -> Option<&GuidanceResult> {
        self.guidance_result.as_ref()
    }

    pub fn report_text(&self) -> Option<&str> {
        self.report_text.as_deref()
    }

    pub fn confidence_score(&self) -> f64 {
        self.confidence_score
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Consume the terminal state into its stage outputs.
    ///
    /// Returns `(vision, guidance, report_text, confidence, errors)` with
    /// degraded placeholders for anything a buggy caller left unwritten.
    pub fn into_parts(self) -> (VisionResult, GuidanceResult, String, f64, Vec<String>) {
        (
            self.vision_result.unwrap_or_else(VisionResult::degraded),
            self.guidance_result.unwrap_or_else(GuidanceResult::degraded),
            self.report_text.unwrap_or_default(),
            self.confidence_score,
            self.errors,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
