//! Diagnosis Pipeline - linear Vision → Guidance → Report orchestration.
//!
//! The pipeline owns the `WorkflowState` for the lifetime of one request and
//! is the only writer of its error trail. Transitions are strictly linear and
//! unconditional: a stage that degraded still feeds the next stage, because
//! every stage guarantees a well-formed (possibly zero-confidence) result.
//! There is no retry, no skip and no early termination - partial failure is
//! absorbed, not fatal.
//!
//! The only hard-failure path is state corruption (a double write or
//! out-of-order transition, i.e. a pipeline bug). Even then the caller gets a
//! best-effort degraded response rather than silence: user-facing maintenance
//! guidance must never silently disappear.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::types::{
    DiagnosisRequest, DiagnosisResponse, GuidanceResult, StateError, VisionResult, WorkflowState,
    SAFETY_DISCLAIMER,
};

use super::{GuidanceAgent, ReportAgent, VisionAgent};

/// Error-trail labels, one per stage, in execution order.
const VISION_STAGE: &str = "Vision Agent";
const GUIDANCE_STAGE: &str = "Guidance Agent";
const REPORT_STAGE: &str = "Report Agent";

/// Linear diagnosis pipeline with per-stage fault absorption.
pub struct DiagnosisPipeline {
    vision: VisionAgent,
    guidance: GuidanceAgent,
    report: ReportAgent,
    /// Total diagnosis runs completed (including degraded ones).
    runs_completed: AtomicU64,
}

impl DiagnosisPipeline {
    /// Create a pipeline from explicitly constructed stage agents.
    ///
    /// Collaborators (detector, document store, text generator) are injected
    /// into the agents at construction; nothing here is process-global.
    pub fn new(vision: VisionAgent, guidance: GuidanceAgent, report: ReportAgent) -> Self {
        Self {
            vision,
            guidance,
            report,
            runs_completed: AtomicU64::new(0),
        }
    }

    /// Pipeline wired with the in-repo simulated collaborators.
    pub fn simulated() -> Self {
        Self::new(
            VisionAgent::simulated(),
            GuidanceAgent::new(Box::new(crate::context::StaticMaintenanceCorpus)),
            ReportAgent::new(Box::new(crate::llm::TemplateBackend)),
        )
    }

    /// Run one diagnosis request to completion.
    ///
    /// Always returns a response with the full expected shape; a non-empty
    /// `errors` list paired with a lowered confidence is the only signal of
    /// degradation.
    pub async fn diagnose(&self, request: &DiagnosisRequest) -> DiagnosisResponse {
        let request_id = Uuid::new_v4();

        info!(
            %request_id,
            plant_id = %request.plant_id,
            equipment_id = %request.equipment_id,
            "Starting diagnosis pipeline"
        );

        let response = match self.run_stages(request).await {
            Ok(state) => self.finalize(request_id, state),
            Err(err) => {
                error!(%request_id, error = %err, "Pipeline state corruption - returning degraded response");
                degraded_response(request_id, request, &err)
            }
        };

        self.runs_completed.fetch_add(1, Ordering::Relaxed);
        response
    }

    /// Drive the three stages in order, recording outputs and faults.
    ///
    /// Each stage boundary is a suspension point; the state is never left
    /// partially applied across one.
    async fn run_stages(&self, request: &DiagnosisRequest) -> Result<WorkflowState, StateError> {
        let mut state = WorkflowState::new(request);

        let vision_outcome = self
            .vision
            .analyze(state.image_ref.as_deref(), &state.equipment_id)
            .await;
        if let Some(fault) = vision_outcome.fault {
            state.push_error(VISION_STAGE, fault);
        }
        let vision = vision_outcome.output;
        state.record_vision(vision.clone())?;

        let guidance_outcome = self
            .guidance
            .advise(&state.equipment_id, &state.problem_description, &vision.defects)
            .await;
        if let Some(fault) = guidance_outcome.fault {
            state.push_error(GUIDANCE_STAGE, fault);
        }
        let guidance = guidance_outcome.output;
        state.record_guidance(guidance.clone())?;

        let report_outcome = self
            .report
            .compose(
                &state.plant_id,
                &state.equipment_id,
                &state.problem_description,
                &vision,
                &guidance,
            )
            .await;
        if let Some(fault) = report_outcome.fault {
            state.push_error(REPORT_STAGE, fault);
        }
        let (report_text, confidence) = report_outcome.output;
        state.record_report(report_text, confidence)?;

        Ok(state)
    }

    /// Package the terminal state into the response.
    fn finalize(&self, request_id: Uuid, state: WorkflowState) -> DiagnosisResponse {
        if !state.errors().is_empty() {
            warn!(
                %request_id,
                errors = state.errors().len(),
                confidence = state.confidence_score(),
                "Diagnosis completed degraded"
            );
        } else {
            info!(
                %request_id,
                confidence = state.confidence_score(),
                "Diagnosis completed clean"
            );
        }

        let (vision, guidance, report_text, confidence_score, errors) = state.into_parts();

        DiagnosisResponse {
            request_id,
            vision_result: vision,
            guidance_result: guidance,
            report_text,
            confidence_score,
            errors,
            generated_at: Utc::now(),
            safety_disclaimer: SAFETY_DISCLAIMER.to_string(),
        }
    }

    /// Total diagnosis runs completed.
    pub fn runs_completed(&self) -> u64 {
        self.runs_completed.load(Ordering::Relaxed)
    }
}

/// Best-effort response for the catastrophic path: empty results, zero
/// confidence, a single error entry and a fixed-format report.
fn degraded_response(
    request_id: Uuid,
    request: &DiagnosisRequest,
    err: &StateError,
) -> DiagnosisResponse {
    DiagnosisResponse {
        request_id,
        vision_result: VisionResult::degraded(),
        guidance_result: GuidanceResult::degraded(),
        report_text: format!(
            "Diagnosis for {} at {} could not be completed due to an internal \
             system error. Follow standard operating procedures and consult a \
             supervisor.",
            request.equipment_id, request.plant_id
        ),
        confidence_score: 0.0,
        errors: vec![format!("Pipeline: {err}")],
        generated_at: Utc::now(),
        safety_disclaimer: SAFETY_DISCLAIMER.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> DiagnosisRequest {
        DiagnosisRequest {
            plant_id: "PUNE-IN".to_string(),
            equipment_id: "CNC-A-102".to_string(),
            problem_description: "Machine overheating".to_string(),
            image_ref: Some("img-001".to_string()),
        }
    }

    #[tokio::test]
    async fn test_simulated_pipeline_completes_clean() {
        let pipeline = DiagnosisPipeline::simulated();
        let response = pipeline.diagnose(&request()).await;

        assert!(response.errors.is_empty());
        assert!((0.0..=1.0).contains(&response.confidence_score));
        assert!(!response.vision_result.defects.is_empty());
        assert!(!response.guidance_result.steps.is_empty());
        assert!(!response.report_text.is_empty());
        assert_eq!(pipeline.runs_completed(), 1);
    }

    #[tokio::test]
    async fn test_confidence_is_mean_of_stage_confidences() {
        let pipeline = DiagnosisPipeline::simulated();
        let response = pipeline.diagnose(&request()).await;

        let expected = (response.vision_result.confidence + response.guidance_result.confidence)
            / 2.0;
        assert_eq!(response.confidence_score, expected);
    }

    #[tokio::test]
    async fn test_request_ids_are_unique_per_run() {
        let pipeline = DiagnosisPipeline::simulated();
        let first = pipeline.diagnose(&request()).await;
        let second = pipeline.diagnose(&request()).await;
        assert_ne!(first.request_id, second.request_id);
        assert_eq!(pipeline.runs_completed(), 2);
    }

    #[tokio::test]
    async fn test_degraded_response_shape() {
        let response = degraded_response(
            Uuid::new_v4(),
            &request(),
            &StateError::AlreadyAssigned { field: "vision_result" },
        );

        assert!(response.vision_result.defects.is_empty());
        assert_eq!(response.confidence_score, 0.0);
        assert_eq!(response.errors.len(), 1);
        assert!(response.report_text.contains("CNC-A-102"));
        assert!(response.report_text.contains("internal system error"));
    }
}
