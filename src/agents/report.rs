//! Report Agent - structured incident report composition.
//!
//! The aggregate confidence is the exact arithmetic mean of the vision and
//! guidance confidences. The report body is template-composed (summary,
//! findings, recommended actions, priority); the narrative summary sentence is
//! requested from the text-generation backend. If generation fails, the stage
//! returns a short fixed-format error report with confidence 0.0 and signals
//! the fault - it never raises.

use tracing::debug;

use crate::config::defaults::{GENERATION_MAX_TOKENS, GENERATION_TEMPERATURE};
use crate::llm::TextGenerator;
use crate::types::{GuidanceResult, StageOutcome, VisionResult};

/// Report stage output: the rendered text plus the aggregate confidence.
pub type ComposedReport = (String, f64);

/// Report stage: packages the pipeline's findings into technician-facing prose.
pub struct ReportAgent {
    generator: Box<dyn TextGenerator>,
}

impl ReportAgent {
    pub fn new(generator: Box<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Compose the incident report. Never raises to the pipeline.
    pub async fn compose(
        &self,
        plant_id: &str,
        equipment_id: &str,
        problem_description: &str,
        vision: &VisionResult,
        guidance: &GuidanceResult,
    ) -> StageOutcome<ComposedReport> {
        let confidence = (vision.confidence + guidance.confidence) / 2.0;

        let prompt = summary_prompt(plant_id, equipment_id, problem_description, vision, guidance);
        match self
            .generator
            .generate(&prompt, GENERATION_MAX_TOKENS, GENERATION_TEMPERATURE)
            .await
        {
            Ok(summary) => {
                debug!(
                    equipment_id,
                    backend = self.generator.backend_name(),
                    confidence,
                    "Report composition complete"
                );
                let text = render_report(
                    plant_id,
                    equipment_id,
                    problem_description,
                    vision,
                    guidance,
                    &summary,
                    confidence,
                );
                StageOutcome::clean((text, confidence))
            }
            Err(err) => StageOutcome::degraded(
                (error_report(plant_id, equipment_id), 0.0),
                format!("report generation failed: {err}"),
            ),
        }
    }
}

/// Prompt for the narrative summary. First line carries the subject so canned
/// backends can ground their output.
fn summary_prompt(
    plant_id: &str,
    equipment_id: &str,
    problem_description: &str,
    vision: &VisionResult,
    guidance: &GuidanceResult,
) -> String {
    format!(
        "{equipment_id} at {plant_id}\n\
         Reported problem: {problem_description}\n\
         Detected defects: {}\n\
         Guidance steps: {}\n\
         Write a two-sentence incident summary for a maintenance technician.",
        vision.defects.join(", "),
        guidance.steps.len(),
    )
}

/// Implied priority from the findings.
///
/// Confident defect findings demand prompt attention; a clean confident pass
/// is routine; anything low-confidence needs a human review.
fn implied_priority(vision: &VisionResult, guidance: &GuidanceResult) -> &'static str {
    let confidence = (vision.confidence + guidance.confidence) / 2.0;
    if confidence < 0.5 {
        "Review required (low confidence)"
    } else if vision.defects.is_empty() {
        "Routine"
    } else {
        "High"
    }
}

fn render_report(
    plant_id: &str,
    equipment_id: &str,
    problem_description: &str,
    vision: &VisionResult,
    guidance: &GuidanceResult,
    summary: &str,
    confidence: f64,
) -> String {
    let mut report = String::new();

    report.push_str(&format!("Incident Report: {equipment_id} at {plant_id}\n\n"));
    report.push_str(&format!("Summary: {summary}\n"));
    report.push_str(&format!("Reported problem: {problem_description}\n\n"));

    report.push_str(&format!(
        "Findings (vision confidence {:.2}):\n",
        vision.confidence
    ));
    if vision.defects.is_empty() {
        report.push_str("  - No visible defects detected.\n");
    } else {
        for defect in &vision.defects {
            report.push_str(&format!("  - {defect}\n"));
        }
    }

    report.push_str(&format!(
        "\nRecommended actions (guidance confidence {:.2}):\n",
        guidance.confidence
    ));
    for (idx, step) in guidance.steps.iter().enumerate() {
        report.push_str(&format!("  {}. {step}\n", idx + 1));
    }
    if !guidance.cited_sources.is_empty() {
        report.push_str(&format!("Sources: {}\n", guidance.cited_sources.join(", ")));
    }

    report.push_str(&format!(
        "\nPriority: {}\nOverall confidence: {confidence:.2}\n",
        implied_priority(vision, guidance)
    ));

    report
}

/// Short fixed-format report for the degraded path.
fn error_report(plant_id: &str, equipment_id: &str) -> String {
    format!(
        "Incident report unavailable for {equipment_id} at {plant_id}: report \
         composition failed. Follow standard operating procedures and consult \
         a supervisor."
    )
}

// ============================================================================
// Tests
// ============================================================================
