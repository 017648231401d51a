//! Guidance Agent - retrieval-augmented maintenance guidance.
//!
//! Builds a query from the equipment id, the technician's problem text and the
//! vision defects, retrieves the top-K passages from the document store, and
//! condenses them into at most five actionable steps with their source ids.
//!
//! Degradation ladder:
//! - store returned zero passages → fixed generic steps, no sources, confidence 0.3
//! - store call failed → fixed error steps, no sources, confidence 0.0, fault signaled

use tracing::{debug, warn};

use crate::config::defaults::{
    GUIDANCE_NOMINAL_CONFIDENCE, GUIDANCE_NO_CONTEXT_CONFIDENCE, MAX_GUIDANCE_STEPS,
    RETRIEVAL_TOP_K,
};
use crate::context::{DocumentStore, Passage};
use crate::types::{GuidanceResult, StageOutcome};

/// Closing steps appended after passage-derived steps, up to the step cap.
const CLOSING_STEPS: &[&str] = &[
    "Record observed readings and actions taken in the maintenance log.",
    "Escalate to the maintenance supervisor if the condition persists after these steps.",
];

/// Generic steps when the store had no relevant passages.
const NO_CONTEXT_STEPS: &[&str] = &[
    "Perform a general visual inspection of the equipment and surrounding area.",
    "Consult the equipment's OEM maintenance manual for the reported symptom.",
    "Escalate to the maintenance supervisor if the condition persists or worsens.",
];

/// Fixed steps when retrieval itself failed.
const RETRIEVAL_ERROR_STEPS: &[&str] = &[
    "Stop non-essential operation of the equipment until guidance is available.",
    "Contact the maintenance control room for a manual diagnosis.",
    "Retry the copilot request once the guidance service is restored.",
];

/// Guidance stage: maps (equipment id, problem text, defects) → steps + sources.
pub struct GuidanceAgent {
    store: Box<dyn DocumentStore>,
}

impl GuidanceAgent {
    pub fn new(store: Box<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Produce maintenance guidance. Never raises to the pipeline.
    pub async fn advise(
        &self,
        equipment_id: &str,
        problem_description: &str,
        defects: &[String],
    ) -> StageOutcome<GuidanceResult> {
        let query = build_query(equipment_id, problem_description, defects);

        let passages = match self.store.similarity_search(&query, RETRIEVAL_TOP_K).await {
            Ok(passages) => passages,
            Err(err) => {
                return StageOutcome::degraded(
                    GuidanceResult {
                        steps: owned(RETRIEVAL_ERROR_STEPS),
                        cited_sources: Vec::new(),
                        confidence: 0.0,
                    },
                    format!("document retrieval failed: {err}"),
                );
            }
        };

        if passages.is_empty() {
            warn!(
                equipment_id,
                store = self.store.store_name(),
                "No passages retrieved - using generic guidance fallback"
            );
            return StageOutcome::clean(GuidanceResult {
                steps: owned(NO_CONTEXT_STEPS),
                cited_sources: Vec::new(),
                confidence: GUIDANCE_NO_CONTEXT_CONFIDENCE,
            });
        }

        debug!(
            equipment_id,
            store = self.store.store_name(),
            passages = passages.len(),
            "Guidance retrieval complete"
        );

        StageOutcome::clean(GuidanceResult {
            steps: condense(&passages),
            cited_sources: cited_sources(&passages),
            confidence: GUIDANCE_NOMINAL_CONFIDENCE,
        })
    }
}

/// Query text combining every signal we have about the incident.
fn build_query(equipment_id: &str, problem_description: &str, defects: &[String]) -> String {
    let mut query = format!("{equipment_id} {problem_description}");
    for defect in defects {
        query.push(' ');
        query.push_str(defect);
    }
    query
}

/// Condense retrieved passages into at most [`MAX_GUIDANCE_STEPS`] steps.
///
/// One step per passage in retrieval order, then standard closing steps up to
/// the cap. Passage contents are written as actionable instructions, so the
/// condensation is a selection rather than a rewrite.
fn condense(passages: &[Passage]) -> Vec<String> {
    passages
        .iter()
        .map(|p| p.content.clone())
        .chain(CLOSING_STEPS.iter().map(|s| (*s).to_string()))
        .take(MAX_GUIDANCE_STEPS)
        .collect()
}

/// Source ids in retrieval order, deduplicated.
fn cited_sources(passages: &[Passage]) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    for passage in passages {
        if !sources.contains(&passage.source_id) {
            sources.push(passage.source_id.clone());
        }
    }
    sources
}

fn owned(steps: &[&str]) -> Vec<String> {
    steps.iter().map(|s| (*s).to_string()).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{NoOpStore, StaticMaintenanceCorpus};
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    struct FailingStore;

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn similarity_search(&self, _: &str, _: usize) -> Result<Vec<Passage>> {
            Err(anyhow!("index unreachable"))
        }

        fn store_name(&self) -> &'static str {
            "Failing"
        }
    }

    fn defects() -> Vec<String> {
        vec!["micro-fracture".to_string(), "surface-discoloration".to_string()]
    }

    #[tokio::test]
    async fn test_nominal_guidance_cites_sources() {
        let agent = GuidanceAgent::new(Box::new(StaticMaintenanceCorpus));
        let outcome = agent
            .advise("CNC-A-102", "Machine overheating", &defects())
            .await;

        assert!(!outcome.is_degraded());
        let guidance = outcome.output;
        assert!(!guidance.steps.is_empty());
        assert!(guidance.steps.len() <= MAX_GUIDANCE_STEPS);
        assert!(!guidance.cited_sources.is_empty());
        assert_eq!(guidance.confidence, GUIDANCE_NOMINAL_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_zero_passages_falls_back_with_lowered_confidence() {
        let agent = GuidanceAgent::new(Box::new(NoOpStore));
        let outcome = agent.advise("CNC-A-102", "overheating", &defects()).await;

        // Edge case, not a fault: signal is the lowered confidence
        assert!(!outcome.is_degraded());
        let guidance = outcome.output;
        assert_eq!(guidance.steps.len(), 3);
        assert!(guidance.cited_sources.is_empty());
        assert_eq!(guidance.confidence, GUIDANCE_NO_CONTEXT_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_store_failure_degrades_with_zero_confidence() {
        let agent = GuidanceAgent::new(Box::new(FailingStore));
        let outcome = agent.advise("CNC-A-102", "overheating", &defects()).await;

        assert!(outcome.is_degraded());
        let guidance = outcome.output;
        assert_eq!(guidance.steps.len(), 3);
        assert!(guidance.cited_sources.is_empty());
        assert_eq!(guidance.confidence, 0.0);
    }

    #[tokio::test]
    async fn test_steps_are_deterministic_for_fixed_store() {
        let agent = GuidanceAgent::new(Box::new(StaticMaintenanceCorpus));
        let first = agent.advise("CNC-A-102", "overheating", &defects()).await.output;
        let second = agent.advise("CNC-A-102", "overheating", &defects()).await.output;
        assert_eq!(first, second);
    }

    #[test]
    fn test_condense_caps_at_five_steps() {
        let passages: Vec<Passage> = (0..4)
            .map(|i| Passage {
                content: format!("step {i}"),
                source_id: format!("DOC-{i}"),
            })
            .collect();

        let steps = condense(&passages);
        assert_eq!(steps.len(), MAX_GUIDANCE_STEPS);
        // Retrieval order preserved, closing steps fill the remainder
        assert_eq!(steps[0], "step 0");
        assert_eq!(steps[4], CLOSING_STEPS[0]);
    }

    #[test]
    fn test_cited_sources_dedup_preserves_order() {
        let passages = vec![
            Passage { content: "a".into(), source_id: "SOP-123".into() },
            Passage { content: "b".into(), source_id: "MAINT-GUIDE-V2".into() },
            Passage { content: "c".into(), source_id: "SOP-123".into() },
        ];

        assert_eq!(cited_sources(&passages), vec!["SOP-123", "MAINT-GUIDE-V2"]);
    }
}
