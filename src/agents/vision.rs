//! Vision Agent - defect detection from equipment imagery.
//!
//! The detection backend sits behind the [`DefectDetector`] trait. The
//! in-repo [`KeywordDetector`] simulates a vision model deterministically:
//! it classifies the equipment id against a fixed equipment-type table and
//! reports that type's top-ranked defects. A real image model is an external
//! collaborator that plugs in behind the same trait.

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::config::defaults::{DEFECTS_PER_MATCH, SIMULATED_VISION_CONFIDENCE};
use crate::types::{StageOutcome, VisionResult};

// ============================================================================
// Detector seam
// ============================================================================

/// Trait for defect-detection backends.
#[async_trait]
pub trait DefectDetector: Send + Sync {
    /// Detect defects for the referenced image / equipment.
    async fn detect(&self, image_ref: Option<&str>, equipment_id: &str) -> Result<VisionResult>;

    /// Detector name for logging.
    fn detector_name(&self) -> &'static str;
}

/// Equipment-type keyword → ranked defect list.
///
/// First match wins, scanning in table order against the lowercased
/// equipment id. Defects are ranked most-likely first.
const DEFECT_TABLE: &[(&str, &[&str])] = &[
    ("cnc", &["micro-fracture", "surface-discoloration", "tool-wear"]),
    ("pump", &["seal-weep", "housing-corrosion", "impeller-erosion"]),
    ("press", &["hydraulic-residue", "die-misalignment", "frame-stress-marks"]),
    ("conv", &["belt-fraying", "roller-scoring", "tracking-drift"]),
    ("rbt", &["cable-abrasion", "joint-backlash", "mount-loosening"]),
    ("robot", &["cable-abrasion", "joint-backlash", "mount-loosening"]),
];

/// Generic ranked defects when no equipment type matches.
const GENERIC_DEFECTS: &[&str] = &["surface-wear", "minor-corrosion"];

/// Deterministic simulated vision model.
pub struct KeywordDetector;

#[async_trait]
impl DefectDetector for KeywordDetector {
    async fn detect(&self, _image_ref: Option<&str>, equipment_id: &str) -> Result<VisionResult> {
        let id_lower = equipment_id.to_lowercase();

        let ranked = DEFECT_TABLE
            .iter()
            .find(|(keyword, _)| id_lower.contains(keyword))
            .map_or(GENERIC_DEFECTS, |(_, defects)| *defects);

        Ok(VisionResult {
            defects: ranked
                .iter()
                .take(DEFECTS_PER_MATCH)
                .map(|d| (*d).to_string())
                .collect(),
            confidence: SIMULATED_VISION_CONFIDENCE,
        })
    }

    fn detector_name(&self) -> &'static str {
        "KeywordDetector"
    }
}

// ============================================================================
// Agent
// ============================================================================

/// Vision stage: maps (image reference, equipment id) → defects + confidence.
///
/// Never raises to the pipeline. Any detector failure is converted into an
/// empty zero-confidence result with the reason carried in the outcome fault.
pub struct VisionAgent {
    detector: Box<dyn DefectDetector>,
}

impl VisionAgent {
    pub fn new(detector: Box<dyn DefectDetector>) -> Self {
        Self { detector }
    }

    /// Simulated default (keyword classification).
    pub fn simulated() -> Self {
        Self::new(Box::new(KeywordDetector))
    }

    /// Analyze one equipment image reference.
    pub async fn analyze(
        &self,
        image_ref: Option<&str>,
        equipment_id: &str,
    ) -> StageOutcome<VisionResult> {
        match self.detector.detect(image_ref, equipment_id).await {
            Ok(result) => {
                debug!(
                    equipment_id,
                    detector = self.detector.detector_name(),
                    defects = result.defects.len(),
                    confidence = result.confidence,
                    "Vision analysis complete"
                );
                StageOutcome::clean(result)
            }
            Err(err) => StageOutcome::degraded(
                VisionResult::degraded(),
                format!("defect detection failed: {err}"),
            ),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct FailingDetector;

    #[async_trait]
    impl DefectDetector for FailingDetector {
        async fn detect(&self, _: Option<&str>, _: &str) -> Result<VisionResult> {
            Err(anyhow!("model endpoint timed out"))
        }

        fn detector_name(&self) -> &'static str {
            "Failing"
        }
    }

    #[tokio::test]
    async fn test_cnc_maps_to_top_two_ranked_defects() {
        let agent = VisionAgent::simulated();
        let outcome = agent.analyze(Some("img-001"), "CNC-A-102").await;

        assert!(!outcome.is_degraded());
        assert_eq!(
            outcome.output.defects,
            vec!["micro-fracture".to_string(), "surface-discoloration".to_string()]
        );
        assert_eq!(outcome.output.confidence, SIMULATED_VISION_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_unknown_equipment_gets_generic_fallback() {
        let agent = VisionAgent::simulated();
        let outcome = agent.analyze(None, "XYZ-99").await;

        assert_eq!(
            outcome.output.defects,
            vec!["surface-wear".to_string(), "minor-corrosion".to_string()]
        );
        assert_eq!(outcome.output.confidence, SIMULATED_VISION_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_detection_is_deterministic() {
        let agent = VisionAgent::simulated();
        let first = agent.analyze(None, "PUMP-7").await.output;
        let second = agent.analyze(None, "PUMP-7").await.output;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_detector_failure_degrades_never_raises() {
        let agent = VisionAgent::new(Box::new(FailingDetector));
        let outcome = agent.analyze(Some("img-001"), "CNC-A-102").await;

        assert!(outcome.is_degraded());
        assert!(outcome.output.defects.is_empty());
        assert_eq!(outcome.output.confidence, 0.0);
        assert!(outcome.fault.unwrap().contains("timed out"));
    }
}
