//! Request/response envelope for one diagnosis run.
//!
//! Validation, authentication and transport headers are owned by the embedding
//! service; the core receives already-validated values and returns plain data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{GuidanceResult, VisionResult};

/// Fixed disclaimer attached to every diagnosis response.
pub const SAFETY_DISCLAIMER: &str =
    "Always follow standard safety procedures and consult a supervisor if unsure.";

/// Validated inputs for the main diagnosis pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiagnosisRequest {
    /// Plant identifier, e.g. "PUNE-IN" or "MEX-GTO".
    pub plant_id: String,
    /// Tag or ID of the equipment, e.g. "CNC-A-102".
    pub equipment_id: String,
    /// Technician's description of the issue.
    pub problem_description: String,
    /// Reference to an uploaded image for visual inspection, if any.
    pub image_ref: Option<String>,
}

/// Combined output of the Vision → Guidance → Report pipeline.
///
/// The response always has this full shape; a non-empty `errors` list paired
/// with a lowered `confidence_score` is the only signal of degradation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisResponse {
    pub request_id: Uuid,
    pub vision_result: VisionResult,
    pub guidance_result: GuidanceResult,
    pub report_text: String,
    /// Overall confidence in the recommendation, always in [0, 1].
    pub confidence_score: f64,
    /// Per-stage diagnostics in stage execution order. Informational metadata,
    /// never a transport failure.
    pub errors: Vec<String>,
    pub generated_at: DateTime<Utc>,
    pub safety_disclaimer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_roundtrips_through_json() {
        let request = DiagnosisRequest {
            plant_id: "PUNE-IN".to_string(),
            equipment_id: "CNC-A-102".to_string(),
            problem_description: "Machine overheating".to_string(),
            image_ref: Some("img-001".to_string()),
        };

        let json = serde_json::to_string(&request).unwrap();
        let back: DiagnosisRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }
}
