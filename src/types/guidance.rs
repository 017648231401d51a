//! Guidance stage output.

use serde::{Deserialize, Serialize};

/// Retrieval-augmented maintenance guidance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuidanceResult {
    /// Actionable steps in presentation order (step 1 before step 2).
    pub steps: Vec<String>,
    /// Source identifiers backing the steps, in retrieval order.
    pub cited_sources: Vec<String>,
    /// Guidance confidence in [0, 1].
    pub confidence: f64,
}

impl GuidanceResult {
    /// Zero-confidence fallback used when the guidance stage fails internally.
    pub fn degraded() -> Self {
        Self {
            steps: Vec::new(),
            cited_sources: Vec::new(),
            confidence: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_result_has_no_sources() {
        let result = GuidanceResult::degraded();
        assert!(result.steps.is_empty());
        assert!(result.cited_sources.is_empty());
        assert_eq!(result.confidence, 0.0);
    }
}
