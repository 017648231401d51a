//! Vision stage output.

use serde::{Deserialize, Serialize};

/// Defects detected on an equipment image.
///
/// `defects` ordering is not significant to consumers, but the simulated
/// classifier emits a stable ranked order so repeated runs are reproducible.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisionResult {
    pub defects: Vec<String>,
    /// Classifier confidence in [0, 1].
    pub confidence: f64,
}

impl VisionResult {
    /// Zero-confidence fallback used when the vision stage fails internally.
    pub fn degraded() -> Self {
        Self {
            defects: Vec::new(),
            confidence: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_result_is_empty_and_zero_confidence() {
        let result = VisionResult::degraded();
        assert!(result.defects.is_empty());
        assert_eq!(result.confidence, 0.0);
    }
}
