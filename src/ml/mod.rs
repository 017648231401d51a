//! Trained-classifier seam and feature engineering for failure prediction.
//!
//! The prediction agent runs in one of two modes selected at construction
//! time: model-backed (a `FailureClassifier` implementation is provided) or
//! rule-based fallback (no classifier). Feature engineering here must stay in
//! lockstep with the offline training pipeline that produced the model.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::defaults::{
    HIGH_TEMPERATURE_C, HIGH_VIBRATION_MM_S, MAINTENANCE_OVERDUE_HOURS,
};
use crate::types::SensorSnapshot;

/// Engineered feature vector for the failure classifier.
///
/// Raw signals plus the interaction terms the model was trained with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FeatureVector {
    pub temperature_avg: f64,
    pub vibration_avg: f64,
    pub pressure_avg: f64,
    pub hours_since_maintenance: f64,
    pub equipment_age_months: f64,
    pub cycles_completed: f64,
    pub load_factor: f64,

    // Engineered interaction terms (must match training)
    pub temp_vibration_interaction: f64,
    pub high_temp_low_pressure: f64,
    pub maintenance_overdue: f64,
    pub high_temperature_flag: f64,
    pub high_vibration_flag: f64,
}

impl FeatureVector {
    /// Featurize a sensor snapshot exactly as the training pipeline does.
    pub fn from_snapshot(snapshot: &SensorSnapshot) -> Self {
        let flag = |condition: bool| if condition { 1.0 } else { 0.0 };

        Self {
            temperature_avg: snapshot.temperature_avg,
            vibration_avg: snapshot.vibration_avg,
            pressure_avg: snapshot.pressure_avg,
            hours_since_maintenance: snapshot.hours_since_maintenance,
            equipment_age_months: snapshot.equipment_age_months,
            cycles_completed: snapshot.cycles_completed,
            load_factor: snapshot.load_factor,
            temp_vibration_interaction: snapshot.temperature_avg * snapshot.vibration_avg,
            high_temp_low_pressure: flag(
                snapshot.temperature_avg > 70.0 && snapshot.pressure_avg < 40.0,
            ),
            maintenance_overdue: flag(
                snapshot.hours_since_maintenance > MAINTENANCE_OVERDUE_HOURS,
            ),
            high_temperature_flag: flag(snapshot.temperature_avg > HIGH_TEMPERATURE_C),
            high_vibration_flag: flag(snapshot.vibration_avg > HIGH_VIBRATION_MM_S),
        }
    }
}

/// Trait for trained failure classifiers.
///
/// The in-process deployment loads a serialized model behind this trait; tests
/// script it. Absence of an implementation selects the rule-based fallback in
/// the prediction agent.
#[async_trait]
pub trait FailureClassifier: Send + Sync {
    /// Failure probability in [0, 1] for the engineered features.
    async fn predict_proba(&self, features: &FeatureVector) -> Result<f64>;

    /// Model name for logging and the `model_used` response field.
    fn model_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_terms() {
        let snapshot = SensorSnapshot {
            temperature_avg: 78.5,
            vibration_avg: 3.8,
            pressure_avg: 38.0,
            hours_since_maintenance: 400.0,
            ..SensorSnapshot::default()
        };

        let features = FeatureVector::from_snapshot(&snapshot);
        assert!((features.temp_vibration_interaction - 78.5 * 3.8).abs() < 1e-12);
        assert_eq!(features.high_temp_low_pressure, 1.0);
        assert_eq!(features.maintenance_overdue, 1.0);
        assert_eq!(features.high_temperature_flag, 1.0);
        // 3.8 mm/s is elevated but below the 4.0 flag threshold
        assert_eq!(features.high_vibration_flag, 0.0);
    }

    #[test]
    fn test_nominal_snapshot_sets_no_flags() {
        let features = FeatureVector::from_snapshot(&SensorSnapshot::default());
        assert_eq!(features.high_temp_low_pressure, 0.0);
        assert_eq!(features.maintenance_overdue, 0.0);
        assert_eq!(features.high_temperature_flag, 0.0);
        assert_eq!(features.high_vibration_flag, 0.0);
    }
}
