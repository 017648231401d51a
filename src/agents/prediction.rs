//! Prediction Agent - failure-risk scoring for one equipment unit.
//!
//! Two modes, selected at construction time:
//! - **Model-backed**: featurize the snapshot and ask the trained classifier.
//! - **Rule-based fallback**: weighted linear combination of temperature
//!   deviation, vibration deviation and inverse pressure deviation from the
//!   nominal baselines, clipped to [0, 1].
//!
//! Both modes produce the same [`PredictionResult`] shape so callers are
//! mode-agnostic. A classifier error at call time falls back to the rule
//! score for that call rather than failing the request.

use tracing::{info, warn};

use crate::config::defaults::{
    AGED_EQUIPMENT_MONTHS, ELEVATED_VIBRATION_MM_S, HIGH_TEMPERATURE_C, LOW_PRESSURE_PSI,
    MAINTENANCE_OVERDUE_HOURS, MODEL_PREDICTION_CONFIDENCE, NOMINAL_PRESSURE_PSI,
    NOMINAL_TEMPERATURE_C, NOMINAL_VIBRATION_MM_S, PRESSURE_BAND_PSI, PRESSURE_RISK_SPAN_PSI,
    PRESSURE_RISK_WEIGHT, RULE_PREDICTION_CONFIDENCE, TEMPERATURE_BAND_C, TEMPERATURE_RISK_SPAN_C,
    TEMPERATURE_RISK_WEIGHT, TEMPERATURE_SEVERE_C, VIBRATION_CEILING_MM_S,
    VIBRATION_RISK_SPAN_MM_S, VIBRATION_RISK_WEIGHT,
};
use crate::ml::{FailureClassifier, FeatureVector};
use crate::types::{
    AnomalyReport, AnomalySeverity, PredictionResult, RiskTier, SensorAnomaly, SensorSnapshot,
};

/// Prediction horizon reported with every result.
const TIME_HORIZON: &str = "7 days";

/// Label reported for the rule-based path.
const RULE_MODEL_LABEL: &str = "Rule-based fallback";

/// Prediction stage, independent of the main diagnosis pipeline.
pub struct PredictionAgent {
    classifier: Option<Box<dyn FailureClassifier>>,
}

impl PredictionAgent {
    /// Model-backed mode.
    pub fn with_classifier(classifier: Box<dyn FailureClassifier>) -> Self {
        Self {
            classifier: Some(classifier),
        }
    }

    /// Rule-based fallback mode (no trained model available).
    pub fn rule_based() -> Self {
        Self { classifier: None }
    }

    /// Predict failure risk for one unit.
    pub async fn predict(
        &self,
        equipment_id: &str,
        snapshot: &SensorSnapshot,
    ) -> PredictionResult {
        let (probability, confidence, model_used) = match &self.classifier {
            Some(classifier) => {
                let features = FeatureVector::from_snapshot(snapshot);
                match classifier.predict_proba(&features).await {
                    Ok(proba) => (
                        proba.clamp(0.0, 1.0),
                        MODEL_PREDICTION_CONFIDENCE,
                        classifier.model_name().to_string(),
                    ),
                    Err(err) => {
                        warn!(
                            equipment_id,
                            model = classifier.model_name(),
                            error = %err,
                            "Classifier unavailable - falling back to rule-based score"
                        );
                        (
                            rule_score(snapshot),
                            RULE_PREDICTION_CONFIDENCE,
                            RULE_MODEL_LABEL.to_string(),
                        )
                    }
                }
            }
            None => (
                rule_score(snapshot),
                RULE_PREDICTION_CONFIDENCE,
                RULE_MODEL_LABEL.to_string(),
            ),
        };

        let risk_tier = RiskTier::from_probability(probability);

        info!(
            equipment_id,
            probability,
            tier = %risk_tier,
            model = %model_used,
            "Failure prediction complete"
        );

        PredictionResult {
            equipment_id: equipment_id.to_string(),
            probability,
            risk_tier,
            factors: contributing_factors(snapshot, probability),
            recommendations: recommendations(risk_tier, snapshot),
            confidence,
            model_used,
            time_horizon: TIME_HORIZON.to_string(),
        }
    }

    /// Threshold scan over the snapshot, independent of the risk model.
    pub fn detect_anomaly(&self, equipment_id: &str, snapshot: &SensorSnapshot) -> AnomalyReport {
        let mut anomalies = Vec::new();

        let (temp_low, temp_high) = TEMPERATURE_BAND_C;
        if snapshot.temperature_avg > temp_high || snapshot.temperature_avg < temp_low {
            anomalies.push(SensorAnomaly {
                sensor: "temperature".to_string(),
                value: snapshot.temperature_avg,
                expected_range: format!("{temp_low:.0}-{temp_high:.0} °C"),
                severity: if snapshot.temperature_avg > TEMPERATURE_SEVERE_C {
                    AnomalySeverity::High
                } else {
                    AnomalySeverity::Medium
                },
            });
        }

        if snapshot.vibration_avg > VIBRATION_CEILING_MM_S {
            anomalies.push(SensorAnomaly {
                sensor: "vibration".to_string(),
                value: snapshot.vibration_avg,
                expected_range: format!("<{VIBRATION_CEILING_MM_S} mm/s"),
                severity: AnomalySeverity::High,
            });
        }

        let (pres_low, pres_high) = PRESSURE_BAND_PSI;
        if snapshot.pressure_avg < pres_low || snapshot.pressure_avg > pres_high {
            anomalies.push(SensorAnomaly {
                sensor: "pressure".to_string(),
                value: snapshot.pressure_avg,
                expected_range: format!("{pres_low:.0}-{pres_high:.0} PSI"),
                severity: AnomalySeverity::Medium,
            });
        }

        // Score normalized over the three monitored sensors
        #[allow(clippy::cast_precision_loss)]
        let anomaly_score = anomalies.len() as f64 / 3.0;

        AnomalyReport {
            equipment_id: equipment_id.to_string(),
            anomaly_detected: !anomalies.is_empty(),
            anomaly_score,
            anomalies,
        }
    }
}

/// Rule-based failure score.
///
/// `0.4·ΔT/20 + 0.4·ΔV/2 + 0.2·(−ΔP)/15`, deviations from the nominal
/// baselines, clipped to [0, 1].
fn rule_score(snapshot: &SensorSnapshot) -> f64 {
    let temperature_term =
        (snapshot.temperature_avg - NOMINAL_TEMPERATURE_C) / TEMPERATURE_RISK_SPAN_C;
    let vibration_term =
        (snapshot.vibration_avg - NOMINAL_VIBRATION_MM_S) / VIBRATION_RISK_SPAN_MM_S;
    let pressure_term =
        (NOMINAL_PRESSURE_PSI - snapshot.pressure_avg) / PRESSURE_RISK_SPAN_PSI;

    (TEMPERATURE_RISK_WEIGHT * temperature_term
        + VIBRATION_RISK_WEIGHT * vibration_term
        + PRESSURE_RISK_WEIGHT * pressure_term)
        .clamp(0.0, 1.0)
}

/// Human-readable contributing factors, most significant first.
fn contributing_factors(snapshot: &SensorSnapshot, probability: f64) -> Vec<String> {
    let mut factors = Vec::new();

    if snapshot.temperature_avg > HIGH_TEMPERATURE_C {
        let deviation =
            (snapshot.temperature_avg - NOMINAL_TEMPERATURE_C) / NOMINAL_TEMPERATURE_C * 100.0;
        factors.push(format!(
            "Elevated temperature ({:.1} °C, {deviation:.0}% above nominal)",
            snapshot.temperature_avg
        ));
    }

    if snapshot.vibration_avg > ELEVATED_VIBRATION_MM_S {
        let deviation =
            (snapshot.vibration_avg - NOMINAL_VIBRATION_MM_S) / NOMINAL_VIBRATION_MM_S * 100.0;
        factors.push(format!(
            "High vibration levels ({:.2} mm/s, {deviation:.0}% above nominal)",
            snapshot.vibration_avg
        ));
    }

    if snapshot.pressure_avg < LOW_PRESSURE_PSI {
        let deviation =
            (NOMINAL_PRESSURE_PSI - snapshot.pressure_avg) / NOMINAL_PRESSURE_PSI * 100.0;
        factors.push(format!(
            "Low pressure readings ({:.1} PSI, {deviation:.0}% below nominal)",
            snapshot.pressure_avg
        ));
    }

    if snapshot.hours_since_maintenance > MAINTENANCE_OVERDUE_HOURS {
        let days = snapshot.hours_since_maintenance / 24.0;
        factors.push(format!(
            "Maintenance overdue ({days:.0} days since last maintenance)"
        ));
    }

    if snapshot.equipment_age_months > AGED_EQUIPMENT_MONTHS {
        let years = snapshot.equipment_age_months / 12.0;
        factors.push(format!(
            "Equipment age ({years:.1} years, increased wear expected)"
        ));
    }

    if factors.is_empty() {
        if probability > 0.5 {
            factors.push(
                "Multiple sensor readings trending toward failure patterns".to_string(),
            );
        } else {
            factors.push("All parameters within normal operating range".to_string());
        }
    }

    factors
}

/// Tier-specific recommendation block plus sensor-specific add-ons.
fn recommendations(tier: RiskTier, snapshot: &SensorSnapshot) -> Vec<String> {
    let mut recs: Vec<String> = match tier {
        RiskTier::Critical => vec![
            "URGENT: Schedule immediate inspection within 24 hours.".to_string(),
            "Consider stopping equipment if safety is at risk.".to_string(),
            "Prepare replacement parts and backup equipment.".to_string(),
        ],
        RiskTier::High => vec![
            "Schedule maintenance within 3 days.".to_string(),
            "Increase monitoring frequency to hourly checks.".to_string(),
            "Review recent operational logs for anomalies.".to_string(),
        ],
        RiskTier::Medium => vec![
            "Plan preventive maintenance within 7 days.".to_string(),
            "Continue standard monitoring.".to_string(),
            "Document current readings for trend analysis.".to_string(),
        ],
        RiskTier::Low => vec![
            "Equipment operating normally.".to_string(),
            "Continue routine maintenance schedule.".to_string(),
            "Monitor as per standard operating procedures.".to_string(),
        ],
    };

    if snapshot.temperature_avg > HIGH_TEMPERATURE_C {
        recs.push("Check cooling system: inspect coolant levels and filters.".to_string());
    }
    if snapshot.vibration_avg > ELEVATED_VIBRATION_MM_S {
        recs.push("Inspect bearings and mounting bolts for wear or looseness.".to_string());
    }
    if snapshot.pressure_avg < LOW_PRESSURE_PSI {
        recs.push("Check hydraulic/pneumatic lines for leaks or blockages.".to_string());
    }

    recs
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    struct ScriptedClassifier(f64);

    #[async_trait]
    impl FailureClassifier for ScriptedClassifier {
        async fn predict_proba(&self, _: &FeatureVector) -> Result<f64> {
            Ok(self.0)
        }

        fn model_name(&self) -> &'static str {
            "Scripted"
        }
    }

    struct FailingClassifier;

    #[async_trait]
    impl FailureClassifier for FailingClassifier {
        async fn predict_proba(&self, _: &FeatureVector) -> Result<f64> {
            Err(anyhow!("model file missing"))
        }

        fn model_name(&self) -> &'static str {
            "Failing"
        }
    }

    fn degraded_snapshot() -> SensorSnapshot {
        SensorSnapshot {
            temperature_avg: 78.5,
            vibration_avg: 3.8,
            pressure_avg: 38.0,
            hours_since_maintenance: 400.0,
            ..SensorSnapshot::default()
        }
    }

    #[test]
    fn test_rule_score_reference_snapshot() {
        // 0.4·(13.5/20) + 0.4·(1.3/2) + 0.2·(7/15) ≈ 0.6233
        let score = rule_score(&degraded_snapshot());
        assert!((score - 0.623_333).abs() < 1e-4, "got {score}");
    }

    #[tokio::test]
    async fn test_rule_based_prediction_is_deterministic_high_tier() {
        let agent = PredictionAgent::rule_based();
        let first = agent.predict("CNC-A-102", &degraded_snapshot()).await;
        let second = agent.predict("CNC-A-102", &degraded_snapshot()).await;

        assert_eq!(first.risk_tier, RiskTier::High);
        assert_eq!(first.probability, second.probability);
        assert_eq!(first.factors, second.factors);
        assert_eq!(first.confidence, RULE_PREDICTION_CONFIDENCE);
        assert_eq!(first.model_used, RULE_MODEL_LABEL);
    }

    #[tokio::test]
    async fn test_nominal_snapshot_is_low_risk() {
        let agent = PredictionAgent::rule_based();
        let result = agent.predict("CNC-A-102", &SensorSnapshot::default()).await;

        assert_eq!(result.risk_tier, RiskTier::Low);
        assert_eq!(result.probability, 0.0);
        assert_eq!(
            result.factors,
            vec!["All parameters within normal operating range".to_string()]
        );
    }

    #[tokio::test]
    async fn test_model_mode_same_shape_as_rule_mode() {
        let model_agent = PredictionAgent::with_classifier(Box::new(ScriptedClassifier(0.9)));
        let result = model_agent.predict("CNC-A-102", &degraded_snapshot()).await;

        assert_eq!(result.risk_tier, RiskTier::Critical);
        assert_eq!(result.confidence, MODEL_PREDICTION_CONFIDENCE);
        assert_eq!(result.model_used, "Scripted");
        assert!(!result.factors.is_empty());
        assert!(!result.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_classifier_failure_falls_back_to_rule_score() {
        let agent = PredictionAgent::with_classifier(Box::new(FailingClassifier));
        let result = agent.predict("CNC-A-102", &degraded_snapshot()).await;

        assert_eq!(result.risk_tier, RiskTier::High);
        assert_eq!(result.confidence, RULE_PREDICTION_CONFIDENCE);
        assert_eq!(result.model_used, RULE_MODEL_LABEL);
    }

    #[tokio::test]
    async fn test_probability_clamped_from_misbehaving_model() {
        let agent = PredictionAgent::with_classifier(Box::new(ScriptedClassifier(1.7)));
        let result = agent.predict("CNC-A-102", &SensorSnapshot::default()).await;
        assert_eq!(result.probability, 1.0);
        assert_eq!(result.risk_tier, RiskTier::Critical);
    }

    #[tokio::test]
    async fn test_sensor_specific_recommendations_appended() {
        let agent = PredictionAgent::rule_based();
        let result = agent.predict("CNC-A-102", &degraded_snapshot()).await;

        assert!(result.recommendations.iter().any(|r| r.contains("cooling")));
        assert!(result.recommendations.iter().any(|r| r.contains("bearings")));
        // 38.0 PSI is above the 35 PSI factor threshold, no line-check add-on
        assert!(!result.recommendations.iter().any(|r| r.contains("hydraulic")));
    }

    #[test]
    fn test_anomaly_scan_flags_out_of_band_sensors() {
        let agent = PredictionAgent::rule_based();
        let snapshot = SensorSnapshot {
            temperature_avg: 86.0,
            vibration_avg: 5.0,
            pressure_avg: 45.0,
            ..SensorSnapshot::default()
        };

        let report = agent.detect_anomaly("CNC-A-102", &snapshot);
        assert!(report.anomaly_detected);
        assert_eq!(report.anomalies.len(), 2);
        assert!((report.anomaly_score - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(report.anomalies[0].severity, AnomalySeverity::High);
    }

    #[test]
    fn test_anomaly_scan_clean_snapshot() {
        let agent = PredictionAgent::rule_based();
        let report = agent.detect_anomaly("CNC-A-102", &SensorSnapshot::default());
        assert!(!report.anomaly_detected);
        assert_eq!(report.anomaly_score, 0.0);
        assert!(report.anomalies.is_empty());
    }
}
