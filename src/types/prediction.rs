//! Prediction stage types: sensor snapshot, risk tiers, prediction output.

use serde::{Deserialize, Serialize};

use crate::config::defaults::{
    RISK_CRITICAL_THRESHOLD, RISK_HIGH_THRESHOLD, RISK_MEDIUM_THRESHOLD,
};

// ============================================================================
// Sensor snapshot
// ============================================================================

/// Recent sensor averages and equipment metadata for one unit.
///
/// Field defaults mirror the nominal operating profile so a sparse snapshot
/// from the transport layer still featurizes cleanly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SensorSnapshot {
    /// Average spindle/housing temperature (°C).
    pub temperature_avg: f64,
    /// Average vibration (mm/s).
    pub vibration_avg: f64,
    /// Average line pressure (PSI).
    pub pressure_avg: f64,
    /// Hours since the last completed maintenance.
    pub hours_since_maintenance: f64,
    /// Equipment age (months).
    pub equipment_age_months: f64,
    /// Duty cycles completed since commissioning.
    pub cycles_completed: f64,
    /// Current load factor in [0, 1].
    pub load_factor: f64,
}

impl Default for SensorSnapshot {
    fn default() -> Self {
        Self {
            temperature_avg: 65.0,
            vibration_avg: 2.5,
            pressure_avg: 45.0,
            hours_since_maintenance: 168.0,
            equipment_age_months: 24.0,
            cycles_completed: 1000.0,
            load_factor: 0.8,
        }
    }
}

// ============================================================================
// Risk tier
// ============================================================================

/// Ordinal classification bucketing a failure probability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    /// Bucket a probability into a tier.
    ///
    /// Boundaries are strict: exactly 0.7 is High, exactly 0.4 is Medium,
    /// exactly 0.2 is Low.
    pub fn from_probability(probability: f64) -> Self {
        if probability > RISK_CRITICAL_THRESHOLD {
            RiskTier::Critical
        } else if probability > RISK_HIGH_THRESHOLD {
            RiskTier::High
        } else if probability > RISK_MEDIUM_THRESHOLD {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Low => write!(f, "Low"),
            RiskTier::Medium => write!(f, "Medium"),
            RiskTier::High => write!(f, "High"),
            RiskTier::Critical => write!(f, "Critical"),
        }
    }
}

// ============================================================================
// Prediction result
// ============================================================================

/// Failure-risk prediction for one equipment unit.
///
/// Both prediction modes (trained classifier, rule-based fallback) produce
/// this same shape so callers are mode-agnostic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub equipment_id: String,
    /// Failure probability over the prediction horizon, in [0, 1].
    pub probability: f64,
    pub risk_tier: RiskTier,
    /// Human-readable contributing factors, most significant first.
    pub factors: Vec<String>,
    /// Maintenance recommendations: tier block first, sensor add-ons after.
    pub recommendations: Vec<String>,
    /// Confidence in the prediction itself (model vs. rule path).
    pub confidence: f64,
    /// Label of the path that produced the probability.
    pub model_used: String,
    /// Prediction horizon, e.g. "7 days".
    pub time_horizon: String,
}

// ============================================================================
// Anomaly scan
// ============================================================================

/// Severity of a single out-of-band sensor reading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AnomalySeverity {
    Medium,
    High,
}

/// One out-of-band sensor reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorAnomaly {
    pub sensor: String,
    pub value: f64,
    /// Human-readable acceptable band, e.g. "40-80 °C".
    pub expected_range: String,
    pub severity: AnomalySeverity,
}

/// Threshold-scan result over a sensor snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub equipment_id: String,
    pub anomaly_detected: bool,
    /// Fraction of monitored sensors out of band, in [0, 1].
    pub anomaly_score: f64,
    pub anomalies: Vec<SensorAnomaly>,
}

// ============================================================================
// Tests
// ============================================================================
