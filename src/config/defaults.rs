//! System-wide default constants.
//!
//! Centralises the magic numbers of the diagnostic pipeline so every stage and
//! its tests read thresholds from one place. Grouped by subsystem.

// ============================================================================
// Vision Stage
// ============================================================================

/// Confidence reported by the simulated vision classifier on a successful pass.
pub const SIMULATED_VISION_CONFIDENCE: f64 = 0.85;

/// Number of ranked defects reported per matched equipment type.
pub const DEFECTS_PER_MATCH: usize = 2;

// ============================================================================
// Guidance Stage
// ============================================================================

/// Passages retrieved from the document store per guidance query.
pub const RETRIEVAL_TOP_K: usize = 3;

/// Upper bound on actionable steps in a guidance result.
pub const MAX_GUIDANCE_STEPS: usize = 5;

/// Confidence when guidance is grounded in retrieved passages.
pub const GUIDANCE_NOMINAL_CONFIDENCE: f64 = 0.85;

/// Confidence when the store returned zero passages and the generic
/// fallback steps were used instead.
pub const GUIDANCE_NO_CONTEXT_CONFIDENCE: f64 = 0.3;

// ============================================================================
// Report Stage
// ============================================================================

/// Token budget passed to the text-generation backend for the report summary.
pub const GENERATION_MAX_TOKENS: usize = 256;

/// Sampling temperature for report summary generation.
pub const GENERATION_TEMPERATURE: f64 = 0.2;

// ============================================================================
// Prediction Stage - nominal sensor baselines
// ============================================================================

/// Nominal operating temperature (°C).
pub const NOMINAL_TEMPERATURE_C: f64 = 65.0;

/// Nominal vibration level (mm/s).
pub const NOMINAL_VIBRATION_MM_S: f64 = 2.5;

/// Nominal line pressure (PSI).
pub const NOMINAL_PRESSURE_PSI: f64 = 45.0;

/// Temperature span that maps to a full-scale risk contribution (°C).
pub const TEMPERATURE_RISK_SPAN_C: f64 = 20.0;

/// Vibration span that maps to a full-scale risk contribution (mm/s).
pub const VIBRATION_RISK_SPAN_MM_S: f64 = 2.0;

/// Pressure span that maps to a full-scale risk contribution (PSI).
pub const PRESSURE_RISK_SPAN_PSI: f64 = 15.0;

/// Rule-based risk weight for temperature deviation.
pub const TEMPERATURE_RISK_WEIGHT: f64 = 0.4;

/// Rule-based risk weight for vibration deviation.
pub const VIBRATION_RISK_WEIGHT: f64 = 0.4;

/// Rule-based risk weight for inverse pressure deviation.
pub const PRESSURE_RISK_WEIGHT: f64 = 0.2;

// ============================================================================
// Prediction Stage - risk tiers and factor thresholds
// ============================================================================

/// Failure probability above which the risk tier is Critical.
pub const RISK_CRITICAL_THRESHOLD: f64 = 0.7;

/// Failure probability above which the risk tier is High.
pub const RISK_HIGH_THRESHOLD: f64 = 0.4;

/// Failure probability above which the risk tier is Medium.
pub const RISK_MEDIUM_THRESHOLD: f64 = 0.2;

/// Temperature above which the high-temperature feature flag is set (°C).
pub const HIGH_TEMPERATURE_C: f64 = 75.0;

/// Vibration above which the high-vibration feature flag is set (mm/s).
pub const HIGH_VIBRATION_MM_S: f64 = 4.0;

/// Vibration above which a contributing factor / bearing check is reported (mm/s).
pub const ELEVATED_VIBRATION_MM_S: f64 = 3.5;

/// Pressure below which a contributing factor / line check is reported (PSI).
pub const LOW_PRESSURE_PSI: f64 = 35.0;

/// Hours since last maintenance after which maintenance is considered overdue.
pub const MAINTENANCE_OVERDUE_HOURS: f64 = 360.0;

/// Equipment age in months after which increased wear is expected.
pub const AGED_EQUIPMENT_MONTHS: f64 = 60.0;

/// Reported confidence when a trained classifier produced the probability.
pub const MODEL_PREDICTION_CONFIDENCE: f64 = 0.85;

/// Reported confidence when the rule-based fallback produced the probability.
pub const RULE_PREDICTION_CONFIDENCE: f64 = 0.60;

// ============================================================================
// Anomaly scan thresholds
// ============================================================================

/// Acceptable temperature band (°C).
pub const TEMPERATURE_BAND_C: (f64, f64) = (40.0, 80.0);

/// Temperature above which an anomaly escalates from Medium to High (°C).
pub const TEMPERATURE_SEVERE_C: f64 = 85.0;

/// Vibration ceiling before an anomaly is raised (mm/s).
pub const VIBRATION_CEILING_MM_S: f64 = 4.5;

/// Acceptable pressure band (PSI).
pub const PRESSURE_BAND_PSI: (f64, f64) = (25.0, 65.0);

// ============================================================================
// Analytics Stage
// ============================================================================

/// Percent-change band within which a metric trend is reported as Stable.
pub const TREND_STABLE_BAND_PERCENT: f64 = 1.0;

/// Relative drift applied across the synthetic telemetry window (15% over the period).
pub const SYNTHETIC_DRIFT_FRACTION: f64 = 0.15;

/// Rolling window (days) compared against the preceding window for trends.
pub const TREND_COMPARISON_WINDOW_DAYS: usize = 7;
