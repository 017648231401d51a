//! Analytics stage types: time ranges, metric trends, comparison and KPI output.
//!
//! The essential contract other components rely on is the *shape* of these
//! records (named metrics with current value, trend direction and insights),
//! not the specific numeric values, which come from a synthetic telemetry
//! source until a real historian is wired in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::defaults::TREND_STABLE_BAND_PERCENT;

// ============================================================================
// Time range
// ============================================================================

/// Analysis window for trend and KPI queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    Last7Days,
    #[default]
    Last30Days,
    Last90Days,
}

impl TimeRange {
    /// Window length in days.
    pub fn days(self) -> usize {
        match self {
            TimeRange::Last7Days => 7,
            TimeRange::Last30Days => 30,
            TimeRange::Last90Days => 90,
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeRange::Last7Days => write!(f, "last_7_days"),
            TimeRange::Last30Days => write!(f, "last_30_days"),
            TimeRange::Last90Days => write!(f, "last_90_days"),
        }
    }
}

impl std::str::FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last_7_days" => Ok(TimeRange::Last7Days),
            "last_30_days" => Ok(TimeRange::Last30Days),
            "last_90_days" => Ok(TimeRange::Last90Days),
            other => Err(format!("unknown time range '{other}'")),
        }
    }
}

// ============================================================================
// Metric trends
// ============================================================================

/// Direction of a metric versus the previous comparison window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    /// Classify a percent change: within ±1% is Stable, else Up/Down per sign.
    pub fn from_percent_change(percent_change: f64) -> Self {
        if percent_change > TREND_STABLE_BAND_PERCENT {
            TrendDirection::Up
        } else if percent_change < -TREND_STABLE_BAND_PERCENT {
            TrendDirection::Down
        } else {
            TrendDirection::Stable
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Up => write!(f, "Up"),
            TrendDirection::Down => write!(f, "Down"),
            TrendDirection::Stable => write!(f, "Stable"),
        }
    }
}

/// One named metric with its current value and trend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricTrend {
    pub current: f64,
    pub unit: String,
    pub direction: TrendDirection,
    /// Change versus the previous comparison window, in percent.
    pub percent_change: f64,
}

/// Trend analysis for one equipment unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsResult {
    pub equipment_id: String,
    pub time_range: TimeRange,
    pub period_days: usize,
    /// Metric name → trend. BTreeMap keeps iteration order stable for
    /// reproducible rendering.
    pub metrics: BTreeMap<String, MetricTrend>,
    pub insights: Vec<String>,
    /// Where the numbers came from, e.g. "synthetic".
    pub data_source: String,
}

// ============================================================================
// Fleet comparison
// ============================================================================

/// Metric used for comparative ranking across units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMetric {
    Uptime,
    Temperature,
    DefectRate,
}

impl ComparisonMetric {
    /// Whether larger values of this metric indicate better performance.
    pub fn higher_is_better(self) -> bool {
        matches!(self, ComparisonMetric::Uptime)
    }

    pub fn unit(self) -> &'static str {
        match self {
            ComparisonMetric::Uptime | ComparisonMetric::DefectRate => "%",
            ComparisonMetric::Temperature => "°C",
        }
    }
}

impl std::fmt::Display for ComparisonMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparisonMetric::Uptime => write!(f, "uptime"),
            ComparisonMetric::Temperature => write!(f, "temperature"),
            ComparisonMetric::DefectRate => write!(f, "defect_rate"),
        }
    }
}

/// One unit's value within a comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedEquipment {
    pub equipment_id: String,
    pub value: f64,
    pub unit: String,
}

/// Comparative ranking of equipment units on one metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub metric: ComparisonMetric,
    /// Best performer first.
    pub ranking: Vec<RankedEquipment>,
    pub best_performer: String,
    pub worst_performer: String,
    pub average: f64,
    pub std_deviation: f64,
    pub recommendation: String,
}

// ============================================================================
// Plant KPIs
// ============================================================================

/// Status of a KPI versus its target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum KpiStatus {
    AboveTarget,
    OnTarget,
    NeedsAttention,
}

/// One plant KPI with its target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kpi {
    pub value: f64,
    pub unit: String,
    pub target: f64,
    pub status: KpiStatus,
}

/// KPI summary for a plant over a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiSummary {
    pub plant_id: String,
    pub period: TimeRange,
    pub kpis: BTreeMap<String, Kpi>,
    pub overall_status: String,
    pub areas_of_concern: Vec<String>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_direction_stable_band() {
        assert_eq!(TrendDirection::from_percent_change(0.0), TrendDirection::Stable);
        assert_eq!(TrendDirection::from_percent_change(1.0), TrendDirection::Stable);
        assert_eq!(TrendDirection::from_percent_change(-1.0), TrendDirection::Stable);
        assert_eq!(TrendDirection::from_percent_change(1.01), TrendDirection::Up);
        assert_eq!(TrendDirection::from_percent_change(-1.01), TrendDirection::Down);
    }

    #[test]
    fn test_time_range_parse_and_days() {
        let range: TimeRange = "last_7_days".parse().unwrap();
        assert_eq!(range, TimeRange::Last7Days);
        assert_eq!(range.days(), 7);
        assert_eq!(TimeRange::Last90Days.days(), 90);
        assert!("yesterday".parse::<TimeRange>().is_err());
    }

    #[test]
    fn test_comparison_metric_polarity() {
        assert!(ComparisonMetric::Uptime.higher_is_better());
        assert!(!ComparisonMetric::Temperature.higher_is_better());
        assert!(!ComparisonMetric::DefectRate.higher_is_better());
    }
}
