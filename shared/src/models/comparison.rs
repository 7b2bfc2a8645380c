//! Period-over-period comparison output

use serde::{Deserialize, Serialize};

use super::metrics::MetricResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

/// Change of one metric against the previous window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Comparison {
    /// `percent` is |current - previous| / previous × 100
    Change { percent: f64, direction: Direction },
    /// Previous value was zero or a window had no orders
    NoComparison,
}

impl Comparison {
    pub fn is_comparable(&self) -> bool {
        matches!(self, Self::Change { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonDeltas {
    pub gmv: Comparison,
    pub draft_net: Comparison,
    pub actual_net: Comparison,
    pub total_orders: Comparison,
    pub aov: Comparison,
    pub return_impact: Comparison,
    pub platform_fees: Comparison,
    pub shop_subsidies: Comparison,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodComparison {
    /// YYYY-MM-DD
    pub current_start: String,
    pub current_end: String,
    pub previous_start: String,
    pub previous_end: String,
    pub current: MetricResult,
    pub previous: MetricResult,
    pub deltas: ComparisonDeltas,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_is_tagged() {
        let json = serde_json::to_string(&Comparison::NoComparison).unwrap();
        assert_eq!(json, r#"{"kind":"noComparison"}"#);

        let json = serde_json::to_string(&Comparison::Change {
            percent: 12.5,
            direction: Direction::Down,
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"change","percent":12.5,"direction":"down"}"#);
    }
}
