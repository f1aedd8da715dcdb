//! Decision result types.

use std::time::{SystemTime, UNIX_EPOCH};

/// Outcome classification of one judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    /// The weight change is fully explained within tolerance and the top
    /// candidate is trusted.
    Complete,
    /// The chosen combination explains the weight change only partly.
    Partial,
    /// A combination exists but neither explains the weight well nor comes
    /// close enough to tolerance.
    Uncertain,
    /// No candidates, or the weight change was below the reporting floor.
    NoDetection,
}

impl DecisionStatus {
    /// `true` for outcomes the caller should act on.
    pub fn is_success(self) -> bool {
        matches!(self, DecisionStatus::Complete | DecisionStatus::Partial)
    }
}

/// One judged product line.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct JudgedProduct {
    pub product_id: u32,
    pub name: String,
    /// Unit count, always >= 1.
    pub count: u32,
    /// Unit price in currency minor units.
    pub unit_price: u32,
    /// `count * unit_price`.
    pub line_price: u32,
    /// Vision confidence clipped to [0, 1].
    pub confidence: f32,
}

/// Weight accounting for one judgment.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WeightInfo {
    /// Signed tray weight change as received, grams; negative = removal.
    pub delta: f64,
    /// Grams accounted for by the chosen combination.
    pub explained: f64,
    /// `max(0, |delta| - explained)`, grams.
    pub residual: f64,
}

/// Final decision for one request.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DecisionResult {
    pub status: DecisionStatus,
    /// Judged products, fused-score descending. Empty iff `no_detection`.
    pub products: Vec<JudgedProduct>,
    /// Sum of line prices.
    pub total_price: u32,
    /// Overall decision confidence in [0, 1].
    pub confidence: f32,
    pub weight_info: WeightInfo,
    /// `delta < 0`: items were removed from the tray.
    pub is_removal: bool,
    /// Wall-clock seconds at decision construction.
    pub timestamp: f64,
}

impl DecisionResult {
    /// Empty outcome: nothing detected or nothing to report.
    pub fn no_detection(delta: f64) -> Self {
        Self {
            status: DecisionStatus::NoDetection,
            products: Vec::new(),
            total_price: 0,
            confidence: 0.0,
            weight_info: WeightInfo {
                delta,
                explained: 0.0,
                residual: delta.abs(),
            },
            is_removal: delta < 0.0,
            timestamp: wall_clock_seconds(),
        }
    }

    /// `true` iff the status is `complete` or `partial`.
    pub fn success(&self) -> bool {
        self.status.is_success()
    }

    /// Total unit count over all product lines.
    pub fn product_count(&self) -> u32 {
        self.products.iter().map(|p| p.count).sum()
    }
}

pub(crate) fn wall_clock_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_detection_carries_the_delta_in_residual() {
        let result = DecisionResult::no_detection(-42.0);
        assert_eq!(result.status, DecisionStatus::NoDetection);
        assert!(result.products.is_empty());
        assert_eq!(result.weight_info.delta, -42.0);
        assert_eq!(result.weight_info.explained, 0.0);
        assert_eq!(result.weight_info.residual, 42.0);
        assert!(result.is_removal);
        assert!(!result.success());
        assert_eq!(result.product_count(), 0);
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&DecisionStatus::NoDetection).unwrap(),
            r#""no_detection""#
        );
        assert_eq!(
            serde_json::to_string(&DecisionStatus::Complete).unwrap(),
            r#""complete""#
        );
    }

    #[test]
    fn success_covers_complete_and_partial_only() {
        assert!(DecisionStatus::Complete.is_success());
        assert!(DecisionStatus::Partial.is_success());
        assert!(!DecisionStatus::Uncertain.is_success());
        assert!(!DecisionStatus::NoDetection.is_success());
    }

    #[test]
    fn timestamp_is_monotonic_enough() {
        let a = DecisionResult::no_detection(0.0);
        let b = DecisionResult::no_detection(0.0);
        assert!(b.timestamp >= a.timestamp);
        assert!(a.timestamp > 0.0);
    }
}
