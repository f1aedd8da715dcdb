//! Weight-driven unit-count estimation for a single product.
//!
//! The combination search resolves its single-product tuples through
//! [`estimate_count`]; only multi-product pairs need a wider count search.

use crate::catalog::Product;

/// Result of estimating how many units of one product explain an observed
/// weight change.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CountEstimate {
    /// Most plausible integer count. Zero when the product weight is
    /// unknown or the observed weight rounds to no units.
    pub count: u32,
    /// Whether `count` units match the observed weight within the product's
    /// category tolerance. Requires `count >= 1`.
    pub within_tolerance: bool,
    /// Absolute difference between observed and expected weight, grams.
    pub error_g: f64,
}

/// Estimate the unit count of `product` that best explains `observed_g`
/// grams of absolute weight change.
///
/// `count = round(observed / unit_weight)`; the match is within tolerance
/// when the residual error does not exceed `expected * tolerance`. Products
/// with unknown weight (`unit_weight_g == 0`) are ineligible and always
/// report `count = 0`, `within_tolerance = false`.
pub fn estimate_count(product: &Product, observed_g: f64) -> CountEstimate {
    if !product.has_known_weight() {
        return CountEstimate {
            count: 0,
            within_tolerance: false,
            error_g: observed_g,
        };
    }

    let count = (observed_g / product.unit_weight_g).round().max(0.0) as u32;
    let expected_g = count as f64 * product.unit_weight_g;
    let error_g = (observed_g - expected_g).abs();
    let within_tolerance = count >= 1 && error_g <= expected_g * product.tolerance();

    CountEstimate {
        count,
        within_tolerance,
        error_g,
    }
}
