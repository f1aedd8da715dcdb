/// Bounds and thresholds of the judgment pipeline.
///
/// Defaults are the product constants; construct with `Default` and override
/// individual fields as needed. None of these adapt at runtime.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct JudgeConfig {
    /// Candidates retained per camera and after ensembling.
    pub top_k: usize,
    /// Maximum unit count per product in a combination.
    pub max_count_per_product: u32,
    /// Hand-to-product gating distance in pixels.
    pub hand_max_distance_px: f32,
    /// Weight changes below this magnitude are treated as "no change", grams.
    pub min_delta_weight_g: f64,
    /// Per-extra-camera score multiplier for classes seen in several views.
    pub cross_view_bonus: f32,
    /// Minimum top fused score for a `complete` classification.
    pub complete_min_score: f32,
    /// Gate product detections on hand proximity before ranking.
    pub use_hand_filter: bool,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            max_count_per_product: 5,
            hand_max_distance_px: 150.0,
            min_delta_weight_g: 5.0,
            cross_view_bonus: 0.15,
            complete_min_score: 0.40,
            use_hand_filter: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_product_constants() {
        let config = JudgeConfig::default();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.max_count_per_product, 5);
        assert_eq!(config.hand_max_distance_px, 150.0);
        assert_eq!(config.min_delta_weight_g, 5.0);
        assert!((config.cross_view_bonus - 0.15).abs() < 1e-6);
        assert!((config.complete_min_score - 0.40).abs() < 1e-6);
        assert!(config.use_hand_filter);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: JudgeConfig = serde_json::from_str(r#"{"top_k": 3}"#).unwrap();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.max_count_per_product, 5);
    }
}
