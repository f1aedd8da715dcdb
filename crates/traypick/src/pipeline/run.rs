//! Decision engine: filtering, ensembling, weight matching, classification.

use std::collections::BTreeMap;

use crate::catalog::ProductCatalog;
use crate::combination::{match_combinations, CombinationMatch};
use crate::detection::Detection;
use crate::ensemble::{ensemble_views, Candidate};
use crate::extract::top_k_by_confidence;
use crate::hand_filter::filter_by_hand_proximity;

use super::result::wall_clock_seconds;
use super::{DecisionResult, DecisionStatus, JudgeConfig, JudgedProduct, WeightInfo};

/// Decide which catalog products explain the observed detections and weight
/// change.
///
/// The pipeline never fails for domain-valid input: every outcome is a
/// [`DecisionResult`] carrying a [`DecisionStatus`]. Detections are gated on
/// hand proximity per camera, ranked, ensembled across views, and the
/// resulting candidates are matched against `|delta_weight_g|` by the
/// combination search.
pub fn judge(
    detections: &[Detection],
    delta_weight_g: f64,
    catalog: &ProductCatalog,
    config: &JudgeConfig,
) -> DecisionResult {
    let observed_g = delta_weight_g.abs();

    tracing::info!(
        "judging {} detections, delta {:.1} g",
        detections.len(),
        delta_weight_g,
    );

    // Partition by camera tag; untagged detections form a single unnamed
    // view. BTreeMap keeps view order deterministic.
    let mut views: BTreeMap<String, Vec<Detection>> = BTreeMap::new();
    for det in detections {
        views
            .entry(det.camera.clone().unwrap_or_default())
            .or_default()
            .push(det.clone());
    }

    let ranked: Vec<(String, Vec<Detection>)> = views
        .into_iter()
        .map(|(camera, dets)| {
            let products = if config.use_hand_filter {
                filter_by_hand_proximity(&dets, config.hand_max_distance_px)
            } else {
                dets.into_iter().filter(|d| !d.is_hand()).collect()
            };
            (camera, top_k_by_confidence(products, config.top_k))
        })
        .collect();

    let candidates = ensemble_views(&ranked, catalog, config.cross_view_bonus, config.top_k);

    if observed_g < config.min_delta_weight_g {
        tracing::info!(
            "weight change {:.1} g below {:.1} g floor; no_detection",
            observed_g,
            config.min_delta_weight_g,
        );
        return DecisionResult::no_detection(delta_weight_g);
    }
    if candidates.is_empty() {
        tracing::info!("no candidates after ensembling; no_detection");
        return DecisionResult::no_detection(delta_weight_g);
    }

    let Some(best) = match_combinations(&candidates, catalog, observed_g, config) else {
        tracing::info!("no weight-eligible candidate; no_detection");
        return DecisionResult::no_detection(delta_weight_g);
    };

    let status = classify(&best, &candidates, observed_g, config);
    tracing::info!(
        "matched {} line(s), expected {:.1} g, error {:.1} g -> {:?}",
        best.lines.len(),
        best.expected_g,
        best.error_g,
        status,
    );

    build_result(status, &best, catalog, delta_weight_g, observed_g)
}

/// Classify the matcher outcome into a decision status.
///
/// `complete` needs a within-tolerance match and a trusted top candidate.
/// `partial` covers near-misses: either the error stays within twice the
/// combined tolerance, or the combination explains at least half of the
/// observed weight.
fn classify(
    best: &CombinationMatch,
    candidates: &[Candidate],
    observed_g: f64,
    config: &JudgeConfig,
) -> DecisionStatus {
    let top_score = candidates
        .first()
        .map(|c| c.fused_score)
        .unwrap_or_default();

    if best.within_tolerance && top_score >= config.complete_min_score {
        return DecisionStatus::Complete;
    }
    if !best.within_tolerance {
        let near_tolerance = best.error_g <= 2.0 * best.tolerance_g;
        let explains_half = best.expected_g >= 0.5 * observed_g;
        if near_tolerance || explains_half {
            return DecisionStatus::Partial;
        }
    }
    DecisionStatus::Uncertain
}

fn build_result(
    status: DecisionStatus,
    best: &CombinationMatch,
    catalog: &ProductCatalog,
    delta_weight_g: f64,
    observed_g: f64,
) -> DecisionResult {
    let mut lines = best.lines.clone();
    lines.sort_by(|a, b| {
        b.fused_score
            .total_cmp(&a.fused_score)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });

    let products: Vec<JudgedProduct> = lines
        .iter()
        .filter_map(|line| {
            let Some(product) = catalog.by_id(line.product_id) else {
                tracing::warn!("matched product {} vanished from catalog", line.product_id);
                return None;
            };
            Some(JudgedProduct {
                product_id: product.id,
                name: product.name.clone(),
                count: line.count,
                unit_price: product.unit_price,
                line_price: line.count * product.unit_price,
                confidence: line.fused_score.clamp(0.0, 1.0),
            })
        })
        .collect();

    let total_price = products.iter().map(|p| p.line_price).sum();

    let avg_fused = if lines.is_empty() {
        0.0
    } else {
        lines.iter().map(|l| l.fused_score as f64).sum::<f64>() / lines.len() as f64
    };
    let weight_fit = (1.0 - best.error_g / observed_g.max(1.0)).max(0.0);
    let confidence = (0.5 * avg_fused + 0.5 * weight_fit).clamp(0.0, 1.0) as f32;

    DecisionResult {
        status,
        products,
        total_price,
        confidence,
        weight_info: WeightInfo {
            delta: delta_weight_g,
            explained: best.expected_g,
            residual: (observed_g - best.expected_g).max(0.0),
        },
        is_removal: delta_weight_g < 0.0,
        timestamp: wall_clock_seconds(),
    }
}
