//! Bounded combinatorial weight matching.
//!
//! Explains an observed weight change as an integer combination of one or
//! two candidate products. Single-product counts come from the count
//! calculator (the rounded count is the only one that can win); pairs are
//! searched brute-force over the cartesian count range, a few hundred
//! tuples at the configured bounds, so the choice stays deterministic.
//! Subsets of three or more distinct products are not searched: three
//! different items in one grasp is both rare and ambiguous to the weight
//! signal.

use std::cmp::Ordering;

use crate::catalog::{Category, Product, ProductCatalog};
use crate::count::estimate_count;
use crate::ensemble::Candidate;
use crate::pipeline::JudgeConfig;

/// Maximum number of distinct products in one combination.
pub const MAX_SUBSET_SIZE: usize = 2;

/// One product line of a weight-matching combination.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CombinationLine {
    pub product_id: u32,
    pub name: String,
    /// Unit count, always >= 1.
    pub count: u32,
    /// Fused vision score of the originating candidate (comparison-only).
    pub fused_score: f32,
}

/// Best-scoring combination found for one observed weight.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CombinationMatch {
    pub lines: Vec<CombinationLine>,
    /// `sum(count * unit_weight)` over the lines, grams.
    pub expected_g: f64,
    /// `|observed - expected|`, grams.
    pub error_g: f64,
    /// `sum(count * unit_weight * tolerance)` over the lines, grams.
    /// Per-item and additive: small items never inherit a large item's
    /// looser bound.
    pub tolerance_g: f64,
    /// `error_g <= tolerance_g`.
    pub within_tolerance: bool,
    /// Ranking score; higher is better. Comparison-only.
    pub score: f64,
}

impl CombinationMatch {
    /// Total unit count over all lines.
    pub fn total_count(&self) -> u32 {
        self.lines.iter().map(|line| line.count).sum()
    }
}

/// Search one- and two-product integer combinations explaining `observed_g`.
///
/// Single-product counts are taken from [`estimate_count`]; pair counts are
/// enumerated over the full allowed range. Returns the best tuple by score,
/// or `None` when no candidate has a positive unit weight or every tuple
/// overshoots the observed weight. Ordering is deterministic: score
/// descending, then fewer distinct products (prefer singletons), then
/// smaller total count, then smaller error, then ascending product ids.
pub fn match_combinations(
    candidates: &[Candidate],
    catalog: &ProductCatalog,
    observed_g: f64,
    config: &JudgeConfig,
) -> Option<CombinationMatch> {
    let eligible: Vec<(&Candidate, &Product)> = candidates
        .iter()
        .filter_map(|candidate| {
            let product = catalog.by_id(candidate.product_id)?;
            product.has_known_weight().then_some((candidate, product))
        })
        .collect();

    if eligible.is_empty() {
        tracing::debug!("combination matcher: no weight-eligible candidates");
        return None;
    }

    let max_count = config.max_count_per_product.max(1);
    let mut best: Option<CombinationMatch> = None;
    let mut evaluated = 0usize;

    // Singletons: the count calculator names each candidate's most
    // plausible count, clamped to the per-product cap.
    for &(candidate, product) in &eligible {
        let estimate = estimate_count(product, observed_g);
        let count = estimate.count.min(max_count);
        if count == 0 {
            continue;
        }
        evaluated += 1;
        consider(
            &mut best,
            evaluate(&[(candidate, product, count)], observed_g),
        );
    }

    // Unordered pairs of distinct products.
    for i in 0..eligible.len() {
        for j in (i + 1)..eligible.len() {
            let (cand_a, prod_a) = eligible[i];
            let (cand_b, prod_b) = eligible[j];
            for count_a in 1..=max_count {
                for count_b in 1..=max_count {
                    evaluated += 1;
                    consider(
                        &mut best,
                        evaluate(
                            &[(cand_a, prod_a, count_a), (cand_b, prod_b, count_b)],
                            observed_g,
                        ),
                    );
                }
            }
        }
    }

    if let Some(ref m) = best {
        tracing::debug!(
            "combination matcher: {} tuples evaluated, best score {:.3}, error {:.1} g",
            evaluated,
            m.score,
            m.error_g,
        );
    }
    best
}

fn consider(best: &mut Option<CombinationMatch>, tuple: Option<CombinationMatch>) {
    let Some(tuple) = tuple else { return };
    match best {
        Some(current) if compare_matches(current, &tuple) != Ordering::Greater => {}
        _ => *best = Some(tuple),
    }
}

fn evaluate(
    items: &[(&Candidate, &Product, u32)],
    observed_g: f64,
) -> Option<CombinationMatch> {
    let mut expected_g = 0.0;
    let mut tolerance_g = 0.0;
    let mut rank_score = 0.0f64;
    for &(candidate, product, count) in items {
        let line_weight = count as f64 * product.unit_weight_g;
        expected_g += line_weight;
        tolerance_g += line_weight * product.tolerance();
        rank_score += candidate.fused_score as f64;
    }
    // Degenerate tuples explain nothing.
    if expected_g <= 0.0 {
        return None;
    }

    let error_g = (observed_g - expected_g).abs();
    let within_tolerance = error_g <= tolerance_g;
    // A combination heavier than the observed change cannot explain it.
    // Beyond the accounting ceiling the overshoot is rejected outright,
    // even when the combination's own (looser) tolerance still covers it;
    // below the ceiling it is rejected when it misses that tolerance.
    if expected_g > observed_g * (1.0 + Category::MAX_TOLERANCE) {
        return None;
    }
    if expected_g > observed_g && !within_tolerance {
        return None;
    }
    let score = if within_tolerance { 10.0 } else { 0.0 } + rank_score
        - error_g / observed_g.max(1.0);

    Some(CombinationMatch {
        lines: items
            .iter()
            .map(|&(candidate, product, count)| CombinationLine {
                product_id: product.id,
                name: product.name.clone(),
                count,
                fused_score: candidate.fused_score,
            })
            .collect(),
        expected_g,
        error_g,
        tolerance_g,
        within_tolerance,
        score,
    })
}

fn compare_matches(a: &CombinationMatch, b: &CombinationMatch) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.lines.len().cmp(&b.lines.len()))
        .then_with(|| a.total_count().cmp(&b.total_count()))
        .then_with(|| a.error_g.total_cmp(&b.error_g))
        .then_with(|| {
            let ids_a: Vec<u32> = a.lines.iter().map(|l| l.product_id).collect();
            let ids_b: Vec<u32> = b.lines.iter().map(|l| l.product_id).collect();
            ids_a.cmp(&ids_b)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(product_id: u32, fused_score: f32) -> Candidate {
        Candidate {
            product_id,
            name: format!("class_{product_id}"),
            fused_score,
            cameras: vec!["top".to_string()],
        }
    }

    fn setup() -> (ProductCatalog, JudgeConfig) {
        (ProductCatalog::default(), JudgeConfig::default())
    }

    #[test]
    fn single_exact_match_wins() {
        let (catalog, config) = setup();
        let candidates = vec![candidate(26, 0.49)]; // chickenmayo_rice, 365 g
        let best = match_combinations(&candidates, &catalog, 365.0, &config).unwrap();
        assert_eq!(best.lines.len(), 1);
        assert_eq!(best.lines[0].product_id, 26);
        assert_eq!(best.lines[0].count, 1);
        assert_eq!(best.expected_g, 365.0);
        assert_eq!(best.error_g, 0.0);
        assert!(best.within_tolerance);
    }

    #[test]
    fn multi_count_single_product() {
        let (catalog, config) = setup();
        let candidates = vec![candidate(9, 0.85)]; // vita500, 130 g
        let best = match_combinations(&candidates, &catalog, 260.0, &config).unwrap();
        assert_eq!(best.lines[0].count, 2);
        assert!(best.within_tolerance);
    }

    #[test]
    fn pair_explains_what_no_single_can() {
        let (catalog, config) = setup();
        // chickenmayo_rice (365 g) + vita500 (130 g) = 495 g exactly.
        let candidates = vec![candidate(26, 0.49), candidate(9, 0.45)];
        let best = match_combinations(&candidates, &catalog, 495.0, &config).unwrap();
        assert_eq!(best.lines.len(), 2);
        assert!(best.within_tolerance);
        assert_eq!(best.error_g, 0.0);
        let mut ids: Vec<u32> = best.lines.iter().map(|l| l.product_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![9, 26]);
        // Additive per-item tolerance: 365*0.08 + 130*0.05.
        assert!((best.tolerance_g - (365.0 * 0.08 + 130.0 * 0.05)).abs() < 1e-9);
    }

    #[test]
    fn out_of_tolerance_tuple_is_still_returned() {
        let (catalog, config) = setup();
        let candidates = vec![candidate(26, 0.49)];
        let best = match_combinations(&candidates, &catalog, 500.0, &config).unwrap();
        assert_eq!(best.lines[0].count, 1);
        assert!(!best.within_tolerance);
        assert!((best.error_g - 135.0).abs() < 1e-9);
        assert!(best.score < 10.0);
    }

    #[test]
    fn weight_unknown_candidates_yield_none() {
        let (catalog, config) = setup();
        // Only a class id absent from the catalog: nothing to match.
        let candidates = vec![candidate(9999, 0.9)];
        assert!(match_combinations(&candidates, &catalog, 365.0, &config).is_none());
    }

    #[test]
    fn empty_candidates_yield_none() {
        let (catalog, config) = setup();
        assert!(match_combinations(&[], &catalog, 365.0, &config).is_none());
    }

    #[test]
    fn within_tolerance_beats_higher_rank_score_outside() {
        let (catalog, config) = setup();
        // 130 g observed: vita500 (130 g) fits exactly even though the
        // other candidate carries a much higher fused score.
        let candidates = vec![candidate(26, 0.95), candidate(9, 0.20)];
        let best = match_combinations(&candidates, &catalog, 130.0, &config).unwrap();
        assert_eq!(best.lines.len(), 1);
        assert_eq!(best.lines[0].product_id, 9);
        assert!(best.within_tolerance);
    }

    #[test]
    fn pair_of_candidates_outscores_a_double_of_one() {
        let (catalog, config) = setup();
        // twix 50 g and protein_bar 50 g at 100 g observed: twix x2 and the
        // 1+1 pair both match the weight exactly, but the pair carries the
        // rank score of both candidates and wins. The choice is stable
        // across runs.
        let candidates = vec![candidate(22, 0.5), candidate(43, 0.5)];
        let best = match_combinations(&candidates, &catalog, 100.0, &config).unwrap();
        assert_eq!(best.lines.len(), 2);
        assert_eq!(best.total_count(), 2);
        let rerun = match_combinations(&candidates, &catalog, 100.0, &config).unwrap();
        assert_eq!(best, rerun);
    }

    #[test]
    fn overshooting_combinations_are_discarded() {
        let (catalog, config) = setup();
        // The only candidate weighs far more than the observed change;
        // a heavier-than-observed tuple explains nothing.
        let candidates = vec![candidate(26, 0.9)]; // 365 g
        assert!(match_combinations(&candidates, &catalog, 60.0, &config).is_none());
    }

    #[test]
    fn overshoot_within_its_own_tolerance_still_hits_the_ceiling() {
        let (catalog, config) = setup();
        // wet_tissue: 50 g, etc category (15%). At 42.5 g observed the
        // single-unit tuple lands exactly on its own tolerance
        // (error 7.5 == 50 * 0.15) yet explains 50 g, more than
        // 42.5 * (1 + MAX_TOLERANCE) = 48.875 g can account for.
        let candidates = vec![candidate(50, 0.9)];
        assert!(match_combinations(&candidates, &catalog, 42.5, &config).is_none());
    }

    #[test]
    fn counts_beyond_the_cap_are_clamped() {
        let (catalog, config) = setup();
        // 800 g of vita500 (130 g) rounds to six units; the cap is five.
        let candidates = vec![candidate(9, 0.85)];
        let best = match_combinations(&candidates, &catalog, 800.0, &config).unwrap();
        assert_eq!(best.lines[0].count, 5);
        assert_eq!(best.expected_g, 650.0);
        assert!(!best.within_tolerance);
    }

    #[test]
    fn equal_scores_break_ties_on_product_ids() {
        let (catalog, config) = setup();
        // twix (id 22) and protein_bar (id 43) both weigh 50 g with a 10%
        // tolerance; at 50 g observed their singleton tuples tie exactly.
        let candidates = vec![candidate(43, 0.5), candidate(22, 0.5)];
        let best = match_combinations(&candidates, &catalog, 50.0, &config).unwrap();
        assert_eq!(best.lines.len(), 1);
        assert_eq!(best.lines[0].product_id, 22);
    }
}
