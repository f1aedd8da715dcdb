//! Multi-view candidate ensembling.
//!
//! Individual low-confidence detector outputs are unreliable; the same class
//! seen from several cameras is much stronger evidence than one high score
//! in a single view. The ensemble fuses per-camera ranked lists into a
//! single candidate list, boosting classes with cross-view agreement.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::catalog::ProductCatalog;
use crate::detection::Detection;

/// An ensembled product hypothesis eligible for combination matching.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Candidate {
    /// Catalog product id (the detector's class-id namespace).
    pub product_id: u32,
    /// Canonical catalog name.
    pub name: String,
    /// Cross-view fused score. May exceed 1.0 after the multi-view bonus;
    /// comparison-only.
    pub fused_score: f32,
    /// Camera tags in which the class was observed.
    pub cameras: Vec<String>,
}

/// Fuse per-camera top-K lists into at most `k` ranked candidates.
///
/// Per class, the base score is the maximum confidence over all views; a
/// class seen in `n >= 2` views gets `base * (1 + bonus * (n - 1))`.
/// Hand detections and classes absent from the catalog are discarded.
/// Output is sorted by fused score descending, ties by product id ascending.
pub fn ensemble_views(
    views: &[(String, Vec<Detection>)],
    catalog: &ProductCatalog,
    cross_view_bonus: f32,
    k: usize,
) -> Vec<Candidate> {
    struct ClassEvidence {
        base_score: f32,
        cameras: Vec<String>,
    }

    let mut per_class: BTreeMap<u32, ClassEvidence> = BTreeMap::new();
    for (camera, detections) in views {
        let mut seen_in_view: Vec<u32> = Vec::new();
        for det in detections {
            if det.is_hand() {
                continue;
            }
            let evidence = per_class.entry(det.class_id).or_insert(ClassEvidence {
                base_score: 0.0,
                cameras: Vec::new(),
            });
            evidence.base_score = evidence.base_score.max(det.confidence);
            if !seen_in_view.contains(&det.class_id) {
                seen_in_view.push(det.class_id);
                evidence.cameras.push(camera.clone());
            }
        }
    }

    let mut candidates: Vec<Candidate> = per_class
        .into_iter()
        .filter_map(|(class_id, evidence)| {
            let product = match catalog.by_id(class_id) {
                Some(p) => p,
                None => {
                    tracing::debug!("dropping detection class {class_id}: not in catalog");
                    return None;
                }
            };
            let n_views = evidence.cameras.len();
            let fused_score = if n_views >= 2 {
                evidence.base_score * (1.0 + cross_view_bonus * (n_views as f32 - 1.0))
            } else {
                evidence.base_score
            };
            Some(Candidate {
                product_id: class_id,
                name: product.name.clone(),
                fused_score,
                cameras: evidence.cameras,
            })
        })
        .collect();

    candidates.sort_by(compare_candidates);
    candidates.truncate(k.min(candidates.len()));

    tracing::debug!(
        "ensemble: {} candidates from {} views",
        candidates.len(),
        views.len(),
    );
    candidates
}

fn compare_candidates(a: &Candidate, b: &Candidate) -> Ordering {
    b.fused_score
        .total_cmp(&a.fused_score)
        .then_with(|| a.product_id.cmp(&b.product_id))
}
