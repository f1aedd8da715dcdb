//! Per-camera candidate ranking.
//!
//! The detector runs with a very low confidence threshold, so each frame
//! yields many weak detections; only the best few per camera are worth
//! ensembling.

use std::cmp::Ordering;

use crate::detection::Detection;

/// Rank detections by confidence and keep the best `k`.
///
/// Ordering is deterministic: higher confidence first, ties broken by larger
/// bbox area, then by class id ascending.
pub fn top_k_by_confidence(mut detections: Vec<Detection>, k: usize) -> Vec<Detection> {
    detections.sort_by(compare_ranked);
    detections.truncate(k.min(detections.len()));
    detections
}

fn compare_ranked(a: &Detection, b: &Detection) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then_with(|| b.area().total_cmp(&a.area()))
        .then_with(|| a.class_id.cmp(&b.class_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(confidence: f32, class_id: u32, side: f32) -> Detection {
        Detection {
            bbox: [0.0, 0.0, side, side],
            confidence,
            class_id,
            class_name: format!("product_{class_id}"),
            camera: None,
        }
    }

    #[test]
    fn keeps_at_most_k_from_input() {
        let input: Vec<Detection> = (1..=8).map(|i| det(i as f32 / 10.0, i, 10.0)).collect();
        let top = top_k_by_confidence(input.clone(), 5);
        assert_eq!(top.len(), 5);
        for d in &top {
            assert!(input.contains(d));
        }
        // Highest confidence first.
        assert_eq!(top[0].class_id, 8);
        assert_eq!(top[4].class_id, 4);
    }

    #[test]
    fn shorter_input_is_returned_whole() {
        let input = vec![det(0.3, 1, 10.0), det(0.9, 2, 10.0)];
        let top = top_k_by_confidence(input, 5);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].class_id, 2);
    }

    #[test]
    fn confidence_tie_prefers_larger_area() {
        let top = top_k_by_confidence(vec![det(0.5, 1, 10.0), det(0.5, 2, 20.0)], 5);
        assert_eq!(top[0].class_id, 2);
    }

    #[test]
    fn full_tie_prefers_lower_class_id() {
        let top = top_k_by_confidence(vec![det(0.5, 9, 10.0), det(0.5, 4, 10.0)], 5);
        assert_eq!(top[0].class_id, 4);
    }

    #[test]
    fn ranking_is_permutation_invariant() {
        let a = vec![det(0.5, 3, 10.0), det(0.7, 1, 5.0), det(0.5, 2, 10.0)];
        let b = vec![a[2].clone(), a[0].clone(), a[1].clone()];
        let ra: Vec<u32> = top_k_by_confidence(a, 5).iter().map(|d| d.class_id).collect();
        let rb: Vec<u32> = top_k_by_confidence(b, 5).iter().map(|d| d.class_id).collect();
        assert_eq!(ra, rb);
        assert_eq!(ra, vec![1, 2, 3]);
    }
}
