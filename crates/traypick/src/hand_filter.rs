//! Hand-proximity gating of product detections.
//!
//! Hands are a reliable proxy for what the customer is actually touching;
//! product detections far from every hand are most likely items still
//! sitting on the tray. Gating on center distance to the nearest hand
//! removes that background before ranking.

use crate::detection::Detection;

/// Keep the non-hand detections whose bbox centers lie within
/// `max_distance_px` of the nearest hand center.
///
/// With no hand in the frame, the filter passes every non-hand detection
/// through unchanged. A detection exactly at a hand center (distance 0) or
/// exactly on the distance bound is retained. Hand detections themselves are
/// always dropped from the output.
pub fn filter_by_hand_proximity(detections: &[Detection], max_distance_px: f32) -> Vec<Detection> {
    let (hands, products): (Vec<&Detection>, Vec<&Detection>) =
        detections.iter().partition(|d| d.is_hand());

    if hands.is_empty() {
        return products.into_iter().cloned().collect();
    }

    let total = products.len();
    let kept: Vec<Detection> = products
        .into_iter()
        .filter(|product| {
            let nearest = hands
                .iter()
                .map(|hand| hand.center_distance(product))
                .fold(f32::INFINITY, f32::min);
            nearest <= max_distance_px
        })
        .cloned()
        .collect();

    tracing::debug!(
        "hand filter: {} hands, kept {}/{} product detections",
        hands.len(),
        kept.len(),
        total,
    );
    kept
}
