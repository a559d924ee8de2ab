//! Non-maximum suppression for detection candidates.

use crate::candidate::{sort_candidates_desc, Candidate};

/// Applies greedy per-class non-maximum suppression.
///
/// Candidates are sorted by descending score and kept unless an already
/// kept candidate of the same class overlaps them with IoU above
/// `iou_threshold`. Suppression never crosses classes, so the result is
/// identical to running NMS independently per class and re-sorting the
/// merged survivors; the kept list comes out in globally descending score
/// order.
pub fn nms_per_class(candidates: &mut [Candidate], iou_threshold: f32) -> Vec<Candidate> {
    sort_candidates_desc(candidates);
    let mut kept: Vec<Candidate> = Vec::new();

    'outer: for cand in candidates.iter().copied() {
        for kept_cand in kept.iter() {
            if kept_cand.class_index == cand.class_index
                && kept_cand.rect.iou(&cand.rect) > iou_threshold
            {
                continue 'outer;
            }
        }
        kept.push(cand);
    }

    kept
}
