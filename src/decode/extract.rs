//! Confidence filtering and per-anchor box decoding.

use crate::candidate::{Candidate, RectN};
use crate::decode::resolve::{CLASS_START_NO_OBJ, CLASS_START_OBJ, OBJECTNESS_CHANNEL};
use crate::decode::{CoordSpace, DecodeConfig, ScoreRule};
use crate::tensor::{ChannelView, CHANNELS};

/// Scans every anchor and appends surviving candidates to `out`.
///
/// Boxes are converted from center form to corner form, divided by the
/// input size when coordinates are pixel-space, clamped to `[0, 1]` per
/// coordinate and dropped when the clamped extent collapses to zero.
/// The scan is O(N * 80) over flat memory; `out` is the caller's scratch
/// buffer and is only appended to.
pub(crate) fn extract_candidates(
    view: &ChannelView<'_>,
    rule: ScoreRule,
    space: CoordSpace,
    config: &DecodeConfig,
    out: &mut Vec<Candidate>,
) {
    let scale = match space {
        CoordSpace::Normalized => 1.0,
        CoordSpace::Pixel => config.input_size as f32,
    };

    for anchor in 0..view.anchors() {
        let (score, class_index) = match rule {
            ScoreRule::ClassOnly => best_class(view, anchor, CLASS_START_NO_OBJ),
            ScoreRule::ObjTimesClass => {
                let (best_cls, class_index) = best_class(view, anchor, CLASS_START_OBJ);
                (view.at(OBJECTNESS_CHANNEL, anchor) * best_cls, class_index)
            }
        };

        if score < config.conf_threshold {
            continue;
        }

        let cx = view.at(0, anchor);
        let cy = view.at(1, anchor);
        let w = view.at(2, anchor);
        let h = view.at(3, anchor);

        let left = cx - w / 2.0;
        let top = cy - h / 2.0;
        let right = left + w;
        let bottom = top + h;

        let rect = RectN::new(
            (left / scale).clamp(0.0, 1.0),
            (top / scale).clamp(0.0, 1.0),
            (right / scale).clamp(0.0, 1.0),
            (bottom / scale).clamp(0.0, 1.0),
        );
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            continue;
        }

        out.push(Candidate {
            rect,
            class_index,
            score,
            anchor,
        });
    }
}

/// Returns the best class score and its index relative to `class_start`.
fn best_class(view: &ChannelView<'_>, anchor: usize, class_start: usize) -> (f32, usize) {
    let mut best = 0.0f32;
    let mut best_class = 0usize;
    for channel in class_start..CHANNELS {
        let score = view.at(channel, anchor);
        if score > best {
            best = score;
            best_class = channel - class_start;
        }
    }
    (best, best_class)
}
