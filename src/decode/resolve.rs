//! Per-tensor convention resolution.
//!
//! The AUTO-mode heuristics live here as standalone pure functions so
//! their fixed constants stay unit-testable away from the per-anchor
//! extraction loop.

use crate::decode::{CoordSpace, ScoreRule};
use crate::tensor::{ChannelView, CHANNELS, COORD_CHANNELS};

/// Anchors sampled when sniffing the coordinate space.
pub const COORD_SAMPLE_ANCHORS: usize = 200;

/// Largest absolute coordinate still treated as normalized.
///
/// Normalized center/extent arithmetic can slightly exceed 1.0; pixel
/// boxes sit in the hundreds, so the cutoff does not need to be tight.
pub const COORD_NORMALIZED_MAX: f32 = 1.5;

/// Factor `obj*cls` must win by before it is preferred over class-only.
pub const SCORE_MODE_MARGIN: f32 = 1.2;

/// First class-score channel when no objectness channel exists.
pub(crate) const CLASS_START_NO_OBJ: usize = 4;

/// Objectness channel in the `obj*cls` convention.
pub(crate) const OBJECTNESS_CHANNEL: usize = 4;

/// First class-score channel after the objectness channel.
pub(crate) const CLASS_START_OBJ: usize = 5;

/// Decides whether box coordinates are normalized or in input pixels.
///
/// Samples the box channels of up to the first [`COORD_SAMPLE_ANCHORS`]
/// anchors and compares the maximum absolute value against
/// [`COORD_NORMALIZED_MAX`].
pub fn resolve_coord_space(view: &ChannelView<'_>) -> CoordSpace {
    let sample = view.anchors().min(COORD_SAMPLE_ANCHORS);
    let mut coord_max = 0.0f32;
    for channel in 0..COORD_CHANNELS {
        for anchor in 0..sample {
            coord_max = coord_max.max(view.at(channel, anchor).abs());
        }
    }

    if coord_max <= COORD_NORMALIZED_MAX {
        CoordSpace::Normalized
    } else {
        CoordSpace::Pixel
    }
}

/// Decides between the class-only and objectness-times-class conventions.
///
/// Tracks the best achievable score under both readings across all
/// anchors and prefers `obj*cls` only when it beats class-only by
/// [`SCORE_MODE_MARGIN`]; near ties fall back to class-only.
pub fn resolve_score_mode(view: &ChannelView<'_>) -> ScoreRule {
    let mut max_no_obj = 0.0f32;
    let mut max_obj = 0.0f32;

    for anchor in 0..view.anchors() {
        let mut best_no_obj = 0.0f32;
        for channel in CLASS_START_NO_OBJ..CHANNELS {
            best_no_obj = best_no_obj.max(view.at(channel, anchor));
        }
        max_no_obj = max_no_obj.max(best_no_obj);

        let obj = view.at(OBJECTNESS_CHANNEL, anchor);
        let mut best_cls = 0.0f32;
        for channel in CLASS_START_OBJ..CHANNELS {
            best_cls = best_cls.max(view.at(channel, anchor));
        }
        max_obj = max_obj.max(obj * best_cls);
    }

    if max_obj > max_no_obj * SCORE_MODE_MARGIN {
        ScoreRule::ObjTimesClass
    } else {
        ScoreRule::ClassOnly
    }
}
