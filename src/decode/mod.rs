//! Decode pipeline: raw output tensor in, labeled detections out.
//!
//! The pipeline stages are layout normalization ([`crate::tensor`]),
//! convention resolution ([`resolve`]), confidence filtering and box
//! decoding, per-class non-maximum suppression and label mapping
//! ([`crate::labels`]).
//! Everything runs synchronously on the calling thread; the caller owns
//! the single-flight discipline and any scratch reuse via
//! [`DecodeContext`].

mod extract;
pub mod resolve;

use crate::candidate::nms::nms_per_class;
use crate::candidate::{Candidate, RectN};
use crate::labels::LabelTable;
use crate::tensor::ChannelView;
use crate::trace::{trace_event, trace_span};
use crate::util::{BoxDecodeError, BoxDecodeResult};

/// Scoring convention requested by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreMode {
    /// Resolve the convention per tensor (see [`resolve::resolve_score_mode`]).
    Auto,
    /// Channels 4..84 are class scores; there is no objectness channel.
    ClassOnly,
    /// Channel 4 is objectness, channels 5..84 are class scores.
    ObjTimesClass,
}

/// Scoring convention actually applied to a tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreRule {
    /// Score is the best class score over channels 4..84.
    ClassOnly,
    /// Score is objectness times the best class score over channels 5..84.
    ObjTimesClass,
}

/// Coordinate space of the box channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoordSpace {
    /// Coordinates already lie in `[0, 1]`.
    Normalized,
    /// Coordinates are in input pixels and are divided by the input size.
    Pixel,
}

/// Decode parameters for one model export.
#[derive(Clone, Copy, Debug)]
pub struct DecodeConfig {
    /// Minimum combined score for a candidate to survive, in `[0, 1]`.
    pub conf_threshold: f32,
    /// IoU above which a same-class box is suppressed, in `[0, 1]`.
    pub iou_threshold: f32,
    /// Model input edge length in pixels; divides pixel-space coordinates.
    pub input_size: u32,
    /// Scoring convention, `Auto` to resolve per tensor.
    pub score_mode: ScoreMode,
    /// Upper bound on returned detections.
    pub max_detections: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            conf_threshold: 0.25,
            iou_threshold: 0.45,
            input_size: 640,
            score_mode: ScoreMode::Auto,
            max_detections: 20,
        }
    }
}

impl DecodeConfig {
    /// Checks that thresholds lie in `[0, 1]` and the input size is positive.
    pub fn validate(&self) -> BoxDecodeResult<()> {
        if !(0.0..=1.0).contains(&self.conf_threshold) {
            return Err(BoxDecodeError::InvalidThreshold {
                name: "conf_threshold",
                value: self.conf_threshold,
            });
        }
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(BoxDecodeError::InvalidThreshold {
                name: "iou_threshold",
                value: self.iou_threshold,
            });
        }
        if self.input_size == 0 {
            return Err(BoxDecodeError::InvalidInputSize {
                value: self.input_size,
            });
        }
        Ok(())
    }
}

/// Labeled detection in normalized view coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    /// Box with every coordinate in `[0, 1]`, `left <= right`, `top <= bottom`.
    pub rect: RectN,
    /// Class index selected by the score rule.
    pub class_index: usize,
    /// Human-readable label for `class_index`.
    pub label: String,
    /// Combined detection score.
    pub score: f32,
}

/// Per-frame observability counters; never required for correctness.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeDiagnostics {
    /// Score rule applied, `None` when the tensor layout was unsupported.
    pub score_rule: Option<ScoreRule>,
    /// Coordinate space applied, `None` when the layout was unsupported.
    pub coord_space: Option<CoordSpace>,
    /// Number of anchors in the tensor (0 when the layout was unsupported).
    pub anchors: usize,
    /// Candidates above the confidence threshold, before suppression.
    pub candidates: usize,
    /// Detections surviving suppression, before truncation.
    pub kept: usize,
}

/// Result of one decode call.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodeOutcome {
    /// Detections in descending score order, at most `max_detections`.
    pub detections: Vec<Detection>,
    /// Observability counters for this frame.
    pub diagnostics: DecodeDiagnostics,
}

impl DecodeOutcome {
    fn empty() -> Self {
        Self {
            detections: Vec::new(),
            diagnostics: DecodeDiagnostics::default(),
        }
    }
}

/// Caller-owned scratch state for one decode in flight.
///
/// Reusing a context across frames avoids reallocating the candidate
/// buffer. A context must not be shared between concurrent decodes; the
/// caller drives successive calls from one thread or adds external mutual
/// exclusion.
#[derive(Debug, Default)]
pub struct DecodeContext {
    candidates: Vec<Candidate>,
}

impl DecodeContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Detection post-processing engine for one model export.
///
/// Construction validates the configuration and label table, so decoding
/// itself is infallible: malformed frames degrade to an empty detection
/// list.
pub struct Decoder {
    config: DecodeConfig,
    labels: LabelTable,
}

impl Decoder {
    /// Creates a decoder, rejecting a misconfigured caller up front.
    pub fn new(config: DecodeConfig, labels: LabelTable) -> BoxDecodeResult<Self> {
        config.validate()?;
        Ok(Self { config, labels })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Decodes one raw output tensor with a fresh scratch context.
    pub fn decode(&self, shape: &[usize], data: &[f32]) -> DecodeOutcome {
        let mut ctx = DecodeContext::new();
        self.decode_with_context(shape, data, &mut ctx)
    }

    /// Decodes one raw output tensor, reusing the caller's scratch buffers.
    ///
    /// An unsupported shape, wrong channel count or short buffer yields an
    /// empty outcome with default diagnostics; no data error ever panics
    /// or propagates.
    pub fn decode_with_context(
        &self,
        shape: &[usize],
        data: &[f32],
        ctx: &mut DecodeContext,
    ) -> DecodeOutcome {
        let view = match ChannelView::from_output(shape, data) {
            Some(view) => view,
            None => {
                trace_event!("unsupported_output_shape", rank = shape.len());
                return DecodeOutcome::empty();
            }
        };

        let _span = trace_span!("decode", anchors = view.anchors()).entered();

        let rule = match self.config.score_mode {
            ScoreMode::ClassOnly => ScoreRule::ClassOnly,
            ScoreMode::ObjTimesClass => ScoreRule::ObjTimesClass,
            ScoreMode::Auto => resolve::resolve_score_mode(&view),
        };
        let space = resolve::resolve_coord_space(&view);

        ctx.candidates.clear();
        extract::extract_candidates(&view, rule, space, &self.config, &mut ctx.candidates);
        let raw_candidates = ctx.candidates.len();

        let mut kept = nms_per_class(&mut ctx.candidates, self.config.iou_threshold);
        let survivors = kept.len();
        kept.truncate(self.config.max_detections);

        trace_event!(
            "decode_frame",
            anchors = view.anchors(),
            candidates = raw_candidates,
            kept = survivors,
        );

        let detections = kept
            .into_iter()
            .map(|cand| Detection {
                rect: cand.rect,
                class_index: cand.class_index,
                label: self.labels.label_for(cand.class_index),
                score: cand.score,
            })
            .collect();

        DecodeOutcome {
            detections,
            diagnostics: DecodeDiagnostics {
                score_rule: Some(rule),
                coord_space: Some(space),
                anchors: view.anchors(),
                candidates: raw_candidates,
                kept: survivors,
            },
        }
    }
}
