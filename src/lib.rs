//! BoxDecode turns raw YOLO-family output tensors into labeled detections.
//!
//! This crate implements the detection post-processing pipeline shared by
//! camera-overlay frontends: layout normalization over the `[84][N]` output
//! tensor, per-tensor convention resolution (score mode and coordinate
//! space), confidence filtering, per-class non-maximum suppression and
//! label mapping. The engine is a pure synchronous computation with no
//! retained state; optional structured logging is available via the
//! `tracing` feature.

mod candidate;
pub mod decode;
pub mod labels;
pub mod tensor;
mod trace;
pub mod util;

pub use candidate::nms::nms_per_class;
pub use candidate::{Candidate, RectN};
pub use decode::resolve::{resolve_coord_space, resolve_score_mode};
pub use decode::{
    CoordSpace, DecodeConfig, DecodeContext, DecodeDiagnostics, DecodeOutcome, Decoder, Detection,
    ScoreMode, ScoreRule,
};
pub use labels::{LabelTable, COCO80};
pub use tensor::{ChannelView, CHANNELS, COORD_CHANNELS};
pub use util::{BoxDecodeError, BoxDecodeResult};
