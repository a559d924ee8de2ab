//! Class-index to label mapping.

use crate::util::{BoxDecodeError, BoxDecodeResult};

/// The 80 COCO class names, in training order.
///
/// This is the table shared by the stock YOLO exports; a model trained on
/// a different label set supplies its own table via [`LabelTable::new`].
pub const COCO80: [&str; 80] = [
    "person",
    "bicycle",
    "car",
    "motorcycle",
    "airplane",
    "bus",
    "train",
    "truck",
    "boat",
    "traffic light",
    "fire hydrant",
    "stop sign",
    "parking meter",
    "bench",
    "bird",
    "cat",
    "dog",
    "horse",
    "sheep",
    "cow",
    "elephant",
    "bear",
    "zebra",
    "giraffe",
    "backpack",
    "umbrella",
    "handbag",
    "tie",
    "suitcase",
    "frisbee",
    "skis",
    "snowboard",
    "sports ball",
    "kite",
    "baseball bat",
    "baseball glove",
    "skateboard",
    "surfboard",
    "tennis racket",
    "bottle",
    "wine glass",
    "cup",
    "fork",
    "knife",
    "spoon",
    "bowl",
    "banana",
    "apple",
    "sandwich",
    "orange",
    "broccoli",
    "carrot",
    "hot dog",
    "pizza",
    "donut",
    "cake",
    "chair",
    "couch",
    "potted plant",
    "bed",
    "dining table",
    "toilet",
    "tv",
    "laptop",
    "mouse",
    "remote",
    "keyboard",
    "cell phone",
    "microwave",
    "oven",
    "toaster",
    "sink",
    "refrigerator",
    "book",
    "clock",
    "vase",
    "scissors",
    "teddy bear",
    "hair drier",
    "toothbrush",
];

/// Ordered label table indexed by class index.
#[derive(Clone, Debug)]
pub struct LabelTable {
    names: Vec<String>,
}

impl LabelTable {
    /// Creates a table from an ordered list of names.
    ///
    /// An empty list is a caller misconfiguration and is rejected here
    /// rather than mid-frame.
    pub fn new(names: Vec<String>) -> BoxDecodeResult<Self> {
        if names.is_empty() {
            return Err(BoxDecodeError::EmptyLabelTable);
        }
        Ok(Self { names })
    }

    /// Returns the standard COCO-80 table.
    pub fn coco80() -> Self {
        Self {
            names: COCO80.iter().map(|name| (*name).to_string()).collect(),
        }
    }

    /// Returns the number of labels.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true when the table has no entries (never, post-construction).
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the label at `index` if one exists.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Returns the label at `index`, synthesizing `"cls<index>"` when the
    /// index is out of range. Labels never block returning a detection.
    pub fn label_for(&self, index: usize) -> String {
        match self.get(index) {
            Some(name) => name.to_string(),
            None => format!("cls{index}"),
        }
    }
}
