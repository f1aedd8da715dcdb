//! Detection input model.
//!
//! A [`Detection`] is one raw observation from one camera frame as emitted
//! by the upstream object detector: an axis-aligned bounding box, a class
//! assignment, and a confidence score. The detector itself is out of scope;
//! the pipeline consumes its output.

/// Detection class id reserved for hands, used only for spatial gating.
pub const HAND_CLASS_ID: u32 = 0;

/// One raw observation from one camera frame.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Detection {
    /// Bounding box `[x1, y1, x2, y2]` in pixel coordinates,
    /// `x1 <= x2` and `y1 <= y2`.
    pub bbox: [f32; 4],
    /// Detector confidence in [0, 1].
    pub confidence: f32,
    /// Class id; [`HAND_CLASS_ID`] denotes a hand.
    pub class_id: u32,
    /// Class name matching a catalog entry (except for `hand`).
    pub class_name: String,
    /// Originating camera tag (e.g. `top`, `side`), if provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
}

impl Detection {
    /// Bounding-box center `[cx, cy]`.
    pub fn center(&self) -> [f32; 2] {
        let [x1, y1, x2, y2] = self.bbox;
        [0.5 * (x1 + x2), 0.5 * (y1 + y2)]
    }

    /// Bounding-box area in square pixels.
    pub fn area(&self) -> f32 {
        let [x1, y1, x2, y2] = self.bbox;
        (x2 - x1) * (y2 - y1)
    }

    /// `true` when this detection is the reserved hand class.
    pub fn is_hand(&self) -> bool {
        self.class_id == HAND_CLASS_ID
    }

    /// Euclidean distance between this detection's center and `other`'s.
    pub fn center_distance(&self, other: &Detection) -> f32 {
        let [ax, ay] = self.center();
        let [bx, by] = other.center();
        let dx = ax - bx;
        let dy = ay - by;
        (dx * dx + dy * dy).sqrt()
    }
}
