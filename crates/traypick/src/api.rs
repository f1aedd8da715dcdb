//! Boundary wire types.
//!
//! The HTTP layer accepts flexible JSON and hands the core structurally
//! complete values; translation and validation live here, never inside the
//! pipeline. Responses serialize camelCase for the orchestrator. Only
//! schema violations are rejected; every domain outcome is a normal
//! response with a structured status.

use crate::detection::Detection;
use crate::pipeline::{DecisionResult, DecisionStatus, WeightInfo};

/// Judgment request body.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct JudgeInput {
    pub detections: Vec<DetectionInput>,
    /// Signed tray weight change in grams; negative = removal.
    pub delta_weight: f64,
    /// Gate detections on hand proximity (default true).
    #[serde(default = "default_use_hand_filter")]
    pub use_hand_filter: bool,
}

fn default_use_hand_filter() -> bool {
    true
}

/// One detection as posted by the vision frontend.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DetectionInput {
    /// Bounding box `[x1, y1, x2, y2]` in pixel coordinates.
    pub xyxy: [f32; 4],
    /// Detector confidence in [0, 1].
    pub conf: f32,
    /// Class id; 0 denotes the hand class.
    pub cls: u32,
    /// Class name.
    pub name: String,
    /// Originating camera tag, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
}

/// Boundary rejection of malformed input.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("detection {index}: non-finite bbox or confidence")]
    NonFinite { index: usize },
    #[error("detection {index}: invalid bbox [{x1}, {y1}, {x2}, {y2}]")]
    InvalidBbox {
        index: usize,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
    #[error("detection {index}: confidence {conf} outside [0, 1]")]
    ConfidenceOutOfRange { index: usize, conf: f32 },
    #[error("delta_weight is not finite")]
    NonFiniteDelta,
}

impl JudgeInput {
    /// Validate the request and translate it into core detections.
    ///
    /// Checks: all numbers finite, `x1 <= x2` and `y1 <= y2`, confidence in
    /// [0, 1]. Values that pass here never make the pipeline fail.
    pub fn validate(&self) -> Result<Vec<Detection>, InputError> {
        if !self.delta_weight.is_finite() {
            return Err(InputError::NonFiniteDelta);
        }
        self.detections
            .iter()
            .enumerate()
            .map(|(index, det)| det.validate(index))
            .collect()
    }
}

impl DetectionInput {
    fn validate(&self, index: usize) -> Result<Detection, InputError> {
        let [x1, y1, x2, y2] = self.xyxy;
        if !(self.xyxy.iter().all(|v| v.is_finite()) && self.conf.is_finite()) {
            return Err(InputError::NonFinite { index });
        }
        if x1 > x2 || y1 > y2 {
            return Err(InputError::InvalidBbox {
                index,
                x1,
                y1,
                x2,
                y2,
            });
        }
        if !(0.0..=1.0).contains(&self.conf) {
            return Err(InputError::ConfidenceOutOfRange {
                index,
                conf: self.conf,
            });
        }
        Ok(Detection {
            bbox: self.xyxy,
            confidence: self.conf,
            class_id: self.cls,
            class_name: self.name.clone(),
            camera: self.camera.clone(),
        })
    }
}

/// One product line of a judgment response.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub product_id: u32,
    pub name: String,
    pub count: u32,
    pub unit_price: u32,
    /// `count * unitPrice`.
    pub total_price: u32,
    pub confidence: f32,
}

/// Judgment response body (camelCase on the wire).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgeResponse {
    /// `true` iff status is `complete` or `partial`.
    pub success: bool,
    pub products: Vec<ProductResponse>,
    pub total_price: u32,
    pub status: DecisionStatus,
    pub confidence: f32,
    pub weight_info: WeightInfo,
    /// Total unit count over all products.
    pub product_count: u32,
    pub is_removal: bool,
    /// Wall-clock seconds of the decision.
    pub timestamp: f64,
}

impl From<&DecisionResult> for JudgeResponse {
    fn from(result: &DecisionResult) -> Self {
        Self {
            success: result.success(),
            products: result
                .products
                .iter()
                .map(|p| ProductResponse {
                    product_id: p.product_id,
                    name: p.name.clone(),
                    count: p.count,
                    unit_price: p.unit_price,
                    total_price: p.line_price,
                    confidence: p.confidence,
                })
                .collect(),
            total_price: result.total_price,
            status: result.status,
            confidence: result.confidence,
            weight_info: result.weight_info,
            product_count: result.product_count(),
            is_removal: result.is_removal,
            timestamp: result.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductCatalog;
    use crate::pipeline::{judge, JudgeConfig};

    #[test]
    fn request_parses_with_hand_filter_defaulted_on() {
        let input: JudgeInput = serde_json::from_str(
            r#"{
                "detections": [
                    {"xyxy": [258.72, 47.65, 315.12, 113.97], "conf": 0.788, "cls": 0, "name": "hand"},
                    {"xyxy": [257.67, 75.54, 284.33, 110.22], "conf": 0.492, "cls": 26, "name": "chickenmayo_rice"}
                ],
                "delta_weight": -365.0
            }"#,
        )
        .unwrap();
        assert!(input.use_hand_filter);
        assert_eq!(input.detections.len(), 2);

        let detections = input.validate().unwrap();
        assert_eq!(detections[1].class_id, 26);
        assert_eq!(detections[1].confidence, 0.492);
    }

    #[test]
    fn invalid_bbox_is_rejected() {
        let input = JudgeInput {
            detections: vec![DetectionInput {
                xyxy: [300.0, 50.0, 200.0, 100.0],
                conf: 0.5,
                cls: 1,
                name: "x".into(),
                camera: None,
            }],
            delta_weight: -100.0,
            use_hand_filter: true,
        };
        assert!(matches!(
            input.validate(),
            Err(InputError::InvalidBbox { index: 0, .. })
        ));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let bad_conf = JudgeInput {
            detections: vec![DetectionInput {
                xyxy: [0.0, 0.0, 10.0, 10.0],
                conf: f32::NAN,
                cls: 1,
                name: "x".into(),
                camera: None,
            }],
            delta_weight: -100.0,
            use_hand_filter: true,
        };
        assert!(matches!(
            bad_conf.validate(),
            Err(InputError::NonFinite { index: 0 })
        ));

        let bad_delta = JudgeInput {
            detections: vec![],
            delta_weight: f64::NAN,
            use_hand_filter: true,
        };
        assert!(matches!(bad_delta.validate(), Err(InputError::NonFiniteDelta)));
    }

    #[test]
    fn confidence_out_of_range_is_rejected() {
        let input = JudgeInput {
            detections: vec![DetectionInput {
                xyxy: [0.0, 0.0, 10.0, 10.0],
                conf: 1.5,
                cls: 1,
                name: "x".into(),
                camera: None,
            }],
            delta_weight: -100.0,
            use_hand_filter: true,
        };
        assert!(matches!(
            input.validate(),
            Err(InputError::ConfidenceOutOfRange { index: 0, .. })
        ));
    }

    #[test]
    fn response_serializes_camel_case() {
        let catalog = ProductCatalog::default();
        let input: JudgeInput = serde_json::from_str(
            r#"{
                "detections": [
                    {"xyxy": [257.67, 75.54, 284.33, 110.22], "conf": 0.492, "cls": 26, "name": "chickenmayo_rice"}
                ],
                "delta_weight": -365.0
            }"#,
        )
        .unwrap();
        let detections = input.validate().unwrap();
        let result = judge(
            &detections,
            input.delta_weight,
            &catalog,
            &JudgeConfig::default(),
        );
        let response = JudgeResponse::from(&result);
        let json: serde_json::Value =
            serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["status"], "complete");
        assert_eq!(json["totalPrice"], 3500);
        assert_eq!(json["productCount"], 1);
        assert_eq!(json["isRemoval"], true);
        assert_eq!(json["products"][0]["productId"], 26);
        assert_eq!(json["products"][0]["unitPrice"], 3500);
        assert_eq!(json["products"][0]["totalPrice"], 3500);
        assert_eq!(json["weightInfo"]["delta"], -365.0);
        assert_eq!(json["weightInfo"]["explained"], 365.0);
        assert_eq!(json["weightInfo"]["residual"], 0.0);
        assert!(json["timestamp"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn success_tracks_status() {
        let no_detection = DecisionResult::no_detection(-2.0);
        let response = JudgeResponse::from(&no_detection);
        assert!(!response.success);
        assert_eq!(response.status, DecisionStatus::NoDetection);
        assert!(response.products.is_empty());
        assert_eq!(response.product_count, 0);
    }
}
