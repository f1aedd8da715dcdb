//! traypick — vision-plus-weight fusion core for smart-vending product
//! judgment.
//!
//! Given object detections from one or more cameras observing a dispensing
//! tray, plus a signed weight change from the tray's load cells, the
//! pipeline decides which catalog products were taken (or returned), how
//! many of each, and how much to trust that decision. The stages are:
//!
//! 1. **Hand filter** – spatial gating of product detections on proximity
//!    to the nearest detected hand.
//! 2. **Extract** – per-camera confidence ranking with deterministic
//!    tie-breaking, top-K retention.
//! 3. **Ensemble** – cross-camera candidate fusion with a multi-view
//!    agreement bonus.
//! 4. **Combination** – bounded brute-force integer count search explaining
//!    the weight change within per-category tolerances.
//! 5. **Pipeline** – orchestration, outcome classification
//!    (`complete` / `partial` / `uncertain` / `no_detection`), weight
//!    accounting, confidence blending.
//!
//! The core is stateless: each call to [`judge`] is an independent pure
//! computation over its inputs and a shared read-only [`ProductCatalog`].
//! Domain-valid input never fails; every outcome is a [`DecisionResult`].
//!
//! # Example
//!
//! ```
//! use traypick::{judge, Detection, JudgeConfig, ProductCatalog};
//!
//! let catalog = ProductCatalog::default();
//! let detections = vec![Detection {
//!     bbox: [257.7, 75.5, 284.3, 110.2],
//!     confidence: 0.49,
//!     class_id: 26,
//!     class_name: "chickenmayo_rice".into(),
//!     camera: None,
//! }];
//! let result = judge(&detections, -365.0, &catalog, &JudgeConfig::default());
//! assert!(result.success());
//! ```

pub mod api;
pub mod catalog;
pub mod combination;
pub mod count;
pub mod detection;
pub mod ensemble;
pub mod extract;
pub mod hand_filter;
pub mod pipeline;

pub use api::{DetectionInput, InputError, JudgeInput, JudgeResponse, ProductResponse};
pub use catalog::{CatalogError, Category, Product, ProductCatalog};
pub use combination::{match_combinations, CombinationLine, CombinationMatch, MAX_SUBSET_SIZE};
pub use count::{estimate_count, CountEstimate};
pub use detection::{Detection, HAND_CLASS_ID};
pub use ensemble::{ensemble_views, Candidate};
pub use extract::top_k_by_confidence;
pub use hand_filter::filter_by_hand_proximity;
pub use pipeline::{judge, DecisionResult, DecisionStatus, JudgeConfig, JudgedProduct, WeightInfo};
