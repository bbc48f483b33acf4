//! Structured answers from the vision model.
//!
//! Two shapes exist: the report-time classification (what is in the photo)
//! and the collection-time verification (does the photo match the task).
//! Only a verification that passes [`VerificationResult::passes`] may move a
//! task to `verified` and issue a reward.

use serde::{Deserialize, Serialize};

use super::{Confidence, WasteAmount, WasteType};

/// Confidence a verification must strictly exceed.
pub const VERIFICATION_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Report-time classification of a photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteClassification {
    pub waste_type: WasteType,
    pub quantity: WasteAmount,
    pub confidence: Confidence,
}

/// Collection-time comparison of a photo against the task's declared waste.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub waste_type_match: bool,
    pub quantity_match: bool,
    pub confidence: Confidence,
}

impl VerificationResult {
    /// Gate for rewarding a collection: both matches and confidence > 0.7.
    ///
    /// # Examples
    /// ```
    /// use cleanbee::domain::{Confidence, VerificationResult};
    ///
    /// let at_threshold = VerificationResult {
    ///     waste_type_match: true,
    ///     quantity_match: true,
    ///     confidence: Confidence::new(0.7).expect("valid"),
    /// };
    /// assert!(!at_threshold.passes());
    /// ```
    pub fn passes(&self) -> bool {
        self.waste_type_match
            && self.quantity_match
            && self.confidence.value() > VERIFICATION_CONFIDENCE_THRESHOLD
    }
}
