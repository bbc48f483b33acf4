//! Driven port for the vision model that classifies and verifies photos.
use async_trait::async_trait;

use crate::domain::{VerificationResult, WasteAmount, WasteClassification, WasteImage, WasteType};

use super::define_port_error;

define_port_error! {
    /// Errors raised by classifier adapters.
    pub enum WasteClassifierError {
        /// The model endpoint could not be reached.
        Transport { message: String } => "classifier transport failed: {message}",
        /// The model did not answer in time.
        Timeout { message: String } => "classifier timed out: {message}",
        /// The model rejected the call for quota reasons.
        RateLimited { message: String } => "classifier rate limited: {message}",
        /// The answer could not be read as the expected JSON object.
        Decode { message: String } => "classifier response malformed: {message}",
        /// The model rejected the request as invalid.
        InvalidRequest { message: String } => "classifier rejected request: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WasteClassifier: Send + Sync {
    /// Describe the waste in a report photo.
    async fn classify(
        &self,
        image: &WasteImage,
    ) -> Result<WasteClassification, WasteClassifierError>;

    /// Compare a collection photo with the waste declared on the task.
    async fn verify(
        &self,
        image: &WasteImage,
        waste_type: &WasteType,
        amount: &WasteAmount,
    ) -> Result<VerificationResult, WasteClassifierError>;
}
