//! Driving port for classifying photos and submitting reports.
use async_trait::async_trait;

use crate::domain::{
    CollectionTask, Error, Location, Report, UserId, VerificationStatus, WasteAmount,
    WasteClassification, WasteImage, WasteType,
};

/// A photo to classify before reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyImageRequest {
    pub image: WasteImage,
}

/// A report as confirmed by its author.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReportRequest {
    pub user_id: UserId,
    pub location: Location,
    pub waste_type: WasteType,
    pub amount: WasteAmount,
    /// Classification state echoed by the client; only `success` is accepted.
    pub verification_status: VerificationStatus,
    pub classification: Option<WasteClassification>,
    pub image: Option<WasteImage>,
}

/// Rows created by an accepted report.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReportResponse {
    pub report: Report,
    pub task: CollectionTask,
    pub reward_points: u32,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportCommand: Send + Sync {
    /// Ask the vision model what a photo shows.
    async fn classify_image(
        &self,
        request: ClassifyImageRequest,
    ) -> Result<WasteClassification, Error>;

    /// Store a verified report together with its task and reward.
    async fn submit_report(
        &self,
        request: SubmitReportRequest,
    ) -> Result<SubmitReportResponse, Error>;
}
