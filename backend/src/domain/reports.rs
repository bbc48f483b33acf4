//! Waste reports.
//!
//! A report records what a contributor photographed and where. Reports are
//! immutable once stored; submitting one also opens a collection task for
//! the same waste.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Location, UserId, WasteAmount, WasteClassification, WasteType};

/// Client-side state of the report-time classification.
///
/// Only `success` permits submission; the other states exist so the value
/// echoed back by the client can be parsed and rejected precisely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Idle,
    Verifying,
    Success,
    Failure,
}

impl VerificationStatus {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Verifying => "verifying",
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationStatus {
    type Err = ReportValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "idle" => Ok(Self::Idle),
            "verifying" => Ok(Self::Verifying),
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            other => Err(ReportValidationError::UnknownVerificationStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// Validation errors raised while assembling a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportValidationError {
    UnknownVerificationStatus { value: String },
    NotVerified { status: VerificationStatus },
}

impl fmt::Display for ReportValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownVerificationStatus { value } => {
                write!(f, "unknown verification status: {value}")
            }
            Self::NotVerified { status } => write!(
                f,
                "report must be verified before submission (status: {status})"
            ),
        }
    }
}

impl std::error::Error for ReportValidationError {}

/// Input for [`Report::new`].
#[derive(Debug, Clone)]
pub struct ReportDraft {
    pub id: Uuid,
    pub user_id: UserId,
    pub location: Location,
    pub waste_type: WasteType,
    pub amount: WasteAmount,
    /// Whether a photo accompanied the submission. The photo itself is only
    /// used for classification and is not kept.
    pub has_image: bool,
    pub verification: Option<WasteClassification>,
    pub created_at: DateTime<Utc>,
}

/// Stored waste report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    id: Uuid,
    user_id: UserId,
    location: Location,
    waste_type: WasteType,
    amount: WasteAmount,
    has_image: bool,
    verification: Option<WasteClassification>,
    created_at: DateTime<Utc>,
}

impl Report {
    pub fn new(draft: ReportDraft) -> Self {
        let ReportDraft {
            id,
            user_id,
            location,
            waste_type,
            amount,
            has_image,
            verification,
            created_at,
        } = draft;
        Self {
            id,
            user_id,
            location,
            waste_type,
            amount,
            has_image,
            verification,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn waste_type(&self) -> &WasteType {
        &self.waste_type
    }

    pub fn amount(&self) -> &WasteAmount {
        &self.amount
    }

    pub fn has_image(&self) -> bool {
        self.has_image
    }

    pub fn verification(&self) -> Option<&WasteClassification> {
        self.verification.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Require a `success` classification state before a report may be stored.
pub fn ensure_submittable(status: VerificationStatus) -> Result<(), ReportValidationError> {
    match status {
        VerificationStatus::Success => Ok(()),
        other => Err(ReportValidationError::NotVerified { status: other }),
    }
}
