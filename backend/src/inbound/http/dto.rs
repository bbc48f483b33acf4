//! Wire shapes shared by the HTTP handlers.
//!
//! Domain types stay free of utoipa; these DTOs carry the OpenAPI schema and
//! the camelCase JSON contract.

use chrono::{DateTime, Utc};
use pagination::{Page, PageLinks};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::validation::{IMAGE, waste_error};
use crate::domain::{
    CollectionTask, Error, LeaderboardEntry, Notification, Place, Report, RewardTransaction,
    User, VerificationResult, WasteClassification, WasteImage,
};

/// Base64 photo upload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    #[schema(example = "image/jpeg")]
    pub mime_type: String,
    /// Base64 payload, optionally as a `data:` URL.
    pub data: String,
}

impl ImagePayload {
    pub(crate) fn into_domain(self) -> Result<WasteImage, Error> {
        WasteImage::new(&self.mime_type, &self.data).map_err(|err| waste_error(IMAGE, &err))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    #[schema(example = "ada@example.org")]
    pub email: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            email: user.email().to_string(),
            name: user.display_name().to_string(),
            created_at: user.created_at(),
        }
    }
}

/// Report-time model answer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationDto {
    #[schema(example = "plastic")]
    pub waste_type: String,
    #[schema(example = "2 kg")]
    pub quantity: String,
    #[schema(example = 0.92)]
    pub confidence: f64,
}

impl From<&WasteClassification> for ClassificationDto {
    fn from(classification: &WasteClassification) -> Self {
        Self {
            waste_type: classification.waste_type.to_string(),
            quantity: classification.quantity.to_string(),
            confidence: classification.confidence.value(),
        }
    }
}

/// Collection-time model answer plus the gate outcome.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerificationDto {
    pub waste_type_match: bool,
    pub quantity_match: bool,
    pub confidence: f64,
    pub passed: bool,
}

impl From<&VerificationResult> for VerificationDto {
    fn from(result: &VerificationResult) -> Self {
        Self {
            waste_type_match: result.waste_type_match,
            quantity_match: result.quantity_match,
            confidence: result.confidence.value(),
            passed: result.passes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub location: String,
    #[serde(rename = "type")]
    pub waste_type: String,
    pub amount: String,
    /// A photo was attached when the report was submitted.
    pub has_image: bool,
    pub verification: Option<ClassificationDto>,
    pub created_at: DateTime<Utc>,
}

impl From<&Report> for ReportDto {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id(),
            user_id: *report.user_id().as_uuid(),
            location: report.location().to_string(),
            waste_type: report.waste_type().to_string(),
            amount: report.amount().to_string(),
            has_image: report.has_image(),
            verification: report.verification().map(ClassificationDto::from),
            created_at: report.created_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    pub id: Uuid,
    pub report_id: Option<Uuid>,
    pub location: String,
    pub waste_type: String,
    pub amount: String,
    /// `pending`, `in_progress`, `completed` or `verified`.
    #[schema(example = "pending")]
    pub status: String,
    pub collector_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&CollectionTask> for TaskDto {
    fn from(task: &CollectionTask) -> Self {
        Self {
            id: task.id(),
            report_id: task.report_id(),
            location: task.location().to_string(),
            waste_type: task.waste_type().to_string(),
            amount: task.amount().to_string(),
            status: task.status().to_string(),
            collector_id: task.collector_id().map(|id| *id.as_uuid()),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RewardTransactionDto {
    pub id: Uuid,
    /// `earned_report`, `earned_collect`, `spent_redeem`, ...
    #[serde(rename = "type")]
    #[schema(example = "earned_collect")]
    pub kind: String,
    pub amount: u32,
    pub description: String,
    pub task_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<&RewardTransaction> for RewardTransactionDto {
    fn from(transaction: &RewardTransaction) -> Self {
        Self {
            id: transaction.id(),
            kind: transaction.kind().to_string(),
            amount: transaction.amount(),
            description: transaction.description().to_owned(),
            task_id: transaction.task_id(),
            created_at: transaction.created_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntryDto {
    pub rank: u64,
    pub user_id: Uuid,
    pub user_name: String,
    pub points: u64,
    pub level: u32,
}

impl From<&LeaderboardEntry> for LeaderboardEntryDto {
    fn from(entry: &LeaderboardEntry) -> Self {
        Self {
            rank: entry.rank,
            user_id: *entry.user_id.as_uuid(),
            user_name: entry.user_name.to_string(),
            points: entry.points,
            level: entry.level,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDto {
    pub id: Uuid,
    #[serde(rename = "type")]
    #[schema(example = "reward")]
    pub kind: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Notification> for NotificationDto {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id,
            kind: notification.kind.to_string(),
            message: notification.message.clone(),
            is_read: notification.is_read,
            created_at: notification.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDto {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Place> for PlaceDto {
    fn from(place: &Place) -> Self {
        Self {
            name: place.name.clone(),
            latitude: place.coordinates.latitude(),
            longitude: place.coordinates.longitude(),
        }
    }
}

/// Navigation links for a page.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageLinksDto {
    #[serde(rename = "self")]
    pub self_: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

impl From<&PageLinks> for PageLinksDto {
    fn from(links: &PageLinks) -> Self {
        Self {
            self_: links.self_.clone(),
            next: links.next.clone(),
            prev: links.prev.clone(),
        }
    }
}

/// One page of results with totals.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageDto<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<PageLinksDto>,
}

impl<T> PageDto<T> {
    pub(crate) fn from_page<D>(page: &Page<D>, map: impl Fn(&D) -> T) -> Self {
        Self {
            items: page.items().iter().map(map).collect(),
            page: page.page(),
            per_page: page.per_page(),
            total_items: page.total_items(),
            total_pages: page.total_pages(),
            links: page.links().map(PageLinksDto::from),
        }
    }
}
