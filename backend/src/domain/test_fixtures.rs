//! Shared builders for domain service tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use uuid::Uuid;

use super::{
    CollectionTask, CollectionTaskDraft, Confidence, Location, Report, ReportDraft,
    RewardTransaction, RewardTransactionDraft, TaskStatus, TransactionKind, UserId,
    VerificationResult, WasteAmount, WasteClassification, WasteImage, WasteType,
};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn sample_image() -> WasteImage {
    WasteImage::new("image/png", "data:image/png;base64,iVBORw0KGgo=").expect("valid image")
}

pub(crate) fn task_with(status: TaskStatus, collector: Option<UserId>) -> CollectionTask {
    CollectionTask::new(CollectionTaskDraft {
        id: Uuid::new_v4(),
        report_id: Some(Uuid::new_v4()),
        location: Location::new("12 Harbour Road").expect("location"),
        waste_type: WasteType::new("plastic").expect("waste type"),
        amount: WasteAmount::new("3 bags").expect("amount"),
        status,
        collector_id: collector,
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    })
    .expect("consistent task")
}

pub(crate) fn verification(
    waste_type_match: bool,
    quantity_match: bool,
    confidence: f64,
) -> VerificationResult {
    VerificationResult {
        waste_type_match,
        quantity_match,
        confidence: Confidence::new(confidence).expect("confidence"),
    }
}

pub(crate) fn ledger_row(
    user: &UserId,
    kind: TransactionKind,
    amount: u32,
    task_id: Option<Uuid>,
) -> RewardTransaction {
    RewardTransaction::new(RewardTransactionDraft {
        id: Uuid::new_v4(),
        user_id: user.clone(),
        kind,
        amount,
        description: "fixture row".to_owned(),
        task_id,
        created_at: fixture_timestamp(),
    })
    .expect("valid ledger row")
}

pub(crate) fn classification(confidence: f64) -> WasteClassification {
    WasteClassification {
        waste_type: WasteType::new("plastic").expect("waste type"),
        quantity: WasteAmount::new("3 bags").expect("amount"),
        confidence: Confidence::new(confidence).expect("confidence"),
    }
}

pub(crate) fn report_by(user: &UserId) -> Report {
    Report::new(ReportDraft {
        id: Uuid::new_v4(),
        user_id: user.clone(),
        location: Location::new("12 Harbour Road").expect("location"),
        waste_type: WasteType::new("plastic").expect("waste type"),
        amount: WasteAmount::new("3 bags").expect("amount"),
        has_image: true,
        verification: Some(classification(0.92)),
        created_at: fixture_timestamp(),
    })
}
