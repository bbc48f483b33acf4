//! Tests for report classification and submission.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockReportRepository, MockWasteClassifier};
use crate::domain::test_fixtures::{fixture_clock, fixture_timestamp, sample_image};
use crate::domain::{
    Confidence, ErrorCode, Location, MockRewardPolicy, TaskStatus, UserId, VerificationStatus,
    WasteAmount, WasteType,
};
use rstest::rstest;

type Service = ReportService<MockReportRepository, MockWasteClassifier>;

fn make_service(repo: MockReportRepository, classifier: MockWasteClassifier) -> Service {
    let mut policy = MockRewardPolicy::new();
    policy.expect_report_reward().return_const(10_u32);
    ReportService::new(
        Arc::new(repo),
        Arc::new(classifier),
        Arc::new(policy),
        fixture_clock(),
    )
}

fn classification() -> WasteClassification {
    WasteClassification {
        waste_type: WasteType::new("plastic").expect("type"),
        quantity: WasteAmount::new("2 bags").expect("amount"),
        confidence: Confidence::new(0.92).expect("confidence"),
    }
}

fn submit_request(user_id: UserId, status: VerificationStatus) -> SubmitReportRequest {
    SubmitReportRequest {
        user_id,
        location: Location::new("Canal towpath").expect("location"),
        waste_type: WasteType::new("plastic").expect("type"),
        amount: WasteAmount::new("2 bags").expect("amount"),
        verification_status: status,
        classification: Some(classification()),
        image: Some(sample_image()),
    }
}

#[rstest]
#[case::idle(VerificationStatus::Idle)]
#[case::verifying(VerificationStatus::Verifying)]
#[case::failure(VerificationStatus::Failure)]
#[tokio::test]
async fn unverified_report_is_rejected_before_any_write(#[case] status: VerificationStatus) {
    let mut repo = MockReportRepository::new();
    repo.expect_submit().never();

    let error = make_service(repo, MockWasteClassifier::new())
        .submit_report(submit_request(UserId::random(), status))
        .await
        .expect_err("rejected");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    let details = error.details().expect("details");
    assert_eq!(details["code"], "not_verified");
    assert_eq!(details["value"], status.as_str());
}

#[tokio::test]
async fn verified_report_writes_report_task_reward_and_notification_together() {
    let user = UserId::random();
    let expected_user = user.clone();
    let mut repo = MockReportRepository::new();
    repo.expect_submit()
        .times(1)
        .withf(move |submission: &ReportSubmission| {
            submission.report.user_id() == &expected_user
                && submission.task.status() == TaskStatus::Pending
                && submission.task.report_id() == Some(submission.report.id())
                && submission.reward.kind() == &TransactionKind::EarnedReport
                && submission.reward.amount() == 10
                && submission.reward.task_id().is_none()
                && submission.notification.user_id == expected_user
                && submission.notification.message == "You earned 10 points for reporting waste!"
        })
        .return_once(|_| Ok(()));

    let response = make_service(repo, MockWasteClassifier::new())
        .submit_report(submit_request(user, VerificationStatus::Success))
        .await
        .expect("submitted");
    assert_eq!(response.reward_points, 10);
    assert_eq!(response.task.status(), TaskStatus::Pending);
    assert_eq!(response.report.created_at(), fixture_timestamp());
    assert!(response.report.has_image());
}

#[tokio::test]
async fn submission_failure_surfaces_as_unavailable() {
    let mut repo = MockReportRepository::new();
    repo.expect_submit()
        .times(1)
        .return_once(|_| Err(ReportRepositoryError::connection("pool exhausted")));

    let error = make_service(repo, MockWasteClassifier::new())
        .submit_report(submit_request(UserId::random(), VerificationStatus::Success))
        .await
        .expect_err("fails");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn classify_returns_model_answer() {
    let mut classifier = MockWasteClassifier::new();
    classifier
        .expect_classify()
        .times(1)
        .return_once(|_| Ok(classification()));

    let answer = make_service(MockReportRepository::new(), classifier)
        .classify_image(ClassifyImageRequest {
            image: sample_image(),
        })
        .await
        .expect("classified");
    assert_eq!(answer, classification());
}

#[rstest]
#[case::transport(WasteClassifierError::transport("reset"), ErrorCode::ServiceUnavailable)]
#[case::timeout(WasteClassifierError::timeout("30s"), ErrorCode::ServiceUnavailable)]
#[case::rate_limited(WasteClassifierError::rate_limited("429"), ErrorCode::ServiceUnavailable)]
#[case::decode(WasteClassifierError::decode("no json"), ErrorCode::BadGateway)]
#[case::invalid(WasteClassifierError::invalid_request("400"), ErrorCode::InvalidRequest)]
#[tokio::test]
async fn classify_maps_classifier_failures(
    #[case] failure: WasteClassifierError,
    #[case] expected: ErrorCode,
) {
    let mut classifier = MockWasteClassifier::new();
    classifier
        .expect_classify()
        .times(1)
        .return_once(move |_| Err(failure));

    let error = make_service(MockReportRepository::new(), classifier)
        .classify_image(ClassifyImageRequest {
            image: sample_image(),
        })
        .await
        .expect_err("fails");
    assert_eq!(error.code(), expected);
}

#[rstest]
#[case::zero(0, 1)]
#[case::default(10, 10)]
#[case::capped(500, 50)]
#[tokio::test]
async fn recent_reports_clamps_limit(#[case] requested: u32, #[case] expected: i64) {
    let mut repo = MockReportRepository::new();
    repo.expect_list_recent()
        .times(1)
        .withf(move |limit| *limit == expected)
        .return_once(|_| Ok(Vec::new()));

    let reports = make_service(repo, MockWasteClassifier::new())
        .recent_reports(requested)
        .await
        .expect("listed");
    assert!(reports.is_empty());
}
