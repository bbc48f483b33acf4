//! Tests for balances, history and redemption.

use std::sync::Arc;

use super::*;
use crate::domain::ports::MockRewardLedgerRepository;
use crate::domain::test_fixtures::{fixture_clock, ledger_row};
use crate::domain::{DisplayName, ErrorCode};
use pagination::PageRequest;
use rstest::rstest;

fn make_service(repo: MockRewardLedgerRepository) -> RewardsService<MockRewardLedgerRepository> {
    RewardsService::new(Arc::new(repo), fixture_clock())
}

#[rstest]
#[case::credit_and_debit(vec![("earned_report", 20), ("spent_redeem", 5)], 15)]
#[case::floored(vec![("earned_collect", 10), ("spent_redeem", 25)], 0)]
#[case::custom_credit(vec![("earned_bonus", 7), ("earned_collect", 3)], 10)]
#[case::custom_debit(vec![("earned_collect", 30), ("penalty", 4)], 26)]
#[case::empty(vec![], 0)]
#[tokio::test]
async fn balance_uses_full_history(#[case] rows: Vec<(&str, u32)>, #[case] expected: u64) {
    let user = UserId::random();
    let ledger: Vec<_> = rows
        .into_iter()
        .map(|(kind, amount)| ledger_row(&user, TransactionKind::from(kind), amount, None))
        .collect();
    let mut repo = MockRewardLedgerRepository::new();
    repo.expect_list_for_user()
        .times(1)
        .return_once(move |_| Ok(ledger));
    repo.expect_list_recent_for_user().never();

    let balance = make_service(repo).balance(&user).await.expect("balance");
    assert_eq!(balance, expected);
}

#[tokio::test]
async fn balance_is_independent_of_history_cap() {
    let user = UserId::random();
    let ledger: Vec<_> = (0..60)
        .map(|_| ledger_row(&user, TransactionKind::EarnedCollect, 10, None))
        .collect();
    let mut repo = MockRewardLedgerRepository::new();
    repo.expect_list_for_user()
        .times(1)
        .return_once(move |_| Ok(ledger));

    let balance = make_service(repo).balance(&user).await.expect("balance");
    assert_eq!(balance, 600);
}

#[rstest]
#[case::zero(0, 1)]
#[case::default(10, 10)]
#[case::capped(120, 50)]
#[tokio::test]
async fn recent_transactions_clamps_limit(#[case] requested: u32, #[case] expected: i64) {
    let mut repo = MockRewardLedgerRepository::new();
    repo.expect_list_recent_for_user()
        .times(1)
        .withf(move |_, limit| *limit == expected)
        .return_once(|_, _| Ok(Vec::new()));

    let rows = make_service(repo)
        .recent_transactions(&UserId::random(), requested)
        .await
        .expect("history");
    assert!(rows.is_empty());
}

#[tokio::test]
async fn redeem_appends_debit_and_reports_remaining_balance() {
    let user = UserId::random();
    let remaining = vec![
        ledger_row(&user, TransactionKind::EarnedCollect, 50, None),
        ledger_row(&user, TransactionKind::SpentRedeem, 20, None),
    ];
    let mut repo = MockRewardLedgerRepository::new();
    repo.expect_redeem()
        .times(1)
        .withf(|debit: &RewardTransaction| {
            debit.kind() == &TransactionKind::SpentRedeem
                && debit.amount() == 20
                && debit.description() == "Points redeemed"
        })
        .return_once(|_| Ok(()));
    repo.expect_list_for_user()
        .times(1)
        .return_once(move |_| Ok(remaining));

    let response = make_service(repo)
        .redeem(RedeemRequest {
            user_id: user,
            amount: 20,
            description: "  ".to_owned(),
        })
        .await
        .expect("redeemed");
    assert_eq!(response.balance, 30);
    assert_eq!(response.transaction.amount(), 20);
}

#[tokio::test]
async fn redeem_beyond_balance_conflicts() {
    let mut repo = MockRewardLedgerRepository::new();
    repo.expect_redeem()
        .times(1)
        .return_once(|_| Err(RewardLedgerRepositoryError::insufficient_balance(12_u64)));
    repo.expect_list_for_user().never();

    let error = make_service(repo)
        .redeem(RedeemRequest {
            user_id: UserId::random(),
            amount: 40,
            description: "Voucher".to_owned(),
        })
        .await
        .expect_err("insufficient");
    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.details().expect("details")["available"], 12);
}

#[tokio::test]
async fn redeem_of_zero_points_is_invalid() {
    let mut repo = MockRewardLedgerRepository::new();
    repo.expect_redeem().never();

    let error = make_service(repo)
        .redeem(RedeemRequest {
            user_id: UserId::random(),
            amount: 0,
            description: "Voucher".to_owned(),
        })
        .await
        .expect_err("invalid");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn leaderboard_passes_trimmed_search() {
    let leader = LeaderboardEntry::new(
        1,
        UserId::random(),
        DisplayName::new("Ada").expect("name"),
        250,
    );
    let expected = leader.clone();
    let mut repo = MockRewardLedgerRepository::new();
    repo.expect_leaderboard()
        .times(1)
        .withf(|_, filter| filter.search.as_deref() == Some("ada") && filter.user.is_none())
        .return_once(move |page, _| Ok(Page::new(vec![leader], page, 1)));

    let page = make_service(repo)
        .leaderboard(LeaderboardRequest {
            page: PageRequest::first(10),
            search: Some(" ada ".to_owned()),
            only_user: None,
        })
        .await
        .expect("leaderboard");
    assert_eq!(page.items(), &[expected]);
    assert_eq!(page.items()[0].level, 3);
}

#[rstest]
#[case::blank_search(Some("   "))]
#[case::no_search(None)]
#[tokio::test]
async fn leaderboard_forwards_own_row_filter(#[case] search: Option<&str>) {
    let me = UserId::random();
    let expected_user = me.clone();
    let mut repo = MockRewardLedgerRepository::new();
    repo.expect_leaderboard()
        .times(1)
        .withf(move |_, filter| {
            filter.search.is_none() && filter.user.as_ref() == Some(&expected_user)
        })
        .return_once(|page, _| Ok(Page::new(vec![], page, 0)));

    let page = make_service(repo)
        .leaderboard(LeaderboardRequest {
            page: PageRequest::first(10),
            search: search.map(str::to_owned),
            only_user: Some(me),
        })
        .await
        .expect("leaderboard");
    assert!(page.items().is_empty());
}
