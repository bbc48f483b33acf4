//! Reward balance, ledger history, redemption and leaderboard handlers.
//!
//! ```text
//! GET /api/v1/rewards/balance
//! GET /api/v1/rewards/transactions?limit=10
//! POST /api/v1/rewards/redeem {"amount":50,"description":"Reusable bottle"}
//! GET /api/v1/leaderboard?page=1&perPage=10&search=ada
//! GET /api/v1/leaderboard?mine=true
//! ```

use actix_web::{HttpRequest, get, post, web};
use pagination::PageRequest;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::Error;
use crate::domain::ports::{
    LEADERBOARD_PER_PAGE, LeaderboardRequest, RECENT_TRANSACTIONS_LIMIT, RECENT_TRANSACTIONS_MAX,
    RedeemRequest,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{LeaderboardEntryDto, PageDto, RewardTransactionDto};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    AMOUNT, ErrorCode, FieldName, LIMIT, field_error, pagination_error,
};

const DESCRIPTION: FieldName = FieldName::new("description");

/// Largest redeemable amount; ledger amounts are stored as `INTEGER`.
const MAX_REDEEM_AMOUNT: u32 = i32::MAX.unsigned_abs();

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceDto {
    pub balance: u64,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsParams {
    /// Number of rows, 1 to 50. Defaults to 10.
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedeemBody {
    #[schema(example = 50)]
    pub amount: u32,
    #[schema(example = "Reusable water bottle")]
    pub description: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedeemResponseDto {
    pub transaction: RewardTransactionDto,
    pub balance: u64,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardParams {
    pub page: Option<u32>,
    /// Page size, 1 to 100. Defaults to 10.
    pub per_page: Option<u32>,
    /// Case-insensitive display-name filter.
    pub search: Option<String>,
    /// Only the signed-in user's row, at their overall rank. Requires a session.
    pub mine: Option<bool>,
}

fn transactions_limit(limit: Option<u32>) -> Result<u32, Error> {
    match limit.unwrap_or(RECENT_TRANSACTIONS_LIMIT) {
        value @ 1..=RECENT_TRANSACTIONS_MAX => Ok(value),
        _ => Err(field_error(
            LIMIT,
            ErrorCode::OutOfRange,
            format!("limit must be between 1 and {RECENT_TRANSACTIONS_MAX}"),
        )),
    }
}

impl RedeemBody {
    fn validate(self) -> Result<(u32, String), Error> {
        if self.amount == 0 {
            return Err(field_error(
                AMOUNT,
                ErrorCode::OutOfRange,
                "amount must be positive",
            ));
        }
        if self.amount > MAX_REDEEM_AMOUNT {
            return Err(field_error(
                AMOUNT,
                ErrorCode::OutOfRange,
                format!("amount must not exceed {MAX_REDEEM_AMOUNT}"),
            ));
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(field_error(
                DESCRIPTION,
                ErrorCode::InvalidValue,
                "description must not be empty",
            ));
        }
        Ok((self.amount, description.to_owned()))
    }
}

/// Current balance of the signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/rewards/balance",
    responses(
        (status = 200, description = "Balance", body = BalanceDto),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["rewards"],
    operation_id = "rewardBalance"
)]
#[get("/rewards/balance")]
pub async fn balance(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<BalanceDto>> {
    let user_id = session.require_user_id()?;
    let balance = state.rewards_query.balance(&user_id).await?;
    Ok(web::Json(BalanceDto { balance }))
}

/// Newest ledger rows of the signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/rewards/transactions",
    params(TransactionsParams),
    responses(
        (status = 200, description = "Ledger rows", body = [RewardTransactionDto]),
        (status = 400, description = "Invalid limit", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["rewards"],
    operation_id = "rewardTransactions"
)]
#[get("/rewards/transactions")]
pub async fn recent_transactions(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<TransactionsParams>,
) -> ApiResult<web::Json<Vec<RewardTransactionDto>>> {
    let user_id = session.require_user_id()?;
    let limit = transactions_limit(params.limit)?;
    let rows = state
        .rewards_query
        .recent_transactions(&user_id, limit)
        .await?;
    Ok(web::Json(rows.iter().map(RewardTransactionDto::from).collect()))
}

/// Spend points. Fails with `409` when the balance does not cover them.
#[utoipa::path(
    post,
    path = "/api/v1/rewards/redeem",
    request_body = RedeemBody,
    responses(
        (status = 200, description = "Debit recorded", body = RedeemResponseDto),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Insufficient balance", body = ErrorSchema)
    ),
    tags = ["rewards"],
    operation_id = "redeemRewards"
)]
#[post("/rewards/redeem")]
pub async fn redeem(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RedeemBody>,
) -> ApiResult<web::Json<RedeemResponseDto>> {
    let user_id = session.require_user_id()?;
    let (amount, description) = payload.into_inner().validate()?;
    let response = state
        .rewards
        .redeem(RedeemRequest {
            user_id,
            amount,
            description,
        })
        .await?;
    Ok(web::Json(RedeemResponseDto {
        transaction: RewardTransactionDto::from(&response.transaction),
        balance: response.balance,
    }))
}

/// Contributors ranked by points earned.
#[utoipa::path(
    get,
    path = "/api/v1/leaderboard",
    params(LeaderboardParams),
    responses(
        (status = 200, description = "Leaderboard page", body = PageDto<LeaderboardEntryDto>),
        (status = 400, description = "Invalid paging", body = ErrorSchema),
        (status = 401, description = "`mine=true` without a session", body = ErrorSchema)
    ),
    tags = ["rewards"],
    operation_id = "leaderboard",
    security([])
)]
#[get("/leaderboard")]
pub async fn leaderboard(
    state: web::Data<HttpState>,
    req: HttpRequest,
    session: SessionContext,
    params: web::Query<LeaderboardParams>,
) -> ApiResult<web::Json<PageDto<LeaderboardEntryDto>>> {
    let LeaderboardParams {
        page,
        per_page,
        search,
        mine,
    } = params.into_inner();
    let page =
        PageRequest::from_query(page, per_page, LEADERBOARD_PER_PAGE).map_err(pagination_error)?;
    let only_user = if mine.unwrap_or(false) {
        Some(session.require_user_id()?)
    } else {
        None
    };
    let entries = state
        .rewards_query
        .leaderboard(LeaderboardRequest {
            page,
            search,
            only_user,
        })
        .await?
        .with_links(&req.full_url());
    Ok(web::Json(PageDto::from_page(&entries, |entry| {
        LeaderboardEntryDto::from(entry)
    })))
}
