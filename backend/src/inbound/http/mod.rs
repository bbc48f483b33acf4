//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod dto;
pub mod error;
pub mod geocoding;
pub mod health;
pub mod impact;
pub mod notifications;
pub mod reports;
pub mod rewards;
pub mod schemas;
pub mod session;
pub mod state;
pub mod tasks;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register every `/api/v1` handler on a scope, together with the extractor
/// settings that map malformed input onto the shared error envelope.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use cleanbee::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .app_data(error::query_config())
        .app_data(error::path_config())
        .service(users::login)
        .service(users::logout)
        .service(users::current_user)
        .service(reports::classify_image)
        .service(reports::recent_reports)
        .service(reports::submit_report)
        .service(impact::impact_summary)
        .service(tasks::list_tasks)
        .service(tasks::claim_task)
        .service(tasks::verify_task)
        .service(rewards::balance)
        .service(rewards::recent_transactions)
        .service(rewards::redeem)
        .service(rewards::leaderboard)
        .service(notifications::list_unread)
        .service(notifications::mark_read)
        .service(geocoding::search)
        .service(geocoding::reverse);
}
