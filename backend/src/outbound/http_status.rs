//! Status and body helpers shared by the reqwest-backed adapters.

use reqwest::StatusCode;

/// How a non-success upstream status should be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UpstreamFailure {
    RateLimited,
    Timeout,
    InvalidRequest,
    Transport,
}

impl UpstreamFailure {
    /// 429 is throttling, 408/504 are timeouts, other 4xx are our fault.
    pub(crate) fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => Self::Timeout,
            _ if status.is_client_error() => Self::InvalidRequest,
            _ => Self::Transport,
        }
    }
}

/// `status <code>[: <preview>]` message for a failed upstream call.
pub(crate) fn status_message(status: StatusCode, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    }
}

/// Whitespace-compacted body prefix for error messages.
pub(crate) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
