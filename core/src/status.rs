//! Status-code classification.
//!
//! The accepted range is `[200, 310)`, wider than the usual 2xx. Anything else
//! is an error whose body is read as JSON.

use std::ops::Range;

use serde_json::Value;

use crate::error::ClientError;
use crate::http::{HttpMethod, ResponseEnvelope};

pub const ACCEPTED_STATUS: Range<u16> = 200..310;

pub fn is_accepted(status: u16) -> bool {
    ACCEPTED_STATUS.contains(&status)
}

/// Check `response.status`.
///
/// An accepted response is handed back unread. Otherwise the body is consumed
/// as JSON and returned inside `ClientError::Status`; a body that is not JSON
/// yields `ClientError::Json` instead.
pub async fn validate_status(
    response: ResponseEnvelope,
    url: &str,
    method: HttpMethod,
) -> Result<ResponseEnvelope, ClientError> {
    if is_accepted(response.status) {
        return Ok(response);
    }
    let status = response.status;
    let payload: Value = response.json().await?;
    tracing::warn!(%method, url, status, "request failed");
    Err(ClientError::Status {
        method,
        url: url.to_string(),
        status,
        payload,
    })
}
