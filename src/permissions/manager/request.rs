/*!
 * Request Identity
 * Caller ID and policy extraction from request headers
 */

use crate::core::limits::{ANONYMOUS_USER_ID_LEN, X_USER_ID, X_USER_PERMISSIONS};
use crate::permissions::policy::Permissions;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http::HeaderMap;
use thiserror::Error;
use uuid::Uuid;

/// Why a permission header could not be used
#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("header value is not visible ASCII")]
    NotAscii,

    #[error("base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("policy decode failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode a base64 (standard alphabet) JSON policy
pub fn decode_permissions(value: &str) -> Result<Permissions, HeaderError> {
    let raw = STANDARD.decode(value.trim())?;
    Ok(serde_json::from_slice(&raw)?)
}

/// Policy carried by the request, `None` when the header is absent
pub(crate) fn header_permissions(headers: &HeaderMap) -> Option<Result<Permissions, HeaderError>> {
    let value = headers.get(X_USER_PERMISSIONS)?;
    Some(
        value
            .to_str()
            .map_err(|_| HeaderError::NotAscii)
            .and_then(decode_permissions),
    )
}

/// First non-empty caller ID, or a fresh random one
///
/// Header names are case-insensitive, so `X-User-ID` and `X-User-Id` are
/// the same lookup. Anonymous IDs are never reused, which bypasses the cache.
pub fn user_id(headers: &HeaderMap) -> String {
    headers
        .get_all(X_USER_ID)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(anonymous_id)
}

fn anonymous_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(ANONYMOUS_USER_ID_LEN);
    id
}
