//! Request body buffering for guards that inspect JSON fields.
//!
//! The body is read once, parsed leniently, and put back so the handler can
//! still extract it.

use std::error::Error as StdError;

use axum::{body::Body, extract::Request};
use http_body_util::LengthLimitError;
use serde_json::{Map, Value};

use crate::error::AppError;

/// Read the whole body (bounded by `limit`) and return the rebuilt request with the
/// top-level JSON object fields. Non-JSON or non-object bodies yield no fields.
pub(super) async fn buffer_json(
    req: Request,
    limit: usize,
) -> Result<(Request, Map<String, Value>), AppError> {
    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|err| {
            if exceeds_limit(&err) {
                AppError::PayloadTooLarge
            } else {
                AppError::Body(err)
            }
        })?;

    let fields = match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };

    Ok((Request::from_parts(parts, Body::from(bytes)), fields))
}

// The limit may trip here or in the RequestBodyLimitLayer wrapping the body, so walk the chain.
fn exceeds_limit(err: &axum::Error) -> bool {
    std::iter::successors(Some(err as &(dyn StdError + 'static)), |e| StdError::source(*e))
        .any(|e| e.is::<LengthLimitError>())
}

pub(super) fn string_field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}
