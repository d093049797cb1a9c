use axum::{
    extract::{FromRequestParts, Query},
    http::{request::Parts, HeaderMap, Uri},
};
use std::convert::Infallible;

pub const PERSIST_HEADER: &str = "x-persist";
pub const PERSIST_QUERY_PARAM: &str = "persist";

/// Whether the caller asked for the quote to be recorded.
///
/// Read from the `X-Persist` header, falling back to the `persist` query
/// parameter. Absent or unparsable values mean `false`; this extractor never
/// rejects a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistFlag(pub bool);

impl<S> FromRequestParts<S> for PersistFlag
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(PersistFlag(persist_requested(&parts.headers, &parts.uri)))
    }
}

pub fn persist_requested(headers: &HeaderMap, uri: &Uri) -> bool {
    if let Some(value) = headers.get(PERSIST_HEADER) {
        if !value.is_empty() {
            return value.to_str().ok().and_then(parse_bool).unwrap_or(false);
        }
    }

    // first occurrence wins when the key is repeated
    let pairs = Query::<Vec<(String, String)>>::try_from_uri(uri)
        .map(|Query(pairs)| pairs)
        .unwrap_or_default();
    match pairs.iter().find(|(key, _)| key == PERSIST_QUERY_PARAM) {
        Some((_, value)) if !value.is_empty() => parse_bool(value).unwrap_or(false),
        _ => false,
    }
}

/// Accepts `1 t T true TRUE True` and `0 f F false FALSE False`.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
