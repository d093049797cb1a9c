use crate::error::AppError;
use crate::models::QuoteResponse;
use crate::persist::PersistFlag;
use crate::state::AppState;
use axum::{body::Bytes, extract::State, Json};
use rate_types::quote::QuoteInput;

pub async fn create_quote(
    State(state): State<AppState>,
    PersistFlag(persist): PersistFlag,
    body: Bytes,
) -> Result<Json<QuoteResponse>, AppError> {
    // 1. Decode; any shape error is a client error regardless of content-type
    let input: QuoteInput = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "rejecting undecodable quote request");
        AppError::BadRequest("invalid request body".into())
    })?;

    // 2. Range checks before any work is scheduled
    if let Err(e) = input.validate() {
        tracing::warn!(route_id = %input.route_id, error = %e, "rejecting invalid quote request");
        return Err(AppError::BadRequest(e.to_string()));
    }

    // 3. Price (and persist) off the async workers; storage calls block
    let engine = state.engine.clone();
    let pricing = state.pricing.clone();
    let outcome = tokio::task::spawn_blocking(move || engine.process(&input, &pricing, persist))
        .await
        .map_err(|e| AppError::InternalError(anyhow::Error::new(e)))??;

    Ok(Json(outcome.result.into()))
}
