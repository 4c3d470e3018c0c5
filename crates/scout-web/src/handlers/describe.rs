//! Species description proxy.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribeRequest {
    pub species: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescribeResponse {
    pub description: String,
}

/// POST /api/describe - one-sentence description of a species
pub async fn describe(
    State(state): State<SharedState>,
    payload: Result<Json<DescribeRequest>, JsonRejection>,
) -> Result<Json<DescribeResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    if req.species.trim().is_empty() {
        return Err(ApiError::BadRequest("`species` must not be empty".to_string()));
    }

    match state.describer.describe(&req.species).await {
        Ok(description) => Ok(Json(DescribeResponse { description })),
        Err(e) => {
            tracing::error!(species = %req.species, error = %e, "description upstream failed");
            Err(ApiError::DescriptionFailed)
        }
    }
}
