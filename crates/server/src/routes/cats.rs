use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use models::cat::{Cat, CatStatus};
use serde::Deserialize;
use service::adapters::CatSummary;

use crate::errors::JsonApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CatFilter {
    pub status: Option<String>,
}

/// Listing cards, optionally restricted to one status (case-insensitive).
pub async fn list_cats(
    State(state): State<AppState>,
    Query(filter): Query<CatFilter>,
) -> Result<Json<Vec<CatSummary>>, JsonApiError> {
    let cats = match filter.status.as_deref() {
        Some(raw) => {
            let status: CatStatus = raw
                .parse()
                .map_err(|e: models::errors::ModelError| {
                    JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.to_string()))
                })?;
            state.cats.get_by_status(status).await
        }
        None => state.cats.get_all().await,
    };
    Ok(Json(cats.iter().map(CatSummary::from).collect()))
}

pub async fn get_cat(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Cat>, JsonApiError> {
    state.cats.get_by_id(&id).await.map(Json).ok_or_else(|| JsonApiError::not_found("cat"))
}
