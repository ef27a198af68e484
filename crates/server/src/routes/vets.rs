use axum::{extract::{Path, Query, State}, Json};
use models::vet::VetClinic;
use serde::{Deserialize, Serialize};
use service::fallback::Origin;

use crate::errors::JsonApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VetFilter {
    pub district: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VetList {
    pub source: Origin,
    pub vets: Vec<VetClinic>,
}

pub async fn list_vets(State(state): State<AppState>, Query(filter): Query<VetFilter>) -> Json<VetList> {
    let resolved = match filter.district.as_deref() {
        Some(district) => state.vets.load_by_district(district).await,
        None => state.vets.load().await,
    };
    Json(VetList { source: resolved.origin, vets: resolved.items })
}

pub async fn get_vet(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<VetClinic>, JsonApiError> {
    state.vets.get_by_id(&id).await.map(Json).ok_or_else(|| JsonApiError::not_found("vet"))
}
