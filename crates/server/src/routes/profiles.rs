use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    Json,
};
use models::profile::{Profile, ProfileUpdate};
use serde::Deserialize;
use service::profiles::AssetUpload;

use crate::errors::JsonApiError;
use crate::state::AppState;

pub async fn get_profile(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Profile>, JsonApiError> {
    state.profiles.get_profile(&id).await.map(Json).ok_or_else(|| JsonApiError::not_found("profile"))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ProfileUpdate>,
) -> Result<Json<Profile>, JsonApiError> {
    Ok(Json(state.profiles.update_profile(&id, patch).await?))
}

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub file_name: String,
}

/// Raw-body avatar upload for an existing profile; the stored public URL
/// becomes its `avatar_url`.
pub async fn upload_avatar(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Profile>, JsonApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let upload = AssetUpload { file_name: params.file_name, content_type, bytes: body.to_vec() };
    Ok(Json(state.profiles.set_avatar(&id, upload).await?))
}
