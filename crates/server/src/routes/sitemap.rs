use axum::{extract::State, http::header, response::IntoResponse};
use service::sitemap::build_sitemap;

use crate::state::AppState;

pub async fn sitemap(State(state): State<AppState>) -> impl IntoResponse {
    let ids: Vec<String> = state.cats.get_all().await.into_iter().map(|c| c.id).collect();
    ([(header::CONTENT_TYPE, "application/xml")], build_sitemap(&state.site_base_url, &ids))
}
