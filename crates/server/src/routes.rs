pub mod cats;
pub mod contact;
pub mod profiles;
pub mod sitemap;
pub mod vets;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::state::AppState;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/api/cats", get(cats::list_cats))
        .route("/api/cats/:id", get(cats::get_cat))
        .route("/api/vets", get(vets::list_vets))
        .route("/api/vets/:id", get(vets::get_vet))
        .route("/api/profiles/:id", get(profiles::get_profile).patch(profiles::update_profile))
        .route("/api/profiles/:id/avatar", post(profiles::upload_avatar))
        .route("/api/contact", post(contact::submit));

    Router::new()
        .route("/health", get(health))
        .route("/sitemap.xml", get(sitemap::sitemap))
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
