use axum::{extract::State, Json};
use service::contact::{ContactForm, RelayOutcome};

use crate::state::AppState;

/// Always 200; `success` in the body tells the caller what happened.
pub async fn submit(State(state): State<AppState>, Json(form): Json<ContactForm>) -> Json<RelayOutcome> {
    Json(state.relay.submit(form).await)
}
