//! Public v1 API

pub mod recognize;

use axum::{Router, routing::post};

use super::state::AppState;

pub fn create_v1_router() -> Router<AppState> {
    Router::new().route("/recognize", post(recognize::recognize))
}
