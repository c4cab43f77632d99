//! Admin API for provider and settings management

pub mod providers;
pub mod settings;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use super::state::AppState;

pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/providers",
            get(providers::list_providers).post(providers::create_provider),
        )
        .route("/providers/reload", post(providers::reload_providers))
        .route("/providers/{id}", delete(providers::delete_provider))
        .route(
            "/providers/{id}/model",
            put(providers::update_provider_model),
        )
        .route(
            "/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
}
