use crate::handlers::{assets, health, history};
use crate::state::AppState;
use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let asset_routes = Router::new()
        .route("/assets", get(assets::list_assets))
        .route("/assets/{id}", get(assets::get_asset))
        .route("/assets/{id}/history", get(history::get_history));

    Router::new()
        .route("/", get(health))
        .merge(asset_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
