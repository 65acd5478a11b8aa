//! Axum router configuration with middleware.
//!
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, patch, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Accounts
        .route(
            "/characters",
            post(handlers::character::register).get(handlers::character::list),
        )
        .route("/characters/login", post(handlers::character::login))
        .route("/characters/me", get(handlers::character::me))
        .route("/characters/count", get(handlers::character::count))
        .route(
            "/characters/{id}",
            get(handlers::character::get)
                .patch(handlers::character::update)
                .put(handlers::character::replace)
                .delete(handlers::character::delete),
        )
        // Admin
        .route("/admin", post(handlers::admin::register_admin))
        .route("/admin/characters", get(handlers::admin::list_characters))
        // Loadout and progression
        .route("/updatecharacter/{id}", get(handlers::loadout::get_loadout))
        .route(
            "/updatecharacter/{id}/weapon",
            patch(handlers::loadout::equip_weapon).delete(handlers::loadout::unequip_weapon),
        )
        .route(
            "/updatecharacter/{id}/armor",
            patch(handlers::loadout::equip_armor).delete(handlers::loadout::unequip_armor),
        )
        .route(
            "/updatecharacter/{id}/skill",
            patch(handlers::loadout::equip_skill).delete(handlers::loadout::unequip_skill),
        )
        .route(
            "/updatecharacter/{id}/levelup",
            patch(handlers::loadout::level_up),
        )
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
