use axum::{
    middleware,
    routing::{delete, get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use popflix_core::ContentKind;

use super::{auth, catalog, favorites, handlers, middleware::metrics_middleware, platforms, reviews};
use crate::state::AppState;

/// Routes shared by `/api/movies` and `/api/series`.
///
/// Static segments take precedence over the genre shortcut; `{id}` is an
/// item id everywhere except that shortcut, where it is a genre key.
fn kind_routes(kind: ContentKind) -> Router<Arc<AppState>> {
    Router::new()
        .route("/trending", get(catalog::trending))
        .route("/top-rated", get(catalog::top_rated))
        .route("/genre/{genre}", get(catalog::by_genre))
        .route("/search/{query}", get(catalog::search))
        .route("/user/{user_id}/by-platforms", get(catalog::by_platforms))
        .route("/{id}/details", get(catalog::details))
        .route("/{id}/platforms", get(catalog::item_platforms))
        .route("/{id}/reviews", get(catalog::item_reviews))
        .route("/{id}", get(catalog::by_genre))
        .layer(Extension(kind))
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Platforms
        .route("/platforms", get(platforms::list_platforms))
        .route("/user/{user_id}/platforms", get(platforms::user_platforms))
        .route("/user/{user_id}/platforms", post(platforms::save_user_platforms))
        // Catalog
        .route("/genres", get(catalog::list_genres))
        .route("/weekly-ranking/{user_id}", get(catalog::weekly_ranking))
        .nest("/movies", kind_routes(ContentKind::Movie))
        .nest("/series", kind_routes(ContentKind::Series))
        // Reviews
        .route("/reviews", post(reviews::submit_review))
        // Favorites
        .route("/favorites/{user_id}", get(favorites::list_favorites))
        .route("/favorites/{user_id}", post(favorites::add_favorite))
        .route("/favorites/{user_id}/{item_id}", delete(favorites::remove_favorite))
        // Accounts
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    Router::new()
        .nest("/api", api_routes)
        .route("/metrics", get(handlers::metrics))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
