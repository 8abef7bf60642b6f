use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::session::{make_span_with_session_id, session_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Catalog
        .route("/products", get(handlers::get_products))
        .route("/products/discover", get(handlers::discover_products))
        // Cart
        .route("/cart", get(handlers::get_cart))
        .route("/cart/items", post(handlers::add_cart_item))
        .route("/cart/items/:product_id", delete(handlers::remove_cart_item))
        .route("/cart/clear", post(handlers::clear_cart))
        .route("/cart/bundles", post(handlers::add_bundle))
        // Bundles
        .route("/bundles", get(handlers::get_bundles))
        // Recommendations
        .route("/recommendations", get(handlers::get_recommendations))
        // Statistics
        .route("/stats", get(handlers::get_stats))
        // Admin
        .route("/admin/reload", post(handlers::reload_engine))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_session_id))
        // Session resolution runs before the trace layer so the span sees it
        .layer(middleware::from_fn(session_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
