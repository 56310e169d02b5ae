use axum::Router;

pub mod reconcile;

/// Create the main API router
pub fn create_router() -> Router {
    Router::new().nest("/reconcile", reconcile::create_router())
}
