use crate::handlers::{orders, trades};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/orders", post(orders::place_order))
        .route(
            "/orders/:id",
            get(orders::get_order).delete(orders::cancel_order),
        )
        .route("/orderbook", get(orders::get_order_book))
        .route("/trades", get(trades::list_trades))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}
