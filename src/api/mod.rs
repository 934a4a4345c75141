use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod routes;
pub mod server;

use routes::{customer_handler, register_handler, AppState};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/register", post(register_handler))
        .route("/api/customer/:phone", get(customer_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
