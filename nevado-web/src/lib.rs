use axum::{http::Method, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod catalog;
pub mod cookie_store;
pub mod error;
pub mod pages;
pub mod state;

pub use cookie_store::CookieStore;
pub use error::AppError;
pub use state::AppState;

pub const PAYMENT_RESULT_PATH: &str = "/payment-result";

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .merge(catalog::routes())
        .route(&state.bridge_path, get(pages::payment_bridge))
        .route(PAYMENT_RESULT_PATH, get(pages::payment_result))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
