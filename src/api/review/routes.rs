use crate::api::models::AppState;
use crate::api::review::handlers::{create_review_handler, list_reviews_handler};
use axum::{routing::get, Router};

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/api/reviews",
        get(list_reviews_handler).post(create_review_handler),
    )
}
