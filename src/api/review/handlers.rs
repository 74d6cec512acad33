use crate::api::models::*;
use axum::{extract::State, http::StatusCode, Json};
use tracing::{error, info};

/// `GET /api/reviews`: every stored review as a JSON array.
pub async fn list_reviews_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReviewResponse>>, AppError> {
    let reviews = state.store.list_all().await.map_err(|err| {
        error!(error = %err, "Error fetching reviews");
        AppError::Internal("Server error fetching reviews.")
    })?;

    info!(count = reviews.len(), "Fetched reviews");

    Ok(Json(reviews.into_iter().map(ReviewResponse::from).collect()))
}

/// `POST /api/reviews`: validate, apply defaults, persist one review.
pub async fn create_review_handler(
    State(state): State<AppState>,
    ReviewJson(submission): ReviewJson,
) -> Result<(StatusCode, Json<ReviewResponse>), AppError> {
    let candidate = submission.validate()?;

    info!(airline = %candidate.airline, "Saving review");

    let saved = state.store.insert(candidate).await.map_err(|err| {
        error!(error = %err, "Error saving review");
        AppError::Internal("Server error saving review.")
    })?;

    info!(id = %saved.id, "Review saved");

    Ok((StatusCode::CREATED, Json(ReviewResponse::from(saved))))
}
