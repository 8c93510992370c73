use axum::{Json, extract::State};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, ReviewDto};
use crate::api::validation::validate_review;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReviewRequest {
    #[serde(default, rename = "movieId")]
    pub movie_id: Option<i32>,
    #[serde(default)]
    pub review: String,
    #[serde(default)]
    pub rating: Option<f32>,
}

/// GET /reviews
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ReviewDto>>>, ApiError> {
    let reviews = state
        .store()
        .list_reviews()
        .await?
        .into_iter()
        .map(ReviewDto::from)
        .collect();

    Ok(Json(ApiResponse::success(reviews)))
}

/// POST /reviews
/// The movie id is stored as given; a reference to a nonexistent movie is
/// accepted (it simply never shows up in any join).
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<Json<ApiResponse<ReviewDto>>, ApiError> {
    let (movie_id, review, rating) = validate_review(&payload)?;

    let created = state.store().add_review(movie_id, review, rating).await?;

    Ok(Json(ApiResponse::success(ReviewDto::from(created))))
}
