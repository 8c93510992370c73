use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, MovieDto};
use crate::api::validation::{parse_movie_id, validate_movie};
use crate::models::movie::{Actor, MovieInput};

/// `?reviews=true` switches the responses to the joined shape.
#[derive(Debug, Deserialize)]
pub struct MovieQuery {
    #[serde(default)]
    pub reviews: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMovieRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub actors: Vec<Actor>,
    #[serde(default, rename = "imageURL")]
    pub image_url: String,
}

/// GET /movies
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MovieQuery>,
) -> Result<Json<ApiResponse<Vec<MovieDto>>>, ApiError> {
    let movies = if query.reviews {
        state
            .store()
            .list_movies_with_reviews()
            .await?
            .into_iter()
            .map(|(movie, reviews)| MovieDto::with_reviews(movie, reviews))
            .collect()
    } else {
        state
            .store()
            .list_movies()
            .await?
            .into_iter()
            .map(MovieDto::from_movie)
            .collect()
    };

    Ok(Json(ApiResponse::success(movies)))
}

/// GET /movies/{id}
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    Query(query): Query<MovieQuery>,
) -> Result<Json<ApiResponse<MovieDto>>, ApiError> {
    let id = parse_movie_id(&raw_id)?;

    let movie = if query.reviews {
        state
            .store()
            .get_movie_with_reviews(id)
            .await?
            .map(|(movie, reviews)| MovieDto::with_reviews(movie, reviews))
    } else {
        state.store().get_movie(id).await?.map(MovieDto::from_movie)
    };

    movie
        .map(|dto| Json(ApiResponse::success(dto)))
        .ok_or_else(|| ApiError::movie_not_found(id))
}

/// POST /movies
/// Validates against the configured catalog policy before anything is
/// written, so a rejected request leaves the store untouched.
pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateMovieRequest>,
) -> Result<Json<ApiResponse<MovieDto>>, ApiError> {
    let policy = state.config().read().await.catalog.clone();
    validate_movie(&payload, &policy)?;

    let input = MovieInput {
        title: payload.title,
        year: payload.year,
        genre: payload.genre,
        actors: payload.actors,
        image_url: payload.image_url,
    };

    let movie = state.store().add_movie(&input).await?;

    Ok(Json(ApiResponse::success(MovieDto::from_movie(movie))))
}
