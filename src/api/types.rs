use serde::Serialize;

use crate::models::movie::{Actor, Movie};
use crate::models::review::Review;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieDto {
    pub id: i32,
    pub title: String,
    pub year: String,
    pub genre: String,
    pub actors: Vec<Actor>,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub created_at: String,
    /// Present only when the caller asked for the review join. An empty
    /// array means the movie exists and has no reviews.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<ReviewDto>>,
}

impl MovieDto {
    #[must_use]
    pub fn from_movie(movie: Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            year: movie.year,
            genre: movie.genre,
            actors: movie.actors,
            image_url: movie.image_url,
            created_at: movie.created_at,
            reviews: None,
        }
    }

    #[must_use]
    pub fn with_reviews(movie: Movie, reviews: Vec<Review>) -> Self {
        let mut dto = Self::from_movie(movie);
        dto.reviews = Some(reviews.into_iter().map(ReviewDto::from).collect());
        dto
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewDto {
    pub id: i32,
    #[serde(rename = "movieId")]
    pub movie_id: i32,
    pub review: String,
    pub rating: f32,
    pub date: String,
}

impl From<Review> for ReviewDto {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            movie_id: r.movie_id,
            review: r.review,
            rating: r.rating,
            date: r.date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
