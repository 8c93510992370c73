use super::ApiError;
use super::movies::CreateMovieRequest;
use super::reviews::CreateReviewRequest;
use crate::config::CatalogConfig;

/// Movie ids are positive integers. Anything else is a malformed
/// identifier, reported distinctly from a lookup miss.
pub fn parse_movie_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::invalid_identifier(raw))
}

pub fn validate_movie(req: &CreateMovieRequest, policy: &CatalogConfig) -> Result<(), ApiError> {
    if req.title.is_empty() {
        return Err(ApiError::validation("title is required"));
    }

    if req.year.is_empty() {
        return Err(ApiError::validation("year is required"));
    }

    if req.image_url.is_empty() {
        return Err(ApiError::validation("imageURL is required"));
    }

    if req.genre.is_empty() {
        return Err(ApiError::validation("genre is required"));
    }

    if !policy.allows_genre(&req.genre) {
        return Err(ApiError::validation(format!(
            "genre '{}' is not allowed; expected one of: {}",
            req.genre,
            policy.allowed_genres.join(", ")
        )));
    }

    if req.actors.len() < policy.min_actors {
        return Err(ApiError::validation(format!(
            "a movie must have at least {} actor(s)",
            policy.min_actors
        )));
    }

    if req
        .actors
        .iter()
        .any(|a| a.actor_name.is_empty() || a.character_name.is_empty())
    {
        return Err(ApiError::validation(
            "every actor needs an actorName and a characterName",
        ));
    }

    Ok(())
}

pub fn validate_review(req: &CreateReviewRequest) -> Result<(i32, &str, f32), ApiError> {
    let movie_id = req
        .movie_id
        .ok_or_else(|| ApiError::validation("movieId is required"))?;

    if req.review.is_empty() {
        return Err(ApiError::validation("review text is required"));
    }

    let rating = req
        .rating
        .ok_or_else(|| ApiError::validation("rating is required and must be a number"))?;

    Ok((movie_id, &req.review, rating))
}
