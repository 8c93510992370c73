use serde::{Deserialize, Serialize};

/// A review references its movie by bare identifier value. Nothing checks
/// that the movie exists, so a review can point at a deleted or never
/// created id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i32,
    #[serde(rename = "movieId")]
    pub movie_id: i32,
    pub review: String,
    pub rating: f32,
    pub date: String,
}
