use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use tracing::info;

use crate::entities::{movies, prelude::*};
use crate::models::movie::{Movie, MovieInput};
use crate::models::review::Review;

use super::review::map_review_model;

pub struct MovieRepository {
    conn: DatabaseConnection,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: movies::Model) -> Movie {
        Movie {
            id: model.id,
            title: model.title,
            year: model.year,
            genre: model.genre,
            actors: serde_json::from_str(&model.actors).unwrap_or_default(),
            image_url: model.image_url,
            created_at: model.created_at.unwrap_or_default(),
        }
    }

    /// Insert a movie and return the stored record with its assigned id.
    /// Field and policy validation happens before this point; the
    /// repository persists what it is given.
    pub async fn add(&self, movie: &MovieInput) -> Result<Movie> {
        let active_model = movies::ActiveModel {
            title: Set(movie.title.clone()),
            year: Set(movie.year.clone()),
            genre: Set(movie.genre.clone()),
            actors: Set(serde_json::to_string(&movie.actors).context("Failed to encode actors")?),
            image_url: Set(movie.image_url.clone()),
            created_at: Set(Some(chrono::Utc::now().to_rfc3339())),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.conn)
            .await
            .context("Failed to insert movie")?;

        info!("Added movie {}: {}", model.id, model.title);
        Ok(Self::map_model(model))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Movie>> {
        let result = Movies::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query movie")?;

        Ok(result.map(Self::map_model))
    }

    /// One movie with every review whose movie_id matches. A movie with no
    /// reviews comes back with an empty list, not `None`.
    pub async fn get_with_reviews(&self, id: i32) -> Result<Option<(Movie, Vec<Review>)>> {
        let mut rows = Movies::find_by_id(id)
            .find_with_related(Reviews)
            .all(&self.conn)
            .await
            .context("Failed to query movie with reviews")?;

        if rows.is_empty() {
            return Ok(None);
        }

        let (movie, review_rows) = rows.remove(0);
        Ok(Some((
            Self::map_model(movie),
            review_rows.into_iter().map(map_review_model).collect(),
        )))
    }

    pub async fn list_all(&self) -> Result<Vec<Movie>> {
        let rows = Movies::find()
            .order_by_asc(movies::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list movies")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Every movie joined with its reviews in a single round trip
    /// (LEFT JOIN, so zero-review movies still appear).
    pub async fn list_all_with_reviews(&self) -> Result<Vec<(Movie, Vec<Review>)>> {
        // find_with_related orders by the movie primary key itself, which
        // doubles as the insertion order here.
        let rows = Movies::find()
            .find_with_related(Reviews)
            .all(&self.conn)
            .await
            .context("Failed to list movies with reviews")?;

        Ok(rows
            .into_iter()
            .map(|(movie, review_rows)| {
                (
                    Self::map_model(movie),
                    review_rows.into_iter().map(map_review_model).collect(),
                )
            })
            .collect())
    }
}
