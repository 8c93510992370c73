use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use tracing::info;

use crate::entities::{prelude::*, reviews};
use crate::models::review::Review;

pub(super) fn map_review_model(model: reviews::Model) -> Review {
    Review {
        id: model.id,
        movie_id: model.movie_id,
        review: model.review,
        rating: model.rating,
        date: model.date,
    }
}

pub struct ReviewRepository {
    conn: DatabaseConnection,
}

impl ReviewRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert a review, stamping the current time as its date. The movie id
    /// is stored as given; whether it points at a real movie is not checked.
    pub async fn add(&self, movie_id: i32, review: &str, rating: f32) -> Result<Review> {
        let active_model = reviews::ActiveModel {
            movie_id: Set(movie_id),
            review: Set(review.to_string()),
            rating: Set(rating),
            date: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.conn)
            .await
            .context("Failed to insert review")?;

        info!("Added review {} for movie {}", model.id, movie_id);
        Ok(map_review_model(model))
    }

    /// Unfiltered full scan, no pagination.
    pub async fn list_all(&self) -> Result<Vec<Review>> {
        let rows = Reviews::find()
            .order_by_asc(reviews::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list reviews")?;

        Ok(rows.into_iter().map(map_review_model).collect())
    }
}
