use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::models::movie::{Movie, MovieInput};
use crate::models::review::Review;

pub mod migrator;
pub mod repositories;

pub use repositories::user::{CreateUserError, User};

/// Single owned handle to the backing store. Each component gets the
/// connection at construction instead of reaching for a global, so tests
/// can point the whole stack at `sqlite::memory:`.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let path_str = db_url.trim_start_matches("sqlite:");
        if !path_str.starts_with(":memory:") {
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn movie_repo(&self) -> repositories::movie::MovieRepository {
        repositories::movie::MovieRepository::new(self.conn.clone())
    }

    fn review_repo(&self) -> repositories::review::ReviewRepository {
        repositories::review::ReviewRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn create_user(
        &self,
        name: Option<&str>,
        username: &str,
        password: &str,
    ) -> Result<User, CreateUserError> {
        self.user_repo().create(name, username, password).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    // ========== Movies ==========

    pub async fn add_movie(&self, movie: &MovieInput) -> Result<Movie> {
        self.movie_repo().add(movie).await
    }

    pub async fn get_movie(&self, id: i32) -> Result<Option<Movie>> {
        self.movie_repo().get(id).await
    }

    pub async fn get_movie_with_reviews(&self, id: i32) -> Result<Option<(Movie, Vec<Review>)>> {
        self.movie_repo().get_with_reviews(id).await
    }

    pub async fn list_movies(&self) -> Result<Vec<Movie>> {
        self.movie_repo().list_all().await
    }

    pub async fn list_movies_with_reviews(&self) -> Result<Vec<(Movie, Vec<Review>)>> {
        self.movie_repo().list_all_with_reviews().await
    }

    // ========== Reviews ==========

    pub async fn add_review(&self, movie_id: i32, review: &str, rating: f32) -> Result<Review> {
        self.review_repo().add(movie_id, review, rating).await
    }

    pub async fn list_reviews(&self) -> Result<Vec<Review>> {
        self.review_repo().list_all().await
    }
}
