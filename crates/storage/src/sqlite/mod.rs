use std::sync::Arc;
use std::time::Duration;

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use thiserror::Error;

use crate::repository::{
    AppSettingsRepository, AttemptLogRepository, LessonRepository, Storage,
};

mod app_settings_repo;
mod attempt_log_repo;
mod lesson_repo;
mod mapping;
mod migrate;

/// `sqlx`-backed repository implementing the lesson, attempt-log and
/// settings traits over one shared pool.
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl SqliteRepository {
    /// Open a pool against `database_url`.
    ///
    /// Every connection enables foreign keys, WAL journaling and a busy
    /// timeout so the desktop process and the seed bin can share a file.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` when the pool cannot connect or a setup
    /// PRAGMA fails.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    for pragma in [
                        "PRAGMA foreign_keys = ON;",
                        "PRAGMA journal_mode = WAL;",
                        "PRAGMA busy_timeout = 5000;",
                    ] {
                        sqlx::query(pragma).execute(&mut *conn).await?;
                    }
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Bring the schema up to the current version.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` when a migration statement fails.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }
}

impl Storage {
    /// `Storage` over a connected and migrated sqlite database.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` when connecting or migrating fails.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let repo = SqliteRepository::connect(database_url).await?;
        repo.migrate().await?;
        let lessons: Arc<dyn LessonRepository> = Arc::new(repo.clone());
        let attempts: Arc<dyn AttemptLogRepository> = Arc::new(repo.clone());
        let settings: Arc<dyn AppSettingsRepository> = Arc::new(repo);
        Ok(Self {
            lessons,
            attempts,
            settings,
        })
    }
}
