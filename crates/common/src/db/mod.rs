//! Database layer for Shikshak Sarthi
//!
//! Provides:
//! - SeaORM entity models
//! - The `Store` abstraction used by every handler
//! - A Postgres repository and an in-memory store implementing it
//! - Connection pool management and startup migrations

mod memory;
pub mod models;
mod repository;

pub use memory::MemoryStore;
pub use repository::Repository;

use crate::config::DatabaseConfig;
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use models::{AdminComment, Appraisal, Publication, User};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

/// Filters for listing appraisals. `None` means "any".
#[derive(Debug, Clone, Default)]
pub struct AppraisalFilter {
    pub faculty_id: Option<Uuid>,
    pub status: Option<String>,
    pub academic_year: Option<String>,
}

impl AppraisalFilter {
    pub fn matches(&self, appraisal: &Appraisal) -> bool {
        self.faculty_id.map_or(true, |id| appraisal.faculty_id == id)
            && self.status.as_deref().map_or(true, |s| appraisal.status == s)
            && self
                .academic_year
                .as_deref()
                .map_or(true, |y| appraisal.academic_year == y)
    }
}

/// Filters for listing publications
#[derive(Debug, Clone, Default)]
pub struct PublicationFilter {
    pub faculty_id: Option<Uuid>,
    pub source: Option<String>,
    pub year: Option<i32>,
}

impl PublicationFilter {
    pub fn matches(&self, publication: &Publication) -> bool {
        self.faculty_id.map_or(true, |id| publication.faculty_id == id)
            && self.source.as_deref().map_or(true, |s| publication.source == s)
            && self.year.map_or(true, |y| publication.year == Some(y))
    }
}

/// Persistence operations used by the API.
///
/// Updates replace the whole row; concurrent writers are last-write-wins.
/// Lists are ordered: users and appraisals newest first, comments oldest first,
/// publications by year descending.
#[async_trait]
pub trait Store: Send + Sync {
    /// Check the backing store is reachable
    async fn ping(&self) -> Result<()>;

    async fn insert_user(&self, user: User) -> Result<User>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>>;
    /// Lookup by (already lowercased) email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list_users(&self) -> Result<Vec<User>>;
    async fn update_user(&self, user: User) -> Result<User>;
    /// Returns false if no such user existed
    async fn delete_user(&self, id: Uuid) -> Result<bool>;
    async fn count_users(&self) -> Result<u64>;

    async fn insert_appraisal(&self, appraisal: Appraisal) -> Result<Appraisal>;
    async fn find_appraisal(&self, id: Uuid) -> Result<Option<Appraisal>>;
    async fn list_appraisals(&self, filter: &AppraisalFilter) -> Result<Vec<Appraisal>>;
    async fn update_appraisal(&self, appraisal: Appraisal) -> Result<Appraisal>;

    async fn insert_comment(&self, comment: AdminComment) -> Result<AdminComment>;
    async fn list_comments(&self, appraisal_id: Uuid) -> Result<Vec<AdminComment>>;

    async fn insert_publications(&self, publications: Vec<Publication>) -> Result<Vec<Publication>>;
    async fn list_publications(&self, filter: &PublicationFilter) -> Result<Vec<Publication>>;
}

/// Database connection pool wrapper
#[derive(Clone)]
pub struct DbPool {
    pub primary: DatabaseConnection,
}

impl DbPool {
    /// Create a new database pool from configuration
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to database...");

        let mut opts = ConnectOptions::new(&config.url);
        opts.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .sqlx_logging(true);

        let primary = Database::connect(opts)
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Failed to connect: {}", e),
            })?;

        info!("Database connection established");

        Ok(Self { primary })
    }

    pub fn conn(&self) -> &DatabaseConnection {
        &self.primary
    }

    /// Apply pending SQL migrations from `dir`
    pub async fn migrate(&self, dir: &str) -> Result<()> {
        let migrator = sqlx::migrate::Migrator::new(Path::new(dir))
            .await
            .map_err(|e| AppError::Internal {
                message: format!("Failed to load migrations from {}: {}", dir, e),
            })?;

        migrator
            .run(self.primary.get_postgres_connection_pool())
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Migration failed: {}", e),
            })?;

        info!(dir = %dir, "Migrations applied");
        Ok(())
    }

    /// Ping the database to check connectivity
    pub async fn ping(&self) -> Result<()> {
        self.primary
            .execute_unprepared("SELECT 1")
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Ping failed: {}", e),
            })?;
        Ok(())
    }
}
