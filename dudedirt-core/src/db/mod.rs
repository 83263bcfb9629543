// dudedirt-core/src/db/mod.rs

use sqlx::{Pool, Sqlite, SqlitePool};
use tracing::info;

use crate::Error;

pub mod seed;

/// Thin wrapper around the SQLite pool.
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Open (creating if missing) the database at `database_path`, or an
    /// in-memory database when the path is `":memory:"`.
    pub async fn new(database_path: &str) -> Result<Self, Error> {
        if database_path == ":memory:" {
            let pool = SqlitePool::connect("sqlite::memory:").await?;
            return Ok(Self { pool });
        }

        let absolute_path = std::env::current_dir()?.join(database_path);
        if let Some(parent) = absolute_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Well-formed file URI; `mode=rwc` creates the file on first run.
        let mut uri_path = absolute_path.to_string_lossy().replace('\\', "/");
        if !uri_path.starts_with('/') {
            uri_path = format!("/{}", uri_path);
        }
        let db_uri = format!("sqlite://{}?mode=rwc", uri_path);

        info!("Connecting to SQLite database at {}", db_uri);
        let pool = SqlitePool::connect(&db_uri).await?;
        Ok(Self { pool })
    }

    /// Run migrations in the `migrations/` folder.
    pub async fn migrate(&self) -> Result<(), Error> {
        info!("Applying migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Migrations applied successfully.");
        Ok(())
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub fn from_pool(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}
