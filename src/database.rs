// src/database.rs
use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug)]
pub struct DatabaseConfig {
    pub database_path: PathBuf,
    pub pool: Option<SqlitePool>,
}

impl DatabaseConfig {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            database_path,
            pool: None,
        }
    }

    /// Wrap an already connected pool (used by tests and tooling)
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            database_path: PathBuf::from(":memory:"),
            pool: Some(pool),
        }
    }

    /// Initialize the database connection pool
    pub async fn init_pool(&mut self) -> Result<()> {
        if let Some(parent) = self.database_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create database directory")?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", self.database_path.display());

        let pool = SqlitePool::connect(&database_url)
            .await
            .context("Failed to connect to SQLite database")?;
        self.pool = Some(pool);

        info!("Database connection pool initialized: {}", database_url);
        Ok(())
    }

    /// Get the database pool
    pub fn pool(&self) -> Result<&SqlitePool> {
        self.pool
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Database pool not initialized. Call init_pool() first."))
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        let pool = self.pool()?;
        run_migrations(pool).await
    }
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    // Per-user, per-calendar-month AI spend counters
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ai_usage (
            user_email TEXT NOT NULL,
            month TEXT NOT NULL,
            month_usd_limit REAL NOT NULL,
            total_usd_used REAL NOT NULL DEFAULT 0,
            requests INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (user_email, month)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Fire-and-forget download events for the stats dashboard
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS download_events (
            id TEXT PRIMARY KEY,
            format TEXT NOT NULL,
            resume_id TEXT,
            template TEXT,
            user_agent TEXT,
            client_ip TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_download_events_format
        ON download_events(format);
        "#,
    )
    .execute(pool)
    .await?;

    // Helpful/report tallies per review
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS review_feedback (
            review_id TEXT PRIMARY KEY,
            helpful_count INTEGER NOT NULL DEFAULT 0,
            report_count INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database migrations completed successfully");
    Ok(())
}

// A single connection: every `sqlite::memory:` connection is its own database
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    run_migrations(&pool).await.expect("migrations");
    pool
}
