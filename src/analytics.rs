// src/analytics.rs
//! Best-effort counters behind the download and review dashboards.
//! No ordering or exactly-once guarantees; a lost event is acceptable.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FormatCount {
    pub format: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TemplateCount {
    pub template: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DownloadStats {
    pub total: i64,
    #[serde(rename = "byFormat")]
    pub by_format: Vec<FormatCount>,
    #[serde(rename = "byTemplate")]
    pub by_template: Vec<TemplateCount>,
}

pub struct DownloadEventRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DownloadEventRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a single download. Caller validates the format first.
    pub async fn record(
        &self,
        format: &str,
        resume_id: Option<&str>,
        template: Option<&str>,
        user_agent: Option<&str>,
        client_ip: Option<&str>,
    ) -> Result<String> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO download_events
                (id, format, resume_id, template, user_agent, client_ip, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(format)
        .bind(resume_id)
        .bind(template)
        .bind(user_agent)
        .bind(client_ip)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;

        info!("Recorded {} download event {}", format, id);
        Ok(id)
    }

    pub async fn stats(&self) -> Result<DownloadStats> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM download_events")
            .fetch_one(self.pool)
            .await?;

        let by_format = sqlx::query_as::<_, FormatCount>(
            r#"
            SELECT format, COUNT(*) as count
            FROM download_events
            GROUP BY format
            ORDER BY count DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        let by_template = sqlx::query_as::<_, TemplateCount>(
            r#"
            SELECT COALESCE(template, 'unknown') as template, COUNT(*) as count
            FROM download_events
            GROUP BY COALESCE(template, 'unknown')
            ORDER BY count DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(DownloadStats {
            total: total.0,
            by_format,
            by_template,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReviewFeedback {
    pub review_id: String,
    pub helpful_count: i64,
    pub report_count: i64,
    pub updated_at: DateTime<Utc>,
}

pub struct ReviewFeedbackRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ReviewFeedbackRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn mark_helpful(&self, review_id: &str) -> Result<ReviewFeedback> {
        self.bump(review_id, "helpful_count").await
    }

    pub async fn report(&self, review_id: &str) -> Result<ReviewFeedback> {
        self.bump(review_id, "report_count").await
    }

    // Unknown review ids get a fresh row; same upsert shape as the usage meter
    async fn bump(&self, review_id: &str, column: &str) -> Result<ReviewFeedback> {
        let sql = format!(
            r#"
            INSERT INTO review_feedback (review_id, {col}, updated_at)
            VALUES (?, 1, ?)
            ON CONFLICT(review_id) DO UPDATE SET
                {col} = {col} + 1,
                updated_at = excluded.updated_at
            "#,
            col = column
        );

        sqlx::query(&sql)
            .bind(review_id)
            .bind(Utc::now())
            .execute(self.pool)
            .await?;

        self.fetch(review_id).await
    }

    async fn fetch(&self, review_id: &str) -> Result<ReviewFeedback> {
        let feedback = sqlx::query_as::<_, ReviewFeedback>(
            r#"
            SELECT review_id, helpful_count, report_count, updated_at
            FROM review_feedback
            WHERE review_id = ?
            "#,
        )
        .bind(review_id)
        .fetch_one(self.pool)
        .await?;

        Ok(feedback)
    }

    pub async fn list(&self) -> Result<Vec<ReviewFeedback>> {
        let rows = sqlx::query_as::<_, ReviewFeedback>(
            r#"
            SELECT review_id, helpful_count, report_count, updated_at
            FROM review_feedback
            ORDER BY review_id ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;

    #[tokio::test]
    async fn test_record_and_aggregate_downloads() {
        let pool = test_pool().await;
        let repo = DownloadEventRepository::new(&pool);

        repo.record("pdf", Some("r1"), Some("classic"), None, None)
            .await
            .unwrap();
        repo.record("pdf", None, Some("modern"), Some("Mozilla/5.0"), None)
            .await
            .unwrap();
        repo.record("docx", None, None, None, Some("203.0.113.9"))
            .await
            .unwrap();

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.total, 3);

        let pdf = stats.by_format.iter().find(|f| f.format == "pdf").unwrap();
        assert_eq!(pdf.count, 2);

        let unknown = stats
            .by_template
            .iter()
            .find(|t| t.template == "unknown")
            .unwrap();
        assert_eq!(unknown.count, 1);
    }

    #[tokio::test]
    async fn test_review_feedback_counters() {
        let pool = test_pool().await;
        let repo = ReviewFeedbackRepository::new(&pool);

        repo.mark_helpful("rev-1").await.unwrap();
        repo.mark_helpful("rev-1").await.unwrap();
        let feedback = repo.report("rev-1").await.unwrap();

        assert_eq!(feedback.helpful_count, 2);
        assert_eq!(feedback.report_count, 1);

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_review_id_starts_fresh() {
        let pool = test_pool().await;
        let repo = ReviewFeedbackRepository::new(&pool);

        let feedback = repo.report("never-seen").await.unwrap();
        assert_eq!(feedback.helpful_count, 0);
        assert_eq!(feedback.report_count, 1);
    }
}
