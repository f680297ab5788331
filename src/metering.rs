// src/metering.rs
//! Per-user monthly spend counters gating the AI assist feature.
//!
//! The meter only counts; enforcement (`month_usd_remaining > 0`) is the
//! caller's responsibility before it spends anything downstream.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UsageRecord {
    pub user_email: String,
    pub month: String,
    pub month_usd_limit: f64,
    pub total_usd_used: f64,
    pub requests: i64,
    pub updated_at: DateTime<Utc>,
}

/// The snapshot shape returned to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub month: String,
    #[serde(rename = "monthUsdLimit")]
    pub month_usd_limit: f64,
    #[serde(rename = "totalUsdUsedThisMonth")]
    pub total_usd_used_this_month: f64,
    #[serde(rename = "requestsThisMonth")]
    pub requests_this_month: i64,
    #[serde(rename = "monthUsdRemaining")]
    pub month_usd_remaining: f64,
}

impl From<UsageRecord> for UsageSnapshot {
    fn from(record: UsageRecord) -> Self {
        let remaining = (record.month_usd_limit - record.total_usd_used).max(0.0);
        Self {
            month: record.month,
            month_usd_limit: record.month_usd_limit,
            total_usd_used_this_month: record.total_usd_used,
            requests_this_month: record.requests,
            month_usd_remaining: remaining,
        }
    }
}

pub struct UsageRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UsageRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Read the current month's record, creating a zero-valued one on first read.
    ///
    /// The cap is stamped into the row at creation so later config changes do
    /// not rewrite past months.
    pub async fn get_or_create(
        &self,
        user_email: &str,
        month: &str,
        month_usd_limit: f64,
    ) -> Result<UsageRecord> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO ai_usage
                (user_email, month, month_usd_limit, total_usd_used, requests, updated_at)
            VALUES (?, ?, ?, 0, 0, ?)
            "#,
        )
        .bind(user_email)
        .bind(month)
        .bind(month_usd_limit)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;

        self.fetch(user_email, month).await
    }

    /// Add `usd_cost` to the month's spend and bump the request count.
    ///
    /// Single atomic upsert; concurrent increments from the same user are
    /// serialized by the store. At-least-once: a double-submitted increment
    /// counts twice.
    pub async fn increment(
        &self,
        user_email: &str,
        month: &str,
        month_usd_limit: f64,
        usd_cost: f64,
    ) -> Result<UsageRecord> {
        sqlx::query(
            r#"
            INSERT INTO ai_usage
                (user_email, month, month_usd_limit, total_usd_used, requests, updated_at)
            VALUES (?, ?, ?, ?, 1, ?)
            ON CONFLICT(user_email, month) DO UPDATE SET
                total_usd_used = total_usd_used + excluded.total_usd_used,
                requests = requests + 1,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_email)
        .bind(month)
        .bind(month_usd_limit)
        .bind(usd_cost)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;

        info!(
            "Recorded AI usage for {} ({}): +{:.4} USD",
            user_email, month, usd_cost
        );

        self.fetch(user_email, month).await
    }

    async fn fetch(&self, user_email: &str, month: &str) -> Result<UsageRecord> {
        let record = sqlx::query_as::<_, UsageRecord>(
            r#"
            SELECT user_email, month, month_usd_limit, total_usd_used, requests, updated_at
            FROM ai_usage
            WHERE user_email = ? AND month = ?
            "#,
        )
        .bind(user_email)
        .bind(month)
        .fetch_one(self.pool)
        .await?;

        Ok(record)
    }
}
