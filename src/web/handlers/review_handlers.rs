// src/web/handlers/review_handlers.rs
use crate::analytics::ReviewFeedbackRepository;
use crate::database::DatabaseConfig;
use crate::web::types::{internal_error, ApiError, ReviewFeedbackResponse};
use rocket::serde::json::Json;
use rocket::State;
use tracing::error;

pub async fn review_stats_handler(
    db_config: &State<DatabaseConfig>,
) -> Result<Json<Vec<ReviewFeedbackResponse>>, ApiError> {
    let pool = db_config.pool().map_err(|e| {
        error!("Review stats failed: {}", e);
        internal_error(&e)
    })?;

    let rows = ReviewFeedbackRepository::new(pool).list().await.map_err(|e| {
        error!("Review stats failed: {}", e);
        internal_error(&e)
    })?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn review_helpful_handler(
    review_id: String,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ReviewFeedbackResponse>, ApiError> {
    let pool = db_config.pool().map_err(|e| {
        error!("Review feedback failed: {}", e);
        internal_error(&e)
    })?;

    let feedback = ReviewFeedbackRepository::new(pool)
        .mark_helpful(&review_id)
        .await
        .map_err(|e| {
            error!("Review feedback failed for {}: {}", review_id, e);
            internal_error(&e)
        })?;

    Ok(Json(feedback.into()))
}

pub async fn review_report_handler(
    review_id: String,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ReviewFeedbackResponse>, ApiError> {
    let pool = db_config.pool().map_err(|e| {
        error!("Review feedback failed: {}", e);
        internal_error(&e)
    })?;

    let feedback = ReviewFeedbackRepository::new(pool)
        .report(&review_id)
        .await
        .map_err(|e| {
            error!("Review report failed for {}: {}", review_id, e);
            internal_error(&e)
        })?;

    Ok(Json(feedback.into()))
}
