// src/web/handlers/ai_handlers.rs
//! Usage metering endpoints for the AI assist feature.

use crate::auth::{AuthenticatedUser, OptionalAuth};
use crate::config::ConfigManager;
use crate::database::DatabaseConfig;
use crate::metering::{UsageRepository, UsageSnapshot};
use crate::utils::month_key;
use crate::web::types::{bad_request, internal_error, ApiError, TrackUsageRequest, UsageResponse};
use chrono::Utc;
use rocket::serde::json::Json;
use rocket::State;
use tracing::error;

pub async fn track_usage_handler(
    request: Json<TrackUsageRequest>,
    auth: AuthenticatedUser,
    config: &State<ConfigManager>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<UsageResponse>, ApiError> {
    let cost = request.usd_cost;
    if !cost.is_finite() || cost < 0.0 {
        return Err(bad_request("usdCost must be a non-negative number"));
    }

    let pool = db_config.pool().map_err(|e| {
        error!("Usage tracking failed: {}", e);
        internal_error(&e)
    })?;

    let repo = UsageRepository::new(pool);
    let record = repo
        .increment(
            auth.email(),
            &month_key(Utc::now()),
            config.metering.month_usd_limit,
            cost,
        )
        .await
        .map_err(|e| {
            error!("Usage tracking failed for {}: {}", auth.email(), e);
            internal_error(&e)
        })?;

    Ok(Json(UsageResponse {
        usage: Some(UsageSnapshot::from(record)),
    }))
}

/// Anonymous callers get `{ "usage": null }` with 200, not a 401: the editor
/// polls this before sign-in.
pub async fn usage_handler(
    auth: OptionalAuth,
    config: &State<ConfigManager>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<UsageResponse>, ApiError> {
    let Some(user) = auth.user else {
        return Ok(Json(UsageResponse { usage: None }));
    };

    let pool = db_config.pool().map_err(|e| {
        error!("Usage lookup failed: {}", e);
        internal_error(&e)
    })?;

    let repo = UsageRepository::new(pool);
    let record = repo
        .get_or_create(
            user.email(),
            &month_key(Utc::now()),
            config.metering.month_usd_limit,
        )
        .await
        .map_err(|e| {
            error!("Usage lookup failed for {}: {}", user.email(), e);
            internal_error(&e)
        })?;

    Ok(Json(UsageResponse {
        usage: Some(UsageSnapshot::from(record)),
    }))
}
