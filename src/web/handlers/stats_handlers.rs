// src/web/handlers/stats_handlers.rs
//! Download tracking and the stats endpoints behind the dashboards.

use crate::analytics::{DownloadEventRepository, DownloadStats};
use crate::auth::ClientMeta;
use crate::database::DatabaseConfig;
use crate::utils::is_supported_format;
use crate::web::types::{
    bad_request, internal_error, ApiError, TrackDownloadRequest, TrackDownloadResponse,
};
use rocket::serde::json::Json;
use rocket::State;
use tracing::error;

pub async fn track_download_handler(
    request: Json<TrackDownloadRequest>,
    meta: ClientMeta,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<TrackDownloadResponse>, ApiError> {
    // Reject before touching storage: invalid formats must not write
    if !is_supported_format(&request.format) {
        return Err(bad_request(format!(
            "Unsupported format '{}'. Expected 'pdf' or 'docx'",
            request.format
        )));
    }

    let pool = db_config.pool().map_err(|e| {
        error!("Download tracking failed: {}", e);
        internal_error(&e)
    })?;

    let repo = DownloadEventRepository::new(pool);
    let event_id = repo
        .record(
            &request.format,
            request.resume_id.as_deref(),
            request.template.as_deref(),
            meta.user_agent.as_deref(),
            meta.client_ip.as_deref(),
        )
        .await
        .map_err(|e| {
            error!("Download tracking failed: {}", e);
            internal_error(&e)
        })?;

    Ok(Json(TrackDownloadResponse { ok: true, event_id }))
}

pub async fn download_stats_handler(
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DownloadStats>, ApiError> {
    let pool = db_config.pool().map_err(|e| {
        error!("Download stats failed: {}", e);
        internal_error(&e)
    })?;

    let stats = DownloadEventRepository::new(pool)
        .stats()
        .await
        .map_err(|e| {
            error!("Download stats failed: {}", e);
            internal_error(&e)
        })?;

    Ok(Json(stats))
}
