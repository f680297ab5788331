// src/web/mod.rs
pub mod handlers;
pub mod types;

pub use types::*;

use crate::auth::{AuthConfig, AuthenticatedUser, ClientMeta, OptionalAuth};
use crate::config::ConfigManager;
use crate::database::DatabaseConfig;
use crate::layout::template::TemplateInfo;
use crate::layout::TemplateRegistry;
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Request, Response, State};
use tracing::{error, info};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

// API Routes

#[post("/ai/track", data = "<request>")]
pub async fn track_ai_usage(
    request: Json<TrackUsageRequest>,
    auth: AuthenticatedUser,
    config: &State<ConfigManager>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<UsageResponse>, ApiError> {
    handlers::track_usage_handler(request, auth, config, db_config).await
}

#[get("/ai/usage")]
pub async fn ai_usage(
    auth: OptionalAuth,
    config: &State<ConfigManager>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<UsageResponse>, ApiError> {
    handlers::usage_handler(auth, config, db_config).await
}

#[post("/export/pdf", data = "<request>")]
pub async fn export_pdf(
    request: Json<ExportPdfRequest>,
    auth: AuthenticatedUser,
    registry: &State<TemplateRegistry>,
) -> PdfResponse {
    handlers::export_pdf_handler(request, auth, registry).await
}

#[post("/export/docx", data = "<_body>")]
pub async fn export_docx(_body: Option<Json<serde_json::Value>>) -> ApiError {
    handlers::export_docx_handler().await
}

#[post("/track-download", data = "<request>")]
pub async fn track_download(
    request: Json<TrackDownloadRequest>,
    meta: ClientMeta,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<TrackDownloadResponse>, ApiError> {
    handlers::track_download_handler(request, meta, db_config).await
}

#[get("/download-stats")]
pub async fn download_stats(
    db_config: &State<DatabaseConfig>,
) -> Result<Json<crate::analytics::DownloadStats>, ApiError> {
    handlers::download_stats_handler(db_config).await
}

#[get("/review-stats")]
pub async fn review_stats(
    db_config: &State<DatabaseConfig>,
) -> Result<Json<Vec<ReviewFeedbackResponse>>, ApiError> {
    handlers::review_stats_handler(db_config).await
}

#[post("/reviews/<id>/helpful")]
pub async fn review_helpful(
    id: String,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ReviewFeedbackResponse>, ApiError> {
    handlers::review_helpful_handler(id, db_config).await
}

#[post("/reviews/<id>/report")]
pub async fn review_report(
    id: String,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ReviewFeedbackResponse>, ApiError> {
    handlers::review_report_handler(id, db_config).await
}

#[get("/templates")]
pub async fn get_templates(registry: &State<TemplateRegistry>) -> Json<Vec<TemplateInfo>> {
    Json(registry.list())
}

#[get("/health")]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "resumely".to_string(),
    })
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers

#[rocket::catch(400)]
pub fn bad_request_catcher() -> Json<ErrorBody> {
    Json(ErrorBody {
        error: "Invalid request format".to_string(),
    })
}

#[rocket::catch(401)]
pub fn unauthorized_catcher() -> Json<ErrorBody> {
    Json(ErrorBody {
        error: "Authentication required".to_string(),
    })
}

#[rocket::catch(404)]
pub fn not_found_catcher() -> Json<ErrorBody> {
    Json(ErrorBody {
        error: "Not found".to_string(),
    })
}

// Json<T> data guards reject type-mismatched bodies with 422, not 400
#[rocket::catch(422)]
pub fn unprocessable_catcher() -> Json<ErrorBody> {
    Json(ErrorBody {
        error: "Request body does not match the expected shape".to_string(),
    })
}

#[rocket::catch(default)]
pub fn default_catcher(status: Status, _request: &Request) -> Json<ErrorBody> {
    Json(ErrorBody {
        error: format!("Request failed: {}", status),
    })
}

#[rocket::catch(500)]
pub fn internal_error_catcher() -> Json<ErrorBody> {
    Json(ErrorBody {
        error: "Internal server error".to_string(),
    })
}

/// Assemble the Rocket instance with all managed state and routes
pub fn build_rocket(
    config: ConfigManager,
    auth_config: AuthConfig,
    db_config: DatabaseConfig,
) -> rocket::Rocket<rocket::Build> {
    let figment = rocket::Config::figment().merge(("port", config.environment.port));

    rocket::custom(figment)
        .attach(Cors)
        .manage(config)
        .manage(auth_config)
        .manage(db_config)
        .manage(TemplateRegistry::new())
        .register(
            "/api",
            catchers![
                bad_request_catcher,
                unauthorized_catcher,
                not_found_catcher,
                unprocessable_catcher,
                internal_error_catcher,
                default_catcher
            ],
        )
        .mount(
            "/api",
            routes![
                track_ai_usage,
                ai_usage,
                export_pdf,
                export_docx,
                track_download,
                download_stats,
                review_stats,
                review_helpful,
                review_report,
                get_templates,
                health,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: ConfigManager) -> Result<()> {
    let mut db_config = DatabaseConfig::new(config.environment.database_path.clone());

    if let Err(e) = db_config.init_pool().await {
        error!("Failed to initialize database: {}", e);
        return Err(e);
    }

    if let Err(e) = db_config.migrate().await {
        error!("Failed to run database migrations: {}", e);
        return Err(e);
    }

    let mut auth_config = AuthConfig::new(config.auth.firebase_project_id.clone());

    if let Err(e) = auth_config.update_firebase_keys().await {
        error!("Failed to fetch Firebase keys: {}", e);
        return Err(e);
    }

    info!("Starting resumely API server");
    info!("Database: {}", db_config.database_path.display());
    info!(
        "Monthly AI cap: {:.2} USD",
        config.metering.month_usd_limit
    );

    let _rocket = build_rocket(config, auth_config, db_config).launch().await;

    Ok(())
}
