// src/web/types.rs
use crate::metering::UsageSnapshot;
use crate::types::{CoverLetterDocument, ResumeDocument};
use rocket::http::{ContentType, Status};
use rocket::response::status::Custom;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::{Request, Response};

/// Every failing endpoint answers with this shape
#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorBody {
    pub error: String,
}

pub type ApiError = Custom<Json<ErrorBody>>;

pub fn bad_request(message: impl Into<String>) -> ApiError {
    Custom(
        Status::BadRequest,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

pub fn unauthorized() -> ApiError {
    Custom(
        Status::Unauthorized,
        Json(ErrorBody {
            error: "Authentication required".to_string(),
        }),
    )
}

pub fn internal_error(err: &anyhow::Error) -> ApiError {
    Custom(
        Status::InternalServerError,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

pub fn gone(message: impl Into<String>) -> ApiError {
    Custom(
        Status::Gone,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct TrackUsageRequest {
    #[serde(rename = "usdCost")]
    pub usd_cost: f64,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct UsageResponse {
    pub usage: Option<UsageSnapshot>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct TrackDownloadRequest {
    pub format: String,
    #[serde(rename = "resumeId")]
    pub resume_id: Option<String>,
    pub template: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TrackDownloadResponse {
    pub ok: bool,
    #[serde(rename = "eventId")]
    pub event_id: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ReviewFeedbackResponse {
    #[serde(rename = "reviewId")]
    pub review_id: String,
    #[serde(rename = "helpfulCount")]
    pub helpful_count: i64,
    #[serde(rename = "reportCount")]
    pub report_count: i64,
}

impl From<crate::analytics::ReviewFeedback> for ReviewFeedbackResponse {
    fn from(feedback: crate::analytics::ReviewFeedback) -> Self {
        Self {
            review_id: feedback.review_id,
            helpful_count: feedback.helpful_count,
            report_count: feedback.report_count,
        }
    }
}

/// Body of `POST /api/export/pdf`. When a cover letter is present it wins;
/// otherwise the (possibly empty) resume document is rendered.
#[derive(Deserialize, Default)]
#[serde(crate = "rocket::serde", default)]
pub struct ExportPdfRequest {
    pub document: ResumeDocument,
    #[serde(rename = "coverLetter")]
    pub cover_letter: Option<CoverLetterDocument>,
    pub template: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

pub struct PdfResponse {
    pub data: Vec<u8>,
    pub filename: String,
}

impl PdfResponse {
    pub fn new(data: Vec<u8>, filename: String) -> Self {
        Self { data, filename }
    }
}

impl<'r> Responder<'r, 'static> for PdfResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(ContentType::PDF)
            .raw_header(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.filename),
            )
            .sized_body(self.data.len(), std::io::Cursor::new(self.data))
            .ok()
    }
}
