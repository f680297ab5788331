// src/web/handlers/export_handlers.rs
//! PDF export: one synchronous layout-and-draw pass over the submitted
//! document. DOCX export was retired and its endpoint answers 410 forever.

use crate::auth::AuthenticatedUser;
use crate::layout::{LayoutEngine, TemplateRegistry};
use crate::pdf;
use crate::utils::sanitize_filename;
use crate::web::types::{gone, ApiError, ExportPdfRequest, PdfResponse};
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

/// A cover letter's own style choice wins over the request-level template
fn requested_template(body: &ExportPdfRequest) -> Option<&str> {
    match &body.cover_letter {
        Some(letter) if !letter.style.is_empty() => Some(letter.style.as_str()),
        _ => body.template.as_deref(),
    }
}

pub async fn export_pdf_handler(
    request: Json<ExportPdfRequest>,
    auth: AuthenticatedUser,
    registry: &State<TemplateRegistry>,
) -> PdfResponse {
    let body = request.into_inner();
    let template = registry.resolve(requested_template(&body));
    let engine = LayoutEngine::new(template.clone());

    let (pages, base_name) = match &body.cover_letter {
        Some(letter) => (
            engine.paginate_cover_letter(letter),
            format!("{}_cover_letter", sanitize_filename(&letter.contact.name)),
        ),
        None => (
            engine.paginate_resume(&body.document),
            sanitize_filename(&body.document.contact.name),
        ),
    };

    let data = pdf::render(&pages);
    let filename = format!("{}.pdf", base_name);

    info!(
        "Exported {} ({} pages, {} bytes, template {}) for {}",
        filename,
        pages.len(),
        data.len(),
        template.id,
        auth.email()
    );

    PdfResponse::new(data, filename)
}

pub async fn export_docx_handler() -> ApiError {
    gone("DOCX export has been permanently disabled")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CoverLetterDocument;

    #[test]
    fn test_cover_letter_style_wins_over_request_template() {
        let body = ExportPdfRequest {
            template: Some("classic".to_string()),
            cover_letter: Some(CoverLetterDocument {
                style: "modern".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(requested_template(&body), Some("modern"));
    }

    #[test]
    fn test_empty_style_falls_back_to_request_template() {
        let body = ExportPdfRequest {
            template: Some("compact".to_string()),
            cover_letter: Some(CoverLetterDocument::default()),
            ..Default::default()
        };
        assert_eq!(requested_template(&body), Some("compact"));
    }

    #[test]
    fn test_resume_export_uses_request_template() {
        let body = ExportPdfRequest {
            template: Some("modern".to_string()),
            ..Default::default()
        };
        assert_eq!(requested_template(&body), Some("modern"));
        assert_eq!(requested_template(&ExportPdfRequest::default()), None);
    }
}
