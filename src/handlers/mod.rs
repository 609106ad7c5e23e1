//! HTTP endpoints for previewing uploaded rows and rendering invoice PDFs.

pub mod models;
pub mod multipart_parser;

use std::path::PathBuf;

use actix_multipart::Multipart;
use actix_web::{http::header, web, HttpResponse, Responder};
use log::{error, info, warn};

use crate::generators::{GeneratedDocument, Generator, InvoiceDocumentRenderer, RenderRequest};
use crate::invoice::ingest::parse_spreadsheet;
use crate::invoice::{group_rows, select_rows, SourceRow};
use crate::ErrorResponse;

use self::models::{RenderInvoicesRequest, RenderQuery, RowsPreviewResponse};
use self::multipart_parser::MultipartParser;

const PDF_MIME: &str = "application/pdf";

/// Shared, read-only state for all workers.
pub struct AppState {
    pub renderer: InvoiceDocumentRenderer,
    pub logo_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(renderer: InvoiceDocumentRenderer, logo_path: Option<PathBuf>) -> Self {
        Self {
            renderer,
            logo_path,
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/invoices/rows").route(web::post().to(preview_rows)))
        .service(web::resource("/invoices/render").route(web::post().to(render_invoices)))
        .service(web::resource("/invoices/upload").route(web::post().to(render_upload)));
}

#[utoipa::path(
    context_path = "/api",
    tag = "Invoice Service",
    post,
    path = "/invoices/rows",
    request_body(content = inline(models::SpreadsheetUploadForm), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Normalized rows of the uploaded sheet", body = RowsPreviewResponse),
        (status = 400, description = "Invalid upload", body = ErrorResponse)
    )
)]
pub async fn preview_rows(payload: Multipart) -> impl Responder {
    info!("Executing preview_rows handler");
    let upload = match MultipartParser::parse_spreadsheet_upload(payload).await {
        Ok(upload) => upload,
        Err(e) => return HttpResponse::from(e),
    };

    match parse_spreadsheet(&upload.filename, &upload.bytes) {
        Ok(rows) => HttpResponse::Ok().json(RowsPreviewResponse::new(upload.filename, rows)),
        Err(e) => {
            warn!("Rejected upload '{}': {}", upload.filename, e);
            HttpResponse::BadRequest().json(ErrorResponse::bad_request(&e.to_string()))
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Invoice Service",
    post,
    path = "/invoices/render",
    params(RenderQuery),
    request_body = RenderInvoicesRequest,
    responses(
        (status = 200, description = "Combined invoice PDF", body = Vec<u8>, content_type = "application/pdf"),
        (status = 400, description = "Invalid rows or selection", body = ErrorResponse),
        (status = 500, description = "Rendering failed", body = ErrorResponse)
    )
)]
pub async fn render_invoices(
    state: web::Data<AppState>,
    query: web::Query<RenderQuery>,
    request: web::Json<RenderInvoicesRequest>,
) -> impl Responder {
    info!(
        "Executing render_invoices handler with {} rows",
        request.rows.len()
    );
    let rows = request.source_rows();
    render_selected(state, rows, request.selected.as_deref(), query.inline).await
}

#[utoipa::path(
    context_path = "/api",
    tag = "Invoice Service",
    post,
    path = "/invoices/upload",
    params(RenderQuery),
    request_body(content = inline(models::SpreadsheetUploadForm), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Combined invoice PDF", body = Vec<u8>, content_type = "application/pdf"),
        (status = 400, description = "Invalid upload or selection", body = ErrorResponse),
        (status = 500, description = "Rendering failed", body = ErrorResponse)
    )
)]
pub async fn render_upload(
    state: web::Data<AppState>,
    query: web::Query<RenderQuery>,
    payload: Multipart,
) -> impl Responder {
    info!("Executing render_upload handler");
    let upload = match MultipartParser::parse_spreadsheet_upload(payload).await {
        Ok(upload) => upload,
        Err(e) => return HttpResponse::from(e),
    };

    let rows = match parse_spreadsheet(&upload.filename, &upload.bytes) {
        Ok(rows) => rows,
        Err(e) => {
            warn!("Rejected upload '{}': {}", upload.filename, e);
            return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&e.to_string()));
        }
    };

    render_selected(state, rows, upload.selected.as_deref(), query.inline).await
}

async fn render_selected(
    state: web::Data<AppState>,
    rows: Vec<SourceRow>,
    selected: Option<&[usize]>,
    inline: bool,
) -> HttpResponse {
    let picked = match select_rows(&rows, selected) {
        Ok(picked) => picked,
        Err(e) => {
            return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&e.to_string()))
        }
    };

    let batch = group_rows(&picked);
    if batch.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(
            "selected rows have no customer, invoice number and date",
        ));
    }
    info!(
        "{} rows selected, building {} grouped invoices",
        picked.len(),
        batch.len()
    );

    let request = RenderRequest {
        batch,
        logo_path: state.logo_path.clone(),
    };
    let worker_state = state.clone();
    let result = web::block(move || worker_state.renderer.generate(request)).await;

    match result {
        Ok(Ok(document)) => pdf_response(document, inline),
        Ok(Err(e)) => {
            error!("Invoice rendering failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&e.to_string()))
        }
        Err(e) => {
            error!("Invoice rendering task failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&e.to_string()))
        }
    }
}

fn pdf_response(document: GeneratedDocument, inline: bool) -> HttpResponse {
    for warning in &document.warnings {
        warn!("Rendered with degradation: {}", warning);
    }

    let filename = sanitize_filename::sanitize(&document.filename);
    let disposition = if inline { "inline" } else { "attachment" };

    HttpResponse::Ok()
        .content_type(PDF_MIME)
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("{}; filename=\"{}\"", disposition, filename),
        ))
        .insert_header(("X-Invoice-Count", document.invoice_count.to_string()))
        .insert_header(("X-Render-Warnings", document.warnings.len().to_string()))
        .body(document.pdf)
}
