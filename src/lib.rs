use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod generators;
pub mod handlers;
pub mod invoice;

pub use crate::config::{AppConfig, CompanyProfile};
pub use crate::generators::{InvoiceDocumentRenderer, TypstRenderEngine};
pub use crate::handlers::AppState;

/// Row payloads are bounded like multipart uploads.
const JSON_LIMIT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::preview_rows,
        crate::handlers::render_invoices,
        crate::handlers::render_upload
    ),
    components(
        schemas(
            handlers::models::RenderInvoicesRequest,
            handlers::models::SpreadsheetUploadForm,
            handlers::models::RowsPreviewResponse,
            handlers::models::IndexedRow,
            invoice::models::SourceRow,
            invoice::models::CellValue,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Invoice Service", description = "Spreadsheet rows to combined invoice / kwitansi PDF.")
    )
)]
pub struct ApiDoc;

/// Build the shared state from configuration.
pub fn build_state(config: &AppConfig) -> AppState {
    let renderer = InvoiceDocumentRenderer::new(
        config.profile.clone(),
        TypstRenderEngine::new(config.typst_bin.clone()),
    );
    AppState::new(renderer, config.logo_path.clone())
}

pub async fn run() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    match &config.logo_path {
        Some(path) if !path.exists() => {
            log::warn!("Logo {} not found, invoices will render without it", path.display())
        }
        Some(path) => log::info!("Using logo {}", path.display()),
        None => log::info!("Logo disabled"),
    }

    let app_state = web::Data::new(build_state(&config));

    let prometheus = PrometheusMetricsBuilder::new("kwitansi_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:8080")
            .allowed_origin("http://127.0.0.1:8080")
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .expose_headers(vec![
                header::CONTENT_DISPOSITION,
                header::HeaderName::from_static("x-invoice-count"),
                header::HeaderName::from_static("x-render-warnings"),
            ])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(cors)
            .app_data(app_state.clone())
            .app_data(web::JsonConfig::default().limit(JSON_LIMIT_BYTES))
            .service(web::scope("/api").configure(handlers::config))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
