//! Combined invoice / kwitansi PDF generator.

use std::path::{Path, PathBuf};

use crate::config::CompanyProfile;
use crate::invoice::InvoiceBatch;

use super::engine::{Asset, TypstRenderEngine};
use super::layout::{self, ComposedDocument};
use super::logo::{load_logo, LogoAsset};
use super::traits::Generator;
use super::{GeneratedDocument, GeneratorError, RenderWarning};

/// Request for one combined document.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub batch: InvoiceBatch,
    pub logo_path: Option<PathBuf>,
}

/// Renders an invoice batch into a single PDF, one invoice block per invoice.
///
/// Holds only immutable configuration; every call builds its own source and
/// compilation directory.
#[derive(Debug, Clone)]
pub struct InvoiceDocumentRenderer {
    profile: CompanyProfile,
    engine: TypstRenderEngine,
}

impl InvoiceDocumentRenderer {
    pub fn new(profile: CompanyProfile, engine: TypstRenderEngine) -> Self {
        Self { profile, engine }
    }

    /// Build the Typst source without compiling it.
    pub fn compose(&self, batch: &InvoiceBatch, logo: Option<&LogoAsset>) -> ComposedDocument {
        layout::compose(&self.profile, batch, logo)
    }

    /// Render the batch to PDF bytes.
    ///
    /// A logo that cannot be loaded is left out and reported as a warning.
    pub fn render(
        &self,
        batch: &InvoiceBatch,
        logo_path: Option<&Path>,
    ) -> Result<GeneratedDocument, GeneratorError> {
        if batch.is_empty() {
            return Err(GeneratorError::EmptyBatch);
        }

        let mut warnings = Vec::new();
        let logo = logo_path.and_then(|path| match load_logo(path) {
            Ok(logo) => Some(logo),
            Err(e) => {
                log::warn!("Rendering without logo: {}", e);
                warnings.push(RenderWarning::Asset(e));
                None
            }
        });

        let composed = self.compose(batch, logo.as_ref());
        warnings.extend(composed.warnings);

        let logo_name = logo.as_ref().map(LogoAsset::file_name);
        let assets: Vec<Asset<'_>> = match (&logo, &logo_name) {
            (Some(logo), Some(name)) => vec![Asset {
                name,
                bytes: &logo.bytes,
            }],
            _ => Vec::new(),
        };

        let pdf = self.engine.render(&composed.source, &assets)?;

        log::info!(
            "Rendered {} invoices into {} ({} bytes, {} warnings)",
            composed.invoice_count,
            self.profile.download_filename,
            pdf.len(),
            warnings.len()
        );

        Ok(GeneratedDocument {
            filename: self.profile.download_filename.clone(),
            pdf,
            invoice_count: composed.invoice_count,
            warnings,
        })
    }
}

impl Generator<RenderRequest> for InvoiceDocumentRenderer {
    fn generate(&self, request: RenderRequest) -> Result<GeneratedDocument, GeneratorError> {
        self.render(&request.batch, request.logo_path.as_deref())
    }
}
