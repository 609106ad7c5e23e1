//! Generators module - turns invoice batches into a combined PDF via Typst.
//!
//! - `terbilang` - amount in Indonesian words
//! - `format` - Rupiah and quantity cell formatting
//! - `invoice_view` - per-invoice cells, totals and disclosure lines
//! - `layout` - Typst source for a whole batch
//! - `engine` - Typst CLI compilation
//! - `invoice_pdf` - the renderer tying these together

pub mod common;
pub mod engine;
pub mod format;
pub mod invoice_pdf;
pub mod invoice_view;
pub mod layout;
pub mod logo;
pub mod terbilang;
pub mod traits;

pub use engine::TypstRenderEngine;
pub use invoice_pdf::{InvoiceDocumentRenderer, RenderRequest};
pub use logo::{AssetLoadError, LogoAsset};
pub use traits::Generator;

use thiserror::Error;

use format::FieldFormatError;

/// Errors that abort document generation. No PDF bytes are produced.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("no invoices to render")]
    EmptyBatch,
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteTypst(#[source] std::io::Error),
    #[error("failed to write asset {name}: {source}")]
    WriteAsset {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {code}: {stderr}")]
    TypstExit { code: i32, stderr: String },
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
}

/// A recovered problem: the document was still produced.
#[derive(Debug, Error)]
pub enum RenderWarning {
    #[error("logo omitted: {0}")]
    Asset(#[from] AssetLoadError),
    #[error("invoice '{invoice_number}' line {line}: {source}")]
    Field {
        invoice_number: String,
        /// 1-based position in the item table.
        line: usize,
        #[source]
        source: FieldFormatError,
    },
}

/// Result of a successful document generation.
#[derive(Debug)]
pub struct GeneratedDocument {
    pub filename: String,
    pub pdf: Vec<u8>,
    pub invoice_count: usize,
    pub warnings: Vec<RenderWarning>,
}
