//! Billing rows: ingestion, header normalization, selection and grouping.

pub mod columns;
pub mod grouping;
pub mod ingest;
pub mod models;
pub mod selection;

pub use grouping::group_rows;
pub use models::{CellValue, Invoice, InvoiceBatch, InvoiceHeader, LineItem, SourceRow};
pub use selection::{select_rows, SelectionError};
