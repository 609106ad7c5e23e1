use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::invoice::columns::row_from_pairs;
use crate::invoice::{CellValue, SourceRow};

/// Rows as exported by a spreadsheet, keyed by sheet header or canonical name.
#[derive(Deserialize, Debug, ToSchema)]
pub struct RenderInvoicesRequest {
    #[schema(value_type = Vec<Object>)]
    pub rows: Vec<BTreeMap<String, CellValue>>,
    /// Row indices to include; every row when omitted.
    #[serde(default)]
    pub selected: Option<Vec<usize>>,
}

impl RenderInvoicesRequest {
    pub fn source_rows(&self) -> Vec<SourceRow> {
        self.rows
            .iter()
            .map(|row| row_from_pairs(row.iter().map(|(k, v)| (k.as_str(), v.clone()))))
            .collect()
    }
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RenderQuery {
    /// `true` for in-browser preview instead of a download.
    #[serde(default)]
    pub inline: bool,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct SpreadsheetUploadForm {
    #[allow(unused)]
    pub file: Vec<u8>,
    /// Comma separated row indices, e.g. `0,2,5`.
    #[allow(unused)]
    pub selected: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct IndexedRow {
    pub index: usize,
    pub row: SourceRow,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct RowsPreviewResponse {
    pub filename: String,
    pub total: usize,
    pub rows: Vec<IndexedRow>,
}

impl RowsPreviewResponse {
    pub fn new(filename: String, rows: Vec<SourceRow>) -> Self {
        Self {
            filename,
            total: rows.len(),
            rows: rows
                .into_iter()
                .enumerate()
                .map(|(index, row)| IndexedRow { index, row })
                .collect(),
        }
    }
}
