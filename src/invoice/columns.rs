//! Spreadsheet header normalization.
//!
//! Source sheets use Indonesian upper-case headers (`NAMA`, `NO. FAKTUR`, ...).
//! They are mapped onto the canonical [`SourceRow`] fields; headers that do not
//! map are ignored and missing fields stay blank.

use super::models::{CellValue, SourceRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Date,
    FakturNo,
    BupotNo,
    InvoiceNo,
    Customer,
    Description,
    Qty,
    Dpp,
    Ppn,
    Pph,
    SjDate,
    SjNo,
    Nota,
}

/// Sheet header (upper-case) to canonical column.
const HEADER_MAP: [(&str, Column); 13] = [
    ("TANGGAL", Column::Date),
    ("NO. FAKTUR", Column::FakturNo),
    ("NO. PPH", Column::BupotNo),
    ("NO", Column::InvoiceNo),
    ("NAMA", Column::Customer),
    ("BARANG", Column::Description),
    ("QTY", Column::Qty),
    ("DPP", Column::Dpp),
    ("PPN", Column::Ppn),
    ("PPH", Column::Pph),
    ("TGL SJN", Column::SjDate),
    ("NO. SJN", Column::SjNo),
    ("NOTA", Column::Nota),
];

impl Column {
    pub const ALL: [Column; 13] = [
        Column::Date,
        Column::FakturNo,
        Column::BupotNo,
        Column::InvoiceNo,
        Column::Customer,
        Column::Description,
        Column::Qty,
        Column::Dpp,
        Column::Ppn,
        Column::Pph,
        Column::SjDate,
        Column::SjNo,
        Column::Nota,
    ];

    pub fn canonical_name(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::FakturNo => "faktur_no",
            Self::BupotNo => "bupot_no",
            Self::InvoiceNo => "invoice_no",
            Self::Customer => "customer",
            Self::Description => "description",
            Self::Qty => "qty",
            Self::Dpp => "dpp",
            Self::Ppn => "ppn",
            Self::Pph => "pph",
            Self::SjDate => "sj_date",
            Self::SjNo => "sj_no",
            Self::Nota => "nota",
        }
    }

    /// Resolve a raw header, either a sheet header or a canonical field name.
    pub fn from_header(header: &str) -> Option<Self> {
        let trimmed = header.trim();
        let upper = trimmed.to_uppercase();
        HEADER_MAP
            .iter()
            .find(|(sheet_header, _)| *sheet_header == upper)
            .map(|(_, column)| *column)
            .or_else(|| {
                Self::ALL
                    .into_iter()
                    .find(|column| column.canonical_name().eq_ignore_ascii_case(trimmed))
            })
    }
}

impl SourceRow {
    pub fn cell_mut(&mut self, column: Column) -> &mut CellValue {
        match column {
            Column::Date => &mut self.date,
            Column::FakturNo => &mut self.faktur_no,
            Column::BupotNo => &mut self.bupot_no,
            Column::InvoiceNo => &mut self.invoice_no,
            Column::Customer => &mut self.customer,
            Column::Description => &mut self.description,
            Column::Qty => &mut self.qty,
            Column::Dpp => &mut self.dpp,
            Column::Ppn => &mut self.ppn,
            Column::Pph => &mut self.pph,
            Column::SjDate => &mut self.sj_date,
            Column::SjNo => &mut self.sj_no,
            Column::Nota => &mut self.nota,
        }
    }
}

/// Resolve a whole header row once, for positional record access.
pub fn resolve_headers<S: AsRef<str>>(headers: &[S]) -> Vec<Option<Column>> {
    let mut seen: Vec<Column> = Vec::new();
    headers
        .iter()
        .map(|header| {
            // first occurrence of a column wins, like a keyed lookup would
            let column = Column::from_header(header.as_ref())?;
            if seen.contains(&column) {
                None
            } else {
                seen.push(column);
                Some(column)
            }
        })
        .collect()
}

/// Build a row from positional cells using pre-resolved headers.
pub fn row_from_cells<I>(columns: &[Option<Column>], cells: I) -> SourceRow
where
    I: IntoIterator<Item = CellValue>,
{
    let mut row = SourceRow::default();
    for (column, cell) in columns.iter().zip(cells) {
        if let Some(column) = column {
            *row.cell_mut(*column) = cell;
        }
    }
    row
}

/// Build a row from header/value pairs, e.g. a JSON object.
pub fn row_from_pairs<K, I>(pairs: I) -> SourceRow
where
    K: AsRef<str>,
    I: IntoIterator<Item = (K, CellValue)>,
{
    let (headers, cells): (Vec<K>, Vec<CellValue>) = pairs.into_iter().unzip();
    row_from_cells(&resolve_headers(&headers), cells)
}
