use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Raw text of one spreadsheet cell. Blank text means the value is absent.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq, ToSchema)]
#[serde(transparent)]
pub struct CellValue(pub String);

impl CellValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn blank() -> Self {
        Self(String::new())
    }

    /// Integral floats print without a fraction so `1000000.0` reads as `1000000`.
    pub fn from_float(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
            Self((value as i64).to_string())
        } else {
            Self(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Trimmed text, `None` when blank.
    pub fn non_blank(&self) -> Option<&str> {
        let trimmed = self.0.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCell {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<RawCell>::deserialize(deserializer)? {
            None => Self::blank(),
            Some(RawCell::Text(text)) => Self(text),
            Some(RawCell::Int(value)) => Self(value.to_string()),
            Some(RawCell::Float(value)) => Self::from_float(value),
            Some(RawCell::Bool(value)) => Self(value.to_string()),
        })
    }
}

/// One spreadsheet row after header normalization.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, ToSchema)]
#[serde(default)]
pub struct SourceRow {
    pub date: CellValue,
    pub faktur_no: CellValue,
    pub bupot_no: CellValue,
    pub invoice_no: CellValue,
    pub customer: CellValue,
    pub description: CellValue,
    pub qty: CellValue,
    pub dpp: CellValue,
    pub ppn: CellValue,
    pub pph: CellValue,
    pub sj_date: CellValue,
    pub sj_no: CellValue,
    /// Older sheets carry the delivery note under `NOTA`.
    pub nota: CellValue,
}

impl SourceRow {
    pub fn is_empty(&self) -> bool {
        [
            &self.date,
            &self.faktur_no,
            &self.bupot_no,
            &self.invoice_no,
            &self.customer,
            &self.description,
            &self.qty,
            &self.dpp,
            &self.ppn,
            &self.pph,
            &self.sj_date,
            &self.sj_no,
            &self.nota,
        ]
        .iter()
        .all(|cell| cell.is_blank())
    }

    pub fn header(&self) -> InvoiceHeader {
        InvoiceHeader {
            invoice_number: self.invoice_no.as_str().to_string(),
            date: self.date.as_str().to_string(),
            customer_name: self.customer.as_str().to_string(),
        }
    }

    /// Customer, invoice number and date are all filled in.
    pub fn has_invoice_key(&self) -> bool {
        !(self.customer.is_blank() || self.invoice_no.is_blank() || self.date.is_blank())
    }

    pub fn to_line_item(&self) -> LineItem {
        let delivery_date = if self.sj_date.is_blank() {
            &self.date
        } else {
            &self.sj_date
        };
        let delivery_note = if self.sj_no.is_blank() {
            &self.nota
        } else {
            &self.sj_no
        };

        LineItem {
            description: self.description.as_str().to_string(),
            unit_count: self.qty.clone(),
            base_amount: self.dpp.clone(),
            tax_amount: self.ppn.clone(),
            withholding_amount: self.pph.clone(),
            delivery_date: delivery_date.as_str().to_string(),
            delivery_note_no: delivery_note.as_str().to_string(),
            tax_invoice_no: self.faktur_no.non_blank().map(str::to_string),
            withholding_slip_no: self.bupot_no.non_blank().map(str::to_string),
        }
    }
}

/// A billed line on an invoice.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LineItem {
    pub description: String,
    pub unit_count: CellValue,
    /// DPP
    pub base_amount: CellValue,
    /// PPN
    pub tax_amount: CellValue,
    /// PPH Ps.22
    pub withholding_amount: CellValue,
    pub delivery_date: String,
    pub delivery_note_no: String,
    /// Nomor faktur pajak
    pub tax_invoice_no: Option<String>,
    /// Nomor bukti potong
    pub withholding_slip_no: Option<String>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct InvoiceHeader {
    pub invoice_number: String,
    pub date: String,
    pub customer_name: String,
}

/// One customer invoice. Every item shares the header's
/// (customer, invoice number, date) key.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Invoice {
    pub header: InvoiceHeader,
    pub items: Vec<LineItem>,
}

/// Invoices rendered together into one document, in order.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceBatch {
    pub invoices: Vec<Invoice>,
}

impl InvoiceBatch {
    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }
}
