//! Layout-ready data for one invoice.
//!
//! Every cell is resolved to its final text here so the Typst layout only
//! places strings.

use crate::config::CompanyProfile;
use crate::invoice::{Invoice, InvoiceHeader, LineItem};

use super::format::{
    format_money, format_quantity, group_thousands, money, FieldFormatError, ItemField,
};
use super::terbilang;
use super::RenderWarning;

/// Text of the eight item table cells, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemCells {
    pub description: String,
    pub delivery_date: String,
    pub delivery_note: String,
    pub quantity: String,
    pub base_amount: String,
    pub tax_amount: String,
    pub withholding_amount: String,
    pub line_total: String,
}

impl ItemCells {
    pub fn as_array(&self) -> [&str; 8] {
        [
            &self.description,
            &self.delivery_date,
            &self.delivery_note,
            &self.quantity,
            &self.base_amount,
            &self.tax_amount,
            &self.withholding_amount,
            &self.line_total,
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub base_amount: i64,
    pub tax_amount: i64,
    pub withholding_amount: i64,
}

impl InvoiceTotals {
    pub fn grand_total(&self) -> i64 {
        self.base_amount
            .saturating_add(self.tax_amount)
            .saturating_add(self.withholding_amount)
    }
}

/// Faktur and bupot numbers listed for the disclosure customer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Disclosure {
    pub tax_invoice_numbers: Vec<String>,
    pub withholding_slip_numbers: Vec<String>,
}

impl Disclosure {
    pub fn collect(items: &[LineItem]) -> Self {
        Self {
            tax_invoice_numbers: distinct(items.iter().map(|item| item.tax_invoice_no.as_deref())),
            withholding_slip_numbers: distinct(
                items.iter().map(|item| item.withholding_slip_no.as_deref()),
            ),
        }
    }

    pub fn faktur_label(&self) -> String {
        format!("No. Faktur: {}", self.tax_invoice_numbers.join(", "))
    }

    pub fn bupot_label(&self) -> String {
        format!("No. Bupot: {}", self.withholding_slip_numbers.join(", "))
    }
}

fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values.flatten() {
        if !value.is_empty() && !seen.iter().any(|s| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub label: String,
    pub amount: String,
    pub bold: bool,
}

#[derive(Debug, Clone)]
pub struct InvoiceView {
    pub header: InvoiceHeader,
    pub rows: Vec<ItemCells>,
    pub totals: InvoiceTotals,
    pub words: String,
    pub disclosure: Option<Disclosure>,
}

impl InvoiceView {
    /// Resolve an invoice. Unreadable numeric cells are reported in `warnings`
    /// and printed as their raw text.
    pub fn build(
        profile: &CompanyProfile,
        invoice: &Invoice,
        warnings: &mut Vec<RenderWarning>,
    ) -> Self {
        let mut totals = InvoiceTotals::default();
        let mut rows = Vec::with_capacity(invoice.items.len());

        for (index, item) in invoice.items.iter().enumerate() {
            let mut report = |source: FieldFormatError| {
                log::warn!(
                    "Invoice '{}' line {}: {}, printing raw value",
                    invoice.header.invoice_number,
                    index + 1,
                    source
                );
                warnings.push(RenderWarning::Field {
                    invoice_number: invoice.header.invoice_number.clone(),
                    line: index + 1,
                    source,
                });
            };

            let quantity = format_quantity(item.unit_count.as_str()).unwrap_or_else(|e| {
                let raw = e.raw.clone();
                report(e);
                raw
            });

            let mut amount = |raw: &str, field: ItemField| -> (String, Option<i64>) {
                match format_money(raw, field) {
                    Ok(cell) => (cell.text, cell.value),
                    Err(e) => {
                        let text = e.raw.clone();
                        report(e);
                        (text, None)
                    }
                }
            };

            let (base_text, base) = amount(item.base_amount.as_str(), ItemField::BaseAmount);
            let (tax_text, tax) = amount(item.tax_amount.as_str(), ItemField::TaxAmount);
            let (withholding_text, withholding) = amount(
                item.withholding_amount.as_str(),
                ItemField::WithholdingAmount,
            );

            let base = base.unwrap_or(0);
            let tax = tax.unwrap_or(0);
            let withholding = withholding.unwrap_or(0);

            totals.base_amount = totals.base_amount.saturating_add(base);
            totals.tax_amount = totals.tax_amount.saturating_add(tax);
            totals.withholding_amount = totals.withholding_amount.saturating_add(withholding);

            // blank DPP blanks the line total; blank PPN/PPH count as zero
            let line_total = if item.base_amount.is_blank() {
                String::new()
            } else {
                money(base.saturating_add(tax).saturating_add(withholding))
            };

            rows.push(ItemCells {
                description: item.description.clone(),
                delivery_date: item.delivery_date.clone(),
                delivery_note: item.delivery_note_no.clone(),
                quantity,
                base_amount: base_text,
                tax_amount: tax_text,
                withholding_amount: withholding_text,
                line_total,
            });
        }

        let disclosure = (invoice.header.customer_name == profile.disclosure_customer)
            .then(|| Disclosure::collect(&invoice.items));

        Self {
            header: invoice.header.clone(),
            rows,
            words: terbilang::to_words(totals.grand_total()),
            totals,
            disclosure,
        }
    }

    pub fn summary_rows(&self, profile: &CompanyProfile) -> Vec<SummaryRow> {
        let row = |label: &str, amount: i64, bold: bool| SummaryRow {
            label: label.to_string(),
            amount: group_thousands(amount),
            bold,
        };
        vec![
            row("DPP", self.totals.base_amount, false),
            row("PPN", self.totals.tax_amount, false),
            row(&profile.withholding_label, self.totals.withholding_amount, false),
            row("TOTAL BAYAR", self.totals.grand_total(), true),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::CellValue;

    fn item(dpp: &str, ppn: &str, pph: &str) -> LineItem {
        LineItem {
            description: "Goods A".to_string(),
            unit_count: CellValue::from("2"),
            base_amount: CellValue::from(dpp),
            tax_amount: CellValue::from(ppn),
            withholding_amount: CellValue::from(pph),
            ..Default::default()
        }
    }

    fn invoice(customer: &str, items: Vec<LineItem>) -> Invoice {
        Invoice {
            header: InvoiceHeader {
                invoice_number: "INV-1".to_string(),
                date: "2024-01-01".to_string(),
                customer_name: customer.to_string(),
            },
            items,
        }
    }

    #[test]
    fn test_line_total_and_summary() {
        let profile = CompanyProfile::default();
        let mut warnings = Vec::new();
        let view = InvoiceView::build(
            &profile,
            &invoice("ACME", vec![item("1000000", "110000", "1000")]),
            &mut warnings,
        );

        assert!(warnings.is_empty());
        assert_eq!(view.rows[0].quantity, "2");
        assert_eq!(view.rows[0].base_amount, "Rp. 1,000,000");
        assert_eq!(view.rows[0].line_total, "Rp. 1,111,000");
        assert_eq!(view.totals.grand_total(), 1_111_000);
        assert_eq!(view.words, terbilang::to_words(1_111_000));

        let summary = view.summary_rows(&profile);
        assert_eq!(summary[2].label, "PPH (0,1%)");
        assert_eq!(summary[3].label, "TOTAL BAYAR");
        assert_eq!(summary[3].amount, "1,111,000");
        assert!(summary[3].bold);
    }

    #[test]
    fn test_blank_base_amount_blanks_line_total() {
        let mut warnings = Vec::new();
        let view = InvoiceView::build(
            &CompanyProfile::default(),
            &invoice(
                "ACME",
                vec![item("", "110000", "1000"), item("500", "", "")],
            ),
            &mut warnings,
        );

        assert_eq!(view.rows[0].base_amount, "");
        assert_eq!(view.rows[0].tax_amount, "Rp. 110,000");
        assert_eq!(view.rows[0].line_total, "");
        assert_eq!(view.rows[1].tax_amount, "");
        assert_eq!(view.rows[1].line_total, "Rp. 500");
        assert_eq!(view.totals.base_amount, 500);
        assert_eq!(view.totals.tax_amount, 110_000);
        assert_eq!(view.totals.withholding_amount, 1000);
    }

    #[test]
    fn test_explicit_zero_base_is_present() {
        let mut warnings = Vec::new();
        let view = InvoiceView::build(
            &CompanyProfile::default(),
            &invoice("ACME", vec![item("0", "10", "")]),
            &mut warnings,
        );
        assert_eq!(view.rows[0].base_amount, "Rp. 0");
        assert_eq!(view.rows[0].line_total, "Rp. 10");
    }

    #[test]
    fn test_decimal_cells_print_and_sum_truncated() {
        let mut warnings = Vec::new();
        let view = InvoiceView::build(
            &CompanyProfile::default(),
            &invoice("ACME", vec![item("1000.9", "110.5", "")]),
            &mut warnings,
        );

        assert!(warnings.is_empty());
        assert_eq!(view.rows[0].base_amount, "Rp. 1,000");
        assert_eq!(view.rows[0].tax_amount, "Rp. 110");
        assert_eq!(view.rows[0].withholding_amount, "");
        assert_eq!(view.rows[0].line_total, "Rp. 1,110");
        assert_eq!(view.totals.grand_total(), 1_110);
    }

    #[test]
    fn test_non_numeric_cell_falls_back_to_raw_text() {
        let mut warnings = Vec::new();
        let mut bad = item("1000", "n/a", "5");
        bad.unit_count = CellValue::from("dua");
        let view = InvoiceView::build(
            &CompanyProfile::default(),
            &invoice("ACME", vec![bad]),
            &mut warnings,
        );

        assert_eq!(view.rows[0].quantity, "dua");
        assert_eq!(view.rows[0].tax_amount, "n/a");
        assert_eq!(view.rows[0].line_total, "Rp. 1,005");
        assert_eq!(view.totals.tax_amount, 0);
        assert_eq!(warnings.len(), 2);
        assert!(matches!(
            &warnings[1],
            RenderWarning::Field { line: 1, source, .. } if source.field == ItemField::TaxAmount
        ));
    }

    #[test]
    fn test_disclosure_only_for_configured_customer() {
        let profile = CompanyProfile::default();
        let mut first = item("1", "", "");
        first.tax_invoice_no = Some("F-2".to_string());
        first.withholding_slip_no = Some("B-1".to_string());
        let mut second = item("1", "", "");
        second.tax_invoice_no = Some("F-1".to_string());
        let mut third = item("1", "", "");
        third.tax_invoice_no = Some("F-2".to_string());
        third.withholding_slip_no = Some(String::new());
        let items = vec![first, second, third];

        let mut warnings = Vec::new();
        let special = InvoiceView::build(
            &profile,
            &invoice("SETIA KAWAN ABADI", items.clone()),
            &mut warnings,
        );
        let disclosure = special.disclosure.unwrap();
        assert_eq!(disclosure.faktur_label(), "No. Faktur: F-2, F-1");
        assert_eq!(disclosure.bupot_label(), "No. Bupot: B-1");

        let regular = InvoiceView::build(&profile, &invoice("ACME", items), &mut warnings);
        assert!(regular.disclosure.is_none());
    }
}
