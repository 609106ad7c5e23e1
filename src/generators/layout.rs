//! Typst source for a batch of invoices.
//!
//! One invoice block per invoice, separated by `#pagebreak()`. The page setup
//! is A4 with 10mm left/right/top and 12mm bottom margins.

use crate::config::CompanyProfile;
use crate::invoice::InvoiceBatch;

use super::common::{typst_lines, typst_str};
use super::invoice_view::InvoiceView;
use super::logo::LogoAsset;
use super::RenderWarning;

pub const PAGE_BREAK: &str = "#pagebreak()";

const PREAMBLE: &str = r#"#set page(paper: "a4", margin: (left: 10mm, right: 10mm, top: 10mm, bottom: 12mm))
#set text(size: 9pt)
"#;

const ITEM_COLUMNS: &str = "(33mm, 20mm, 27mm, 15mm, 25mm, 25mm, 19mm, 25mm)";
/// Sum of the item column widths.
const CONTENT_WIDTH: &str = "189mm";
const ITEM_HEADERS: [&str; 8] = [
    "JENIS BARANG",
    "TANGGAL",
    "NOTA",
    "Qty",
    "DPP",
    "PPN",
    "PPH Ps.22",
    "JUMLAH",
];

const HEADER_FILL: &str = "#e8f2fb";

const SUMMARY_COLUMNS: &str = "(28mm, 10mm, 20mm)";
const DISCLOSURE_SUMMARY_COLUMNS: &str = "(126mm, 28mm, 10mm, 20mm)";

/// Typst source plus everything recovered while building it.
#[derive(Debug)]
pub struct ComposedDocument {
    pub source: String,
    pub invoice_count: usize,
    pub warnings: Vec<RenderWarning>,
}

pub fn compose(
    profile: &CompanyProfile,
    batch: &InvoiceBatch,
    logo: Option<&LogoAsset>,
) -> ComposedDocument {
    let mut warnings = Vec::new();
    let logo_file = logo.map(LogoAsset::file_name);
    let mut source = String::from(PREAMBLE);

    for (index, invoice) in batch.invoices.iter().enumerate() {
        let view = InvoiceView::build(profile, invoice, &mut warnings);
        source.push('\n');
        write_invoice(&mut source, profile, &view, logo_file.as_deref());

        if index + 1 < batch.len() {
            source.push_str(PAGE_BREAK);
            source.push('\n');
        }
    }

    ComposedDocument {
        source,
        invoice_count: batch.len(),
        warnings,
    }
}

fn write_invoice(
    out: &mut String,
    profile: &CompanyProfile,
    view: &InvoiceView,
    logo_file: Option<&str>,
) {
    write_letterhead(out, profile, logo_file);
    write_title(out);
    write_parties(out, view);
    write_item_table(out, view);
    write_summary(out, profile, view);
    write_words(out, view);
    write_payment(out, profile);
    write_signature(out, profile);
}

fn write_letterhead(out: &mut String, profile: &CompanyProfile, logo_file: Option<&str>) {
    let logo = match logo_file {
        Some(file) => format!("image({}, width: 15mm, height: 15mm)", typst_str(file)),
        None => "[]".to_string(),
    };
    out.push_str(&format!(
        r#"#grid(
  columns: (20mm, 100mm, 20mm),
  align: (left + top, center + top, left + top),
  {logo},
  text(size: 13pt, weight: "bold")[\ #{company}],
  [],
)
#v(15pt)
#grid(
  columns: (50mm, 85mm, 50mm),
  align: (left + top, center + top, right + top),
  {address},
  [],
  {contacts},
)
#v(4pt)
"#,
        company = typst_str(&profile.company_name),
        address = typst_lines(&profile.address_lines),
        contacts = typst_lines(&profile.contact_lines),
    ));
}

fn write_title(out: &mut String) {
    out.push_str(
        r#"#align(center, text(size: 14pt, weight: "bold", "Invoice"))
#align(center, text(size: 14pt, weight: "bold", "Kwitansi"))
#v(6pt)
"#,
    );
}

fn write_parties(out: &mut String, view: &InvoiceView) {
    let header = &view.header;
    out.push_str(&format!(
        r#"#grid(
  columns: (50mm, 85mm, 50mm),
  align: (left + top, center + top, right + top),
  [#strong("Customer :") \ #{customer}],
  [],
  {info},
)
#v(6pt)
"#,
        customer = typst_str(&header.customer_name),
        info = typst_lines(&[
            format!("No : {}", header.invoice_number),
            format!("Tanggal : {}", header.date),
        ]),
    ));
}

fn write_item_table(out: &mut String, view: &InvoiceView) {
    let headers = ITEM_HEADERS
        .iter()
        .map(|h| format!("strong({})", typst_str(h)))
        .collect::<Vec<_>>()
        .join(", ");

    out.push_str(&format!(
        r#"#table(
  columns: {ITEM_COLUMNS},
  stroke: 0.35pt + gray,
  inset: (x: 4pt, y: 3pt),
  fill: (x, y) => if y == 0 {{ rgb("{HEADER_FILL}") }},
  align: (x, y) => if y == 0 {{ center + horizon }} else if x >= 3 {{ right + horizon }} else {{ left + horizon }},
  table.header(repeat: true, {headers}),
"#
    ));
    for row in &view.rows {
        let cells = row
            .as_array()
            .iter()
            .map(|cell| typst_str(cell))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("  {cells},\n"));
    }
    out.push_str(")\n#v(6pt)\n");
}

fn write_summary(out: &mut String, profile: &CompanyProfile, view: &InvoiceView) {
    let rows = view.summary_rows(profile);
    let leading: Vec<String> = match &view.disclosure {
        Some(disclosure) => {
            let mut labels = vec![
                typst_str(&disclosure.faktur_label()),
                typst_str(&disclosure.bupot_label()),
            ];
            labels.resize(rows.len(), "[]".to_string());
            labels
        }
        None => Vec::new(),
    };
    let (columns, align) = if leading.is_empty() {
        (SUMMARY_COLUMNS, "(left, left, right)")
    } else {
        (DISCLOSURE_SUMMARY_COLUMNS, "(left, left, left, right)")
    };

    let mut cells = String::new();
    for (index, row) in rows.iter().enumerate() {
        let wrap = |text: &str| {
            if row.bold {
                format!("strong({})", typst_str(text))
            } else {
                typst_str(text)
            }
        };
        cells.push_str("  ");
        if let Some(label) = leading.get(index) {
            cells.push_str(label);
            cells.push_str(", ");
        }
        cells.push_str(&format!(
            "{}, {}, {},\n",
            wrap(&row.label),
            wrap(": Rp. "),
            wrap(&row.amount)
        ));
    }

    out.push_str(&format!(
        r#"#align(right, grid(
  columns: {columns},
  inset: 2pt,
  align: {align},
{cells}))
#v(6pt)
"#
    ));
}

fn write_words(out: &mut String, view: &InvoiceView) {
    out.push_str(&format!(
        r#"#strong("Terbilang :")
#v(6pt)
#block(width: {CONTENT_WIDTH}, stroke: 0.5pt + black, inset: 6pt, emph({words}))
#v(15pt)
"#,
        words = typst_str(&view.words),
    ));
}

fn write_payment(out: &mut String, profile: &CompanyProfile) {
    let bank = &profile.bank;
    out.push_str(&format!(
        r#"#text(size: 10pt)[
  #{intro}
  #v(6pt)
  #strong({bank_name}) \
  #strong({holder}) \
  #strong({account})
]
#v(15pt)
"#,
        intro = typst_str(&bank.intro),
        bank_name = typst_str(&bank.bank_name),
        holder = typst_str(&format!("AN. : {}", bank.account_holder)),
        account = typst_str(&format!("NO. REK : {}", bank.account_number)),
    ));
}

fn write_signature(out: &mut String, profile: &CompanyProfile) {
    let signatory = &profile.signatory;
    out.push_str(&format!(
        r#"#text(size: 10pt)[
  #{closing}
  #v(50pt)
  #strong({name}) \
  #strong({title})
]
"#,
        closing = typst_str(&signatory.closing),
        name = typst_str(&format!("( {} )", signatory.name)),
        title = typst_str(&signatory.title),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::logo::ImageFormat;
    use crate::invoice::{CellValue, Invoice, InvoiceHeader, LineItem};

    fn invoice(number: &str, customer: &str) -> Invoice {
        Invoice {
            header: InvoiceHeader {
                invoice_number: number.to_string(),
                date: "2024-01-01".to_string(),
                customer_name: customer.to_string(),
            },
            items: vec![LineItem {
                description: "Goods A".to_string(),
                unit_count: CellValue::from("2"),
                base_amount: CellValue::from("1000000"),
                tax_amount: CellValue::from("110000"),
                withholding_amount: CellValue::from("1000"),
                tax_invoice_no: Some("010.001-24".to_string()),
                withholding_slip_no: Some("BP-9".to_string()),
                ..Default::default()
            }],
        }
    }

    fn batch(count: usize) -> InvoiceBatch {
        InvoiceBatch {
            invoices: (0..count)
                .map(|i| invoice(&format!("INV-{i}"), "ACME"))
                .collect(),
        }
    }

    #[test]
    fn test_page_breaks_between_invoices_only() {
        let profile = CompanyProfile::default();
        for count in 1..=4 {
            let composed = compose(&profile, &batch(count), None);
            assert_eq!(composed.source.matches(PAGE_BREAK).count(), count - 1);
            assert!(!composed.source.trim_end().ends_with(PAGE_BREAK));
            assert_eq!(composed.invoice_count, count);
        }
    }

    #[test]
    fn test_item_table_header_styling() {
        let source = compose(&CompanyProfile::default(), &batch(1), None).source;
        assert!(source.contains(r##"fill: (x, y) => if y == 0 { rgb("#e8f2fb") },"##));
        assert!(source.contains("stroke: 0.35pt + gray,"));
        assert!(source.contains(r#"table.header(repeat: true, strong("JENIS BARANG"), "#));
        assert!(source.contains(&format!("columns: {ITEM_COLUMNS},")));
    }

    #[test]
    fn test_page_setup() {
        let composed = compose(&CompanyProfile::default(), &batch(1), None);
        assert!(composed.source.starts_with(
            r#"#set page(paper: "a4", margin: (left: 10mm, right: 10mm, top: 10mm, bottom: 12mm))"#
        ));
    }

    #[test]
    fn test_logo_only_when_loaded() {
        let profile = CompanyProfile::default();
        let without = compose(&profile, &batch(1), None);
        assert!(!without.source.contains("image("));

        let logo = LogoAsset {
            bytes: vec![0xFF, 0xD8, 0xFF],
            format: ImageFormat::Jpeg,
        };
        let with = compose(&profile, &batch(2), Some(&logo));
        assert_eq!(
            with.source
                .matches(r#"image("logo.jpeg", width: 15mm, height: 15mm)"#)
                .count(),
            2
        );
    }

    #[test]
    fn test_invoice_block_contents() {
        let source = compose(&CompanyProfile::default(), &batch(1), None).source;
        assert!(source.contains(r#""PT. SETIA KAWAN MAKMUR SEJAHTERA""#));
        assert!(source.contains(r#""No : INV-0""#));
        assert!(source.contains(r#""Tanggal : 2024-01-01""#));
        assert!(source.contains(r#"strong("PPH Ps.22")"#));
        assert!(source.contains(r#""Rp. 1,111,000""#));
        assert!(source.contains(r#"strong("TOTAL BAYAR"), strong(": Rp. "), strong("1,111,000")"#));
        assert!(source.contains(r#"emph("Satu Juta Seratus Sebelas Ribu Rupiah")"#));
        assert!(source.contains(r#"strong("NO. REK : 1710099088000")"#));
        assert!(source.contains(r#"strong("( FANI CHRISYANTI, S.E., M.Ak )")"#));
        assert!(source.contains(SUMMARY_COLUMNS));
        assert!(!source.contains("No. Faktur"));
    }

    #[test]
    fn test_disclosure_customer_gets_reference_lines() {
        let batch = InvoiceBatch {
            invoices: vec![invoice("INV-1", "SETIA KAWAN ABADI"), invoice("INV-2", "ACME")],
        };
        let source = compose(&CompanyProfile::default(), &batch, None).source;
        let (special, regular) = source.split_once(PAGE_BREAK).unwrap();

        assert!(special.contains(r#""No. Faktur: 010.001-24""#));
        assert!(special.contains(r#""No. Bupot: BP-9""#));
        assert!(special.contains(DISCLOSURE_SUMMARY_COLUMNS));
        assert!(!regular.contains("No. Faktur"));
        assert!(regular.contains(SUMMARY_COLUMNS));
    }

    #[test]
    fn test_customer_text_is_escaped() {
        let batch = InvoiceBatch {
            invoices: vec![invoice("INV-1", r#"PT "Quote" #1"#)],
        };
        let source = compose(&CompanyProfile::default(), &batch, None).source;
        assert!(source.contains(r#"#"PT \"Quote\" #1""#));
    }
}
