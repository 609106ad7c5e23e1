//! Grouping of selected rows into per-customer invoices.

use std::collections::HashMap;

use super::models::{Invoice, InvoiceBatch, InvoiceHeader, SourceRow};

/// Group rows by (customer, invoice number, date).
///
/// Invoices come out in the order their key is first seen and keep their rows
/// in sheet order. Rows missing any part of the key belong to no invoice and
/// are skipped.
pub fn group_rows(rows: &[SourceRow]) -> InvoiceBatch {
    let mut invoices: Vec<Invoice> = Vec::new();
    let mut positions: HashMap<InvoiceHeader, usize> = HashMap::new();
    let mut skipped = 0usize;

    for row in rows {
        if !row.has_invoice_key() {
            skipped += 1;
            continue;
        }
        let header = row.header();
        let position = match positions.get(&header) {
            Some(&position) => position,
            None => {
                positions.insert(header.clone(), invoices.len());
                invoices.push(Invoice {
                    header,
                    items: Vec::new(),
                });
                invoices.len() - 1
            }
        };
        invoices[position].items.push(row.to_line_item());
    }

    if skipped > 0 {
        log::warn!(
            "Skipped {} rows without customer, invoice number or date",
            skipped
        );
    }
    log::debug!("Grouped {} rows into {} invoices", rows.len() - skipped, invoices.len());
    InvoiceBatch { invoices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn row(customer: &str, invoice_no: &str, date: &str, description: &str) -> SourceRow {
        SourceRow {
            customer: customer.into(),
            invoice_no: invoice_no.into(),
            date: date.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_groups_in_first_seen_order() {
        let rows = vec![
            row("B", "2", "d", "b1"),
            row("A", "1", "d", "a1"),
            row("B", "2", "d", "b2"),
            row("A", "1", "e", "a-other-date"),
        ];
        let batch = group_rows(&rows);
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.invoices[0].header.customer_name, "B");
        assert_eq!(batch.invoices[0].items.len(), 2);
        assert_eq!(batch.invoices[0].items[1].description, "b2");
        assert_eq!(batch.invoices[1].header.invoice_number, "1");
        assert_eq!(batch.invoices[2].header.date, "e");
    }

    #[test]
    fn test_rows_without_full_key_are_skipped() {
        let rows = vec![
            row("", "1", "d", "no customer"),
            row("A", "1", "d", "a1"),
            row("A", " ", "d", "no number"),
            row("A", "1", "", "no date"),
            row("", "", "", "notes only"),
        ];
        let batch = group_rows(&rows);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.invoices[0].items.len(), 1);
        assert_eq!(batch.invoices[0].items[0].description, "a1");
    }

    #[test]
    fn test_empty_rows_give_empty_batch() {
        assert!(group_rows(&[]).is_empty());
    }

    proptest! {
        #[test]
        fn prop_one_invoice_per_distinct_key(keys in prop::collection::vec((0u8..3, 0u8..3, 0u8..2), 0..40)) {
            let rows: Vec<SourceRow> = keys
                .iter()
                .enumerate()
                .map(|(i, (c, n, d))| row(&format!("C{c}"), &format!("N{n}"), &format!("D{d}"), &i.to_string()))
                .collect();

            let batch = group_rows(&rows);

            let mut distinct = Vec::new();
            for key in &keys {
                if !distinct.contains(key) {
                    distinct.push(*key);
                }
            }
            prop_assert_eq!(batch.len(), distinct.len());

            for (invoice, (c, n, d)) in batch.invoices.iter().zip(&distinct) {
                prop_assert_eq!(&invoice.header.customer_name, &format!("C{c}"));
                prop_assert_eq!(&invoice.header.invoice_number, &format!("N{n}"));
                prop_assert_eq!(&invoice.header.date, &format!("D{d}"));

                let expected: Vec<String> = keys
                    .iter()
                    .enumerate()
                    .filter(|(_, key)| *key == &(*c, *n, *d))
                    .map(|(i, _)| i.to_string())
                    .collect();
                let actual: Vec<String> = invoice.items.iter().map(|item| item.description.clone()).collect();
                prop_assert_eq!(actual, expected);
            }
        }
    }
}
