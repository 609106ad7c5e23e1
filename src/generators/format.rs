//! Number formatting for invoice cells and totals.

use std::fmt;

use thiserror::Error;

const MONEY_PREFIX: &str = "Rp. ";

/// Numeric columns of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Quantity,
    BaseAmount,
    TaxAmount,
    WithholdingAmount,
}

impl ItemField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Quantity => "qty",
            Self::BaseAmount => "dpp",
            Self::TaxAmount => "ppn",
            Self::WithholdingAmount => "pph",
        }
    }
}

impl fmt::Display for ItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A numeric cell that could not be read as a number.
///
/// The raw text is kept so the cell can still be printed as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field {field} is not numeric: '{raw}'")]
pub struct FieldFormatError {
    pub field: ItemField,
    pub raw: String,
}

/// Parse a spreadsheet amount.
///
/// Blank input is `Ok(None)`. Decimals are truncated toward zero.
pub fn parse_amount(raw: &str, field: ItemField) -> Result<Option<i64>, FieldFormatError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(Some(value));
    }

    let invalid = || FieldFormatError {
        field,
        raw: raw.to_string(),
    };

    let value = trimmed.parse::<f64>().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    let truncated = value.trunc();
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return Err(invalid());
    }
    Ok(Some(truncated as i64))
}

/// Group digits in threes with commas, e.g. `1,234,567`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// A formatted money cell and the amount it stands for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoneyCell {
    pub text: String,
    /// `None` for a blank cell.
    pub value: Option<i64>,
}

/// Money cell text: `Rp. 1,000,000`, or empty for a blank cell.
pub fn format_money(raw: &str, field: ItemField) -> Result<MoneyCell, FieldFormatError> {
    let value = parse_amount(raw, field)?;
    Ok(MoneyCell {
        text: value.map(money).unwrap_or_default(),
        value,
    })
}

/// Money text for an already computed amount.
pub fn money(value: i64) -> String {
    format!("{MONEY_PREFIX}{}", group_thousands(value))
}

/// Quantity cell text: `1,250`, or empty for a blank cell.
pub fn format_quantity(raw: &str) -> Result<String, FieldFormatError> {
    Ok(parse_amount(raw, ItemField::Quantity)?
        .map(group_thousands)
        .unwrap_or_default())
}
