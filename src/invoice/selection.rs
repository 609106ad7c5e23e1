//! Row selection applied before grouping.

use thiserror::Error;

use super::models::SourceRow;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("row index {index} is out of range ({total} rows available)")]
    OutOfRange { index: usize, total: usize },
    #[error("no rows selected")]
    NothingSelected,
}

/// Pick the selected rows in sheet order.
///
/// `None` selects every row. Duplicate indices are ignored.
pub fn select_rows(
    rows: &[SourceRow],
    selected: Option<&[usize]>,
) -> Result<Vec<SourceRow>, SelectionError> {
    let picked: Vec<SourceRow> = match selected {
        None => rows.to_vec(),
        Some(indices) => {
            let mut indices = indices.to_vec();
            indices.sort_unstable();
            indices.dedup();
            if let Some(&index) = indices.iter().find(|&&index| index >= rows.len()) {
                return Err(SelectionError::OutOfRange {
                    index,
                    total: rows.len(),
                });
            }
            indices.into_iter().map(|index| rows[index].clone()).collect()
        }
    };

    if picked.is_empty() {
        return Err(SelectionError::NothingSelected);
    }
    Ok(picked)
}

/// Parse a comma separated index list such as `0, 2,5`.
pub fn parse_index_list(value: &str) -> Result<Vec<usize>, String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<usize>()
                .map_err(|_| format!("'{}' is not a valid row index", part))
        })
        .collect()
}
