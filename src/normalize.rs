//! Header normalization - raw spreadsheet labels → canonical field names

use std::collections::HashMap;

/// The composite Region-County-District header as it appears in the workbook
pub const RCD_HEADER: &str = "Region-2\nCounty-3\nDistrict-4";

/// Canonical name of the composite code column
pub const RCD_FIELD: &str = "rcd";

/// Map a raw header label to its canonical field name.
///
/// The RCD label is matched exactly (case-sensitive); every other label is
/// lowercased with spaces replaced by underscores.
pub fn normalize_header(header: &str) -> String {
    if header == RCD_HEADER {
        return RCD_FIELD.to_string();
    }
    header.to_lowercase().replace(' ', "_")
}

/// True if a raw header row carries the RCD column
pub fn is_recognized(header_row: &[String]) -> bool {
    header_row.iter().any(|h| h == RCD_HEADER)
}

/// Canonical field name → column index for one sheet
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    columns: Vec<(String, usize)>,
    positions: HashMap<String, usize>,
    duplicates: Vec<String>,
}

impl HeaderIndex {
    /// Build the index from a raw header row.
    ///
    /// When two labels normalize to the same name the first column is kept
    /// and the name is reported in [`HeaderIndex::duplicates`].
    pub fn from_row(header_row: &[String]) -> Self {
        let mut index = HeaderIndex::default();
        for (col, raw) in header_row.iter().enumerate() {
            let name = normalize_header(raw);
            if index.positions.contains_key(&name) {
                if !index.duplicates.contains(&name) {
                    index.duplicates.push(name);
                }
                continue;
            }
            index.positions.insert(name.clone(), col);
            index.columns.push((name, col));
        }
        index
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Canonical names paired with their column, in header order
    pub fn columns(&self) -> &[(String, usize)] {
        &self.columns
    }

    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
