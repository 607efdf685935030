//! Spreadsheet sources - workbook files read with calamine, or in-memory sheets

use crate::error::{IsbeError, IsbeResult};
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Upper bound on rows read from a single sheet
pub const MAX_ROWS: usize = 5_000_000;

/// One sheet as rows of cell text. Row 0 is the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// The header row, empty for an empty sheet
    pub fn header(&self) -> &[String] {
        self.row(0).unwrap_or_default()
    }
}

/// A sequence of named sheets
pub trait Workbook {
    fn sheet_names(&self) -> Vec<String>;

    fn sheet(&mut self, name: &str) -> IsbeResult<Sheet>;
}

/// Workbook file (.xls, .xlsx, .xlsb, .ods) opened through calamine
pub struct CalamineWorkbook {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
}

impl CalamineWorkbook {
    pub fn open<P: AsRef<Path>>(path: P) -> IsbeResult<Self> {
        let path = path.as_ref().to_path_buf();
        let sheets = open_workbook_auto(&path).map_err(|e| {
            IsbeError::Workbook(format!("Failed to open {}: {}", path.display(), e))
        })?;
        Ok(Self { path, sheets })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Workbook for CalamineWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn sheet(&mut self, name: &str) -> IsbeResult<Sheet> {
        let range = self.sheets.worksheet_range(name)?;
        Ok(Sheet::new(name, range_to_rows(&range)))
    }
}

/// Convert a calamine range to text rows anchored at A1.
///
/// calamine trims leading empty rows and columns from the used range; they
/// are put back so that row 0 is always the sheet's first row.
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };
    let (start_row, start_col) = (start_row as usize, start_col as usize);
    let width = start_col + range.width();

    let mut rows = vec![vec![String::new(); width]; start_row.min(MAX_ROWS)];
    for cells in range.rows().take(MAX_ROWS.saturating_sub(start_row)) {
        let mut row = vec![String::new(); start_col];
        row.extend(cells.iter().map(cell_text));
        rows.push(row);
    }
    rows
}

/// Render a cell as text. Whole-number floats drop their fraction so codes
/// such as ZIPs read as `62701`, not `62701.0`.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Workbook held in memory, in sheet order
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<Sheet>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet from string-slice rows
    pub fn with_sheet(mut self, name: &str, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        self.sheets.push(Sheet::new(name, rows));
        self
    }
}

impl Workbook for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn sheet(&mut self, name: &str) -> IsbeResult<Sheet> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| IsbeError::Workbook(format!("No sheet named '{}'", name)))
    }
}
