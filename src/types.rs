use crate::error::IsbeError;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

//==============================================================================
// School Record
//==============================================================================

/// One data row keyed by canonical field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SchoolRecord {
    fields: BTreeMap<String, String>,
}

impl SchoolRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// The record's RCD code, or empty if the row had none
    pub fn rcd(&self) -> &str {
        self.get(crate::normalize::RCD_FIELD).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SchoolRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = SchoolRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

//==============================================================================
// Load results
//==============================================================================

/// How far a sheet got
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetStatus {
    /// Header row lacks the RCD column
    Skipped,
    /// Every row was iterated
    Completed,
    /// A record-level error ended the sheet
    Stopped,
}

/// Result of loading one sheet
#[derive(Debug, Serialize)]
pub struct SheetOutcome {
    pub sheet: String,
    pub status: SheetStatus,
    /// Rows with a non-empty RCD
    pub rows_read: usize,
    pub records_inserted: usize,
    /// Rows dropped by the record-type or grade rules
    pub rejected: usize,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<IsbeError>,
}

impl SheetOutcome {
    pub fn skipped(sheet: impl Into<String>) -> Self {
        Self::new(sheet, SheetStatus::Skipped)
    }

    pub fn new(sheet: impl Into<String>, status: SheetStatus) -> Self {
        Self {
            sheet: sheet.into(),
            status,
            rows_read: 0,
            records_inserted: 0,
            rejected: 0,
            error: None,
        }
    }

    pub fn stopped_early(&self) -> bool {
        self.status == SheetStatus::Stopped
    }
}

fn serialize_error<S: Serializer>(error: &Option<IsbeError>, s: S) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => s.serialize_some(&e.to_string()),
        None => s.serialize_none(),
    }
}

/// Counters accumulated over a whole workbook
#[derive(Debug, Default, Serialize)]
pub struct LoadSummary {
    /// Sheets that were not skipped (RCD header present, or unreadable)
    pub sheets: usize,
    /// Rows with a non-empty RCD
    pub reads: usize,
    /// Records inserted
    pub writes: usize,
    pub rejected: usize,
    pub outcomes: Vec<SheetOutcome>,
}

impl LoadSummary {
    pub fn record(&mut self, outcome: SheetOutcome) {
        if outcome.status != SheetStatus::Skipped {
            self.sheets += 1;
        }
        self.reads += outcome.rows_read;
        self.writes += outcome.records_inserted;
        self.rejected += outcome.rejected;
        self.outcomes.push(outcome);
    }

    /// Sheets that ended on a record-level error
    pub fn stopped(&self) -> impl Iterator<Item = &SheetOutcome> {
        self.outcomes.iter().filter(|o| o.stopped_early())
    }
}
