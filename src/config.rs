//! Load configuration - YAML file with CLI / environment overrides

use crate::error::{IsbeError, IsbeResult};
use crate::filter::{RecordFilter, DEFAULT_DISTRICT_MARKER, DEFAULT_EXCLUDED_RECTYPES};
use crate::grades::DEFAULT_GRADES;
use crate::store::{TableSchema, DEFAULT_COLUMNS, DEFAULT_TABLE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_WORKBOOK: &str = "data/dir_ed_entities.xls";
pub const DEFAULT_DATABASE: &str = "schools.db";

/// Everything a load needs to know.
///
/// Every key is optional in the YAML file:
///
/// ```yaml
/// workbook: data/dir_ed_entities.xls
/// database: schools.db
/// grades: "7-9"
/// table: schools
/// columns: [rcd, rectype, facilityname, city]
/// district_marker: Dist
/// excluded_rectypes: [ROE, ISC]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadConfig {
    pub workbook: PathBuf,
    pub database: PathBuf,
    pub grades: String,
    pub table: String,
    pub columns: Vec<String>,
    pub district_marker: String,
    pub excluded_rectypes: Vec<String>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            workbook: PathBuf::from(DEFAULT_WORKBOOK),
            database: PathBuf::from(DEFAULT_DATABASE),
            grades: DEFAULT_GRADES.to_string(),
            table: DEFAULT_TABLE.to_string(),
            columns: DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            district_marker: DEFAULT_DISTRICT_MARKER.to_string(),
            excluded_rectypes: DEFAULT_EXCLUDED_RECTYPES
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

impl LoadConfig {
    /// Read a YAML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> IsbeResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> IsbeResult<Self> {
        // An empty file is a valid "all defaults" config
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply command-line overrides on top of file values
    pub fn with_overrides(
        mut self,
        workbook: Option<PathBuf>,
        database: Option<PathBuf>,
        grades: Option<String>,
    ) -> Self {
        if let Some(workbook) = workbook {
            self.workbook = workbook;
        }
        if let Some(database) = database {
            self.database = database;
        }
        if let Some(grades) = grades {
            self.grades = grades;
        }
        self
    }

    /// Reject settings that cannot produce a usable table
    pub fn validate(&self) -> IsbeResult<()> {
        if !is_identifier(&self.table) {
            return Err(IsbeError::Config(format!(
                "table name '{}' is not a valid SQL identifier",
                self.table
            )));
        }
        if self.columns.is_empty() {
            return Err(IsbeError::Config("no columns configured".to_string()));
        }
        if let Some(bad) = self.columns.iter().find(|c| !is_identifier(c)) {
            return Err(IsbeError::Config(format!(
                "column '{}' is not a valid SQL identifier",
                bad
            )));
        }
        if self.grades.trim().is_empty() {
            return Err(IsbeError::Config("grades of interest are empty".to_string()));
        }
        Ok(())
    }

    pub fn schema(&self) -> TableSchema {
        TableSchema::new(self.table.clone(), self.columns.clone())
    }

    pub fn filter(&self) -> RecordFilter {
        RecordFilter::with_rules(
            &self.grades,
            self.district_marker.clone(),
            self.excluded_rectypes.clone(),
        )
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
