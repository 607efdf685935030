//! Record rules: which rows are schools worth keeping, and the address /
//! NCES id backfill applied before they are stored.

use crate::error::{IsbeError, IsbeResult};
use crate::grades::{expand_grades, overlaps, GradeSet};
use crate::types::SchoolRecord;
use std::fmt;

/// Default substring marking district-level records
pub const DEFAULT_DISTRICT_MARKER: &str = "Dist";

/// Default non-school record types (regional offices, service centers)
pub const DEFAULT_EXCLUDED_RECTYPES: [&str; 2] = ["ROE", "ISC"];

/// Why a record was dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    District(String),
    NonSchoolType(String),
    NoGradeOverlap(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::District(t) => write!(f, "district record type '{}'", t),
            Rejection::NonSchoolType(t) => write!(f, "non-school record type '{}'", t),
            Rejection::NoGradeOverlap(g) => write!(f, "grades '{}' outside grades of interest", g),
        }
    }
}

/// Record-type and grade-overlap rules
#[derive(Debug, Clone)]
pub struct RecordFilter {
    grades_of_interest: GradeSet,
    district_marker: String,
    excluded_rectypes: Vec<String>,
}

impl RecordFilter {
    /// Filter with the default record-type rules and the given grades spec
    pub fn new(grades_spec: &str) -> Self {
        Self::with_rules(
            grades_spec,
            DEFAULT_DISTRICT_MARKER,
            DEFAULT_EXCLUDED_RECTYPES.iter().map(|s| s.to_string()).collect(),
        )
    }

    pub fn with_rules(
        grades_spec: &str,
        district_marker: impl Into<String>,
        excluded_rectypes: Vec<String>,
    ) -> Self {
        Self {
            grades_of_interest: expand_grades(grades_spec),
            district_marker: district_marker.into(),
            excluded_rectypes,
        }
    }

    pub fn grades_of_interest(&self) -> &GradeSet {
        &self.grades_of_interest
    }

    /// Check a record against the rules.
    ///
    /// `Ok(None)` keeps the record. Missing `rectype` or `gradeserved` is an
    /// error since neither rule can run.
    pub fn check(&self, record: &SchoolRecord) -> IsbeResult<Option<Rejection>> {
        let rectype = required(record, "rectype")?;
        if !self.district_marker.is_empty() && rectype.contains(&self.district_marker) {
            return Ok(Some(Rejection::District(rectype.to_string())));
        }
        if self.excluded_rectypes.iter().any(|t| t == rectype) {
            return Ok(Some(Rejection::NonSchoolType(rectype.to_string())));
        }

        let served = required(record, "gradeserved")?;
        if !overlaps(&expand_grades(served), &self.grades_of_interest) {
            return Ok(Some(Rejection::NoGradeOverlap(served.to_string())));
        }
        Ok(None)
    }
}

fn required<'a>(record: &'a SchoolRecord, field: &str) -> IsbeResult<&'a str> {
    record.get(field).ok_or_else(|| IsbeError::MissingField {
        field: field.to_string(),
        rcd: record.rcd().to_string(),
    })
}

/// Fill in `address` and `nces_id` for sheets that lack those columns.
///
/// A missing `address` takes `delivery_address` when that is non-empty,
/// otherwise `mailing_address`. A missing `nces_id` becomes empty.
pub fn backfill(record: &mut SchoolRecord) -> IsbeResult<()> {
    if !record.contains("address") {
        let address = match (record.get("delivery_address"), record.get("mailing_address")) {
            (Some(delivery), _) if !delivery.is_empty() => delivery.to_string(),
            (_, Some(mailing)) => mailing.to_string(),
            _ => {
                return Err(IsbeError::MissingAddress {
                    rcd: record.rcd().to_string(),
                })
            }
        };
        record.insert("address", address);
    }
    if !record.contains("nces_id") {
        record.insert("nces_id", "");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn school(rectype: &str, grades: &str) -> SchoolRecord {
        [
            ("rcd", "01001001002"),
            ("rectype", rectype),
            ("gradeserved", grades),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_keeps_matching_school() {
        let filter = RecordFilter::new("7-9");
        assert_eq!(filter.check(&school("Public", "6-8")).unwrap(), None);
    }

    #[test]
    fn test_roe_always_excluded() {
        let filter = RecordFilter::new("P-U");
        assert_eq!(
            filter.check(&school("ROE", "P-U")).unwrap(),
            Some(Rejection::NonSchoolType("ROE".into()))
        );
    }

    #[test]
    fn test_district_substring_excluded() {
        let filter = RecordFilter::new("7-9");
        assert_eq!(
            filter.check(&school("Dist", "K-12")).unwrap(),
            Some(Rejection::District("Dist".into()))
        );
        assert_eq!(
            filter.check(&school("Unit Dist", "K-12")).unwrap(),
            Some(Rejection::District("Unit Dist".into()))
        );
    }

    #[test]
    fn test_excluded_type_needs_exact_match() {
        let filter = RecordFilter::new("7-9");
        assert_eq!(filter.check(&school("ROE Program", "7")).unwrap(), None);
    }

    #[test]
    fn test_grade_overlap() {
        let record = school("Public", "K-5");
        assert_eq!(
            RecordFilter::new("7-9").check(&record).unwrap(),
            Some(Rejection::NoGradeOverlap("K-5".into()))
        );
        assert_eq!(RecordFilter::new("5-8").check(&record).unwrap(), None);
    }

    #[test]
    fn test_custom_rules() {
        let filter = RecordFilter::with_rules("7-9", "", vec!["Coop".into()]);
        assert_eq!(filter.check(&school("Dist", "8")).unwrap(), None);
        assert!(filter.check(&school("Coop", "8")).unwrap().is_some());
    }

    #[test]
    fn test_missing_rectype_is_error() {
        let record: SchoolRecord = [("rcd", "9"), ("gradeserved", "7")].into_iter().collect();
        let err = RecordFilter::new("7-9").check(&record).unwrap_err();
        assert!(matches!(err, IsbeError::MissingField { ref field, .. } if field == "rectype"));
    }

    #[test]
    fn test_backfill_prefers_delivery_address() {
        let mut record: SchoolRecord = [
            ("delivery_address", "1 Main St"),
            ("mailing_address", "PO Box 9"),
        ]
        .into_iter()
        .collect();
        backfill(&mut record).unwrap();
        assert_eq!(record.get("address"), Some("1 Main St"));
        assert_eq!(record.get("nces_id"), Some(""));
    }

    #[test]
    fn test_backfill_falls_back_to_mailing_address() {
        let mut record: SchoolRecord = [("delivery_address", ""), ("mailing_address", "PO Box 9")]
            .into_iter()
            .collect();
        backfill(&mut record).unwrap();
        assert_eq!(record.get("address"), Some("PO Box 9"));
    }

    #[test]
    fn test_backfill_keeps_existing_values() {
        let mut record: SchoolRecord = [("address", "2 Elm St"), ("nces_id", "170993000000")]
            .into_iter()
            .collect();
        backfill(&mut record).unwrap();
        assert_eq!(record.get("address"), Some("2 Elm St"));
        assert_eq!(record.get("nces_id"), Some("170993000000"));
    }

    #[test]
    fn test_backfill_without_address_sources() {
        let mut record: SchoolRecord = [("rcd", "7"), ("delivery_address", "")].into_iter().collect();
        assert!(matches!(
            backfill(&mut record),
            Err(IsbeError::MissingAddress { rcd }) if rcd == "7"
        ));
    }
}
