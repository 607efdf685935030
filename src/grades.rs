//! Grade-range expansion
//!
//! Grade specifications are comma-separated lists of single grades or
//! `first-last` ranges, e.g. `"P-K,1,7-9"`. Ranges are resolved against a
//! fixed ordered vocabulary of grade labels.

use crate::error::{IsbeError, IsbeResult};
use std::collections::BTreeSet;
use tracing::error;

/// Every grade label, in the order that defines a range
pub const GRADE_VOCABULARY: [&str; 15] = [
    "P", "K", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "U",
];

/// Default grades of interest
pub const DEFAULT_GRADES: &str = "7-9";

/// A set of grade tokens. Single tokens are not validated, so anything the
/// workbook contains may end up in here.
pub type GradeSet = BTreeSet<String>;

fn vocabulary_position(token: &str) -> Option<usize> {
    GRADE_VOCABULARY.iter().position(|g| *g == token)
}

/// Expand a full grade specification into the set of grades it names.
///
/// Malformed ranges are logged and contribute nothing.
pub fn expand_grades(spec: &str) -> GradeSet {
    spec.split(',').flat_map(expand_range).collect()
}

/// Expand one range spec, logging and ignoring a malformed one.
pub fn expand_range(range_spec: &str) -> GradeSet {
    match parse_range(range_spec) {
        Ok(grades) => grades,
        Err(e) => {
            error!(range = range_spec, "{}", e);
            GradeSet::new()
        }
    }
}

/// Strict variant of [`expand_grades`]: fails on the first malformed range.
pub fn parse_grades(spec: &str) -> IsbeResult<GradeSet> {
    let mut grades = GradeSet::new();
    for range_spec in spec.split(',') {
        grades.extend(parse_range(range_spec)?);
    }
    Ok(grades)
}

/// Expand one range spec.
///
/// - `"x"` is the singleton `{x}`, whether or not `x` is a known grade.
/// - `"first-last"` is the vocabulary slice from `first` to `last` inclusive.
///   An unknown `first` gives nothing, an unknown `last` runs to the end of
///   the vocabulary, and `last` before `first` gives nothing.
/// - more than one `-` is an error.
pub fn parse_range(range_spec: &str) -> IsbeResult<GradeSet> {
    let bounds: Vec<&str> = range_spec.split('-').collect();
    match bounds.as_slice() {
        [single] => Ok(GradeSet::from([single.to_string()])),
        [first, last] => {
            let Some(start) = vocabulary_position(first) else {
                return Ok(GradeSet::new());
            };
            let end = match vocabulary_position(last) {
                Some(end) if end < start => return Ok(GradeSet::new()),
                Some(end) => end,
                None => GRADE_VOCABULARY.len() - 1,
            };
            Ok(GRADE_VOCABULARY[start..=end]
                .iter()
                .map(|g| g.to_string())
                .collect())
        }
        _ => Err(IsbeError::GradeRange(range_spec.to_string())),
    }
}

/// Grades in vocabulary order, followed by any unknown tokens in text order
pub fn in_vocabulary_order(grades: &GradeSet) -> Vec<&str> {
    let mut ordered: Vec<&str> = grades.iter().map(String::as_str).collect();
    ordered.sort_by_key(|g| vocabulary_position(g).unwrap_or(GRADE_VOCABULARY.len()));
    ordered
}

/// True if the two sets share at least one grade
pub fn overlaps(a: &GradeSet, b: &GradeSet) -> bool {
    !a.is_disjoint(b)
}
