//! Workbook → table ingestion
//!
//! Sheets are loaded one at a time. A record-level failure (missing address
//! sources, missing rule fields, failed insert) ends the current sheet only;
//! the sheet is still committed and the next sheet is loaded.

use crate::error::{IsbeError, IsbeResult};
use crate::filter::{backfill, Rejection, RecordFilter};
use crate::normalize::{is_recognized, HeaderIndex, RCD_FIELD};
use crate::source::{Sheet, Workbook, MAX_ROWS};
use crate::store::SchoolSink;
use crate::types::{LoadSummary, SchoolRecord, SheetOutcome, SheetStatus};
use tracing::{debug, error, info, warn};

/// Load every recognized sheet of `workbook` into `sink`.
///
/// Only a failed commit aborts the load; per-sheet problems are reported in
/// the returned summary.
pub fn ingest_workbook<W, S>(
    workbook: &mut W,
    sink: &mut S,
    filter: &RecordFilter,
) -> IsbeResult<LoadSummary>
where
    W: Workbook + ?Sized,
    S: SchoolSink + ?Sized,
{
    let mut summary = LoadSummary::default();

    for sheet_name in workbook.sheet_names() {
        debug!(sheet = %sheet_name, "reading sheet");
        let sheet = match workbook.sheet(&sheet_name) {
            Ok(sheet) => sheet,
            Err(e) => {
                error!(sheet = %sheet_name, error = %e, "could not read sheet");
                let mut outcome = SheetOutcome::new(sheet_name, SheetStatus::Stopped);
                outcome.error = Some(e);
                summary.record(outcome);
                continue;
            }
        };

        let outcome = load_sheet(&sheet, sink, filter);
        if outcome.status != SheetStatus::Skipped {
            sink.commit()?;
        }
        summary.record(outcome);
    }

    Ok(summary)
}

/// Load the data rows of one sheet. Does not commit.
pub fn load_sheet<S>(sheet: &Sheet, sink: &mut S, filter: &RecordFilter) -> SheetOutcome
where
    S: SchoolSink + ?Sized,
{
    let header = sheet.header();
    if !is_recognized(header) {
        debug!(sheet = %sheet.name, "skipping sheet without RCD column");
        return SheetOutcome::skipped(&sheet.name);
    }

    let index = HeaderIndex::from_row(header);
    for name in index.duplicates() {
        warn!(sheet = %sheet.name, field = %name, "duplicate column, keeping the first");
    }
    let mut outcome = SheetOutcome::new(&sheet.name, SheetStatus::Completed);
    let Some(rcd_col) = index.position(RCD_FIELD) else {
        return outcome;
    };

    for rownum in 1..sheet.row_count().min(MAX_ROWS) {
        let Some(row) = sheet.row(rownum) else {
            break;
        };
        if row.get(rcd_col).map_or(true, |rcd| rcd.is_empty()) {
            continue;
        }
        outcome.rows_read += 1;

        let mut record = build_record(&index, row);
        debug!(sheet = %sheet.name, row = rownum, ?record);

        match store_record(&mut record, sink, filter) {
            Ok(Some(rejection)) => {
                debug!(sheet = %sheet.name, row = rownum, rcd = record.rcd(), "skipped: {}", rejection);
                outcome.rejected += 1;
            }
            Ok(None) => outcome.records_inserted += 1,
            Err(e) => {
                match &e {
                    IsbeError::Database(_) | IsbeError::MissingColumn { .. } => error!(
                        sheet = %sheet.name,
                        row = rownum,
                        statement = %sink.insert_statement(),
                        ?record,
                        "insert failed: {}",
                        e
                    ),
                    _ => error!(sheet = %sheet.name, row = rownum, ?record, "{}", e),
                }
                warn!(
                    sheet = %sheet.name,
                    inserted = outcome.records_inserted,
                    "stopping sheet early"
                );
                outcome.status = SheetStatus::Stopped;
                outcome.error = Some(e);
                return outcome;
            }
        }
    }

    info!(
        sheet = %sheet.name,
        read = outcome.rows_read,
        inserted = outcome.records_inserted,
        rejected = outcome.rejected,
        "sheet loaded"
    );
    outcome
}

/// Pair every indexed column with its cell; short rows read as empty
fn build_record(index: &HeaderIndex, row: &[String]) -> SchoolRecord {
    index
        .columns()
        .iter()
        .map(|(name, col)| (name.clone(), row.get(*col).cloned().unwrap_or_default()))
        .collect()
}

/// Filter, backfill and insert. `Ok(Some(_))` means the rules dropped it.
fn store_record<S>(
    record: &mut SchoolRecord,
    sink: &mut S,
    filter: &RecordFilter,
) -> IsbeResult<Option<Rejection>>
where
    S: SchoolSink + ?Sized,
{
    if let Some(rejection) = filter.check(record)? {
        return Ok(Some(rejection));
    }
    backfill(record)?;
    sink.insert(record)?;
    Ok(None)
}
