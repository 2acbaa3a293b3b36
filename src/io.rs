//! Line-delimited JSON ingestion and emission.
//!
//! Input is one JSON object per line. A malformed line is logged and
//! skipped; a failure to open or read the file at all aborts the run via
//! [`MatchError::Io`].

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::diagnostics::{MatchError, log_skipped_record};
use crate::emit::EmittedMatch;
use crate::listing::{ListingRecord, ListingTable, RejectReason};
use crate::product::{ProductRecord, ProductTable};
use crate::currency::CurrencyTable;

fn open(path: &Path) -> Result<BufReader<File>, MatchError> {
    let file = File::open(path).map_err(|source| MatchError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Read a products file, one JSON object per line, ingesting each into
/// `table`. Malformed lines are logged and skipped.
pub fn load_products(path: &Path, table: &mut ProductTable) -> Result<(), MatchError> {
    let reader = open(path)?;
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| MatchError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ProductRecord>(&line) {
            Ok(record) => {
                table.ingest(record);
            }
            Err(e) => log_skipped_record("product", line_no + 1, &e.to_string()),
        }
    }
    Ok(())
}

/// Read a listings file, one JSON object per line, ingesting each into
/// `table`. Malformed lines, unknown currencies, and listings with no
/// known-manufacturer match are all logged and skipped.
pub fn load_listings(
    path: &Path,
    table: &mut ListingTable,
    currencies: &CurrencyTable,
    known_manufacturers: &[String],
) -> Result<(), MatchError> {
    let reader = open(path)?;
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| MatchError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let record: ListingRecord = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(e) => {
                log_skipped_record("listing", line_no + 1, &e.to_string());
                continue;
            }
        };

        if let Err(reason) = table.ingest(record, currencies, known_manufacturers.iter()) {
            let reason_str = match reason {
                RejectReason::UnknownCurrency => "unknown currency",
                RejectReason::NoManufacturerMatch => "no known manufacturer match",
            };
            log_skipped_record("listing", line_no + 1, reason_str);
        }
    }
    Ok(())
}

/// Write the emitted matches as line-delimited JSON to `out`, flushing once
/// after the last record.
pub fn write_matches<W: Write>(mut out: W, matches: &[EmittedMatch]) -> Result<(), MatchError> {
    let wrap_err = |source| MatchError::Io {
        path: "<stdout>".to_string(),
        source,
    };
    for record in matches {
        let line = serde_json::to_string(record).expect("EmittedMatch always serializes");
        writeln!(out, "{line}").map_err(wrap_err)?;
    }
    out.flush().map_err(wrap_err)
}
