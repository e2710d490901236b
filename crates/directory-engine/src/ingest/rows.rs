//! Header-driven CSV row reading.

use std::io::Read;

use crate::error::DirectoryResult;
use crate::record::RawRow;

/// Read every data row of a CSV document with a header row.
///
/// Cells are keyed by the exact header text, so column order never matters
/// and unknown columns ride along harmlessly. Blank lines are not data rows;
/// the `row` carried by each [`RawRow`] is its 1-based position among data
/// rows only.
pub fn read_rows<R: Read>(input: R) -> DirectoryResult<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result?;
        let mut row = RawRow::new(index + 1);
        for (header, cell) in headers.iter().zip(record.iter()) {
            row.insert(header, cell);
        }
        rows.push(row);
    }
    Ok(rows)
}
