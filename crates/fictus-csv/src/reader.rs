//! The tabular record reader.
//!
//! Reads a delimited text file into a lazy sequence of header→value rows.
//! Quoted fields containing the delimiter are handled by the csv crate and
//! surrounding quotes are stripped from emitted values.
//!
//! Malformed-row policy, applied silently row by row:
//! - a row whose field count differs from the header count is discarded;
//! - a row whose every field is empty or whitespace is discarded.
//!
//! A missing file is fatal and surfaces to the caller as
//! [`FictusError::InputFile`]; it is never retried. The sequence is
//! restartable by calling [`RowReader::open`] again.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use tracing::warn;

use fictus_contracts::error::{FictusError, FictusResult};

/// The default field delimiter. Sources with `;`-delimited layouts pass the
/// alternate delimiter explicitly.
pub const DEFAULT_DELIMITER: u8 = b',';

/// One parsed row: an ordered mapping from header token to field value.
///
/// Key order is column order. Values have surrounding quotes stripped and
/// leading/trailing whitespace trimmed.
#[derive(Debug, Clone)]
pub struct Row {
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl Row {
    /// Look up a field by header token.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .position(|h| h == name)
            .map(|i| self.values[i].as_str())
    }

    /// Iterate `(header, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }

    /// Number of fields in the row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the row holds no fields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A lazy iterator over the rows of one delimited file.
pub struct RowReader {
    path: String,
    headers: Arc<[String]>,
    records: csv::StringRecordsIntoIter<File>,
}

impl std::fmt::Debug for RowReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowReader")
            .field("path", &self.path)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl RowReader {
    /// Open `path` with the default `,` delimiter.
    pub fn open(path: &Path) -> FictusResult<Self> {
        Self::open_with_delimiter(path, DEFAULT_DELIMITER)
    }

    /// Open `path` with an explicit delimiter.
    ///
    /// Reads and validates the header row eagerly; data rows are decoded on
    /// demand as the iterator advances.
    pub fn open_with_delimiter(path: &Path, delimiter: u8) -> FictusResult<Self> {
        let input_err = |reason: String| FictusError::InputFile {
            path: path.display().to_string(),
            reason,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| input_err(e.to_string()))?;

        let headers: Arc<[String]> = reader
            .headers()
            .map_err(|e| input_err(format!("unreadable header row: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();

        Ok(Self {
            path: path.display().to_string(),
            headers,
            records: reader.into_records(),
        })
    }

    /// The header tokens, in column order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl Iterator for RowReader {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(e) => {
                    // Undecodable record: same silent-discard policy as a
                    // malformed row, but worth a trace.
                    warn!(path = %self.path, error = %e, "skipping unreadable row");
                    continue;
                }
            };

            if record.len() != self.headers.len() {
                continue;
            }
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }

            return Some(Row {
                headers: Arc::clone(&self.headers),
                values: record.iter().map(str::to_string).collect(),
            });
        }
    }
}
