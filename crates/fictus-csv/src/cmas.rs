//! CMAS score file reading.
//!
//! Two source layouts exist:
//!
//! - the narrow layout written by the generator:
//!   `PatientID,Date,Score,Category` with `,` as delimiter;
//! - a wide `;`-delimited legacy layout where the first row holds dates and
//!   two fixed label rows hold the "> 10" and "4-9" score series.
//!
//! [`read_cmas`] sniffs the header line and parses whichever layout it
//! finds. The category column/label is never trusted: the category is
//! always re-derived from the score with the canonical rule.

use std::path::Path;

use tracing::warn;

use fictus_contracts::error::{FictusError, FictusResult};
use fictus_contracts::ids::PatientId;
use fictus_contracts::record::{CmasCategory, CmasScore};

use crate::reader::RowReader;

/// Read CMAS rows from `path`, accepting either layout.
///
/// `owner` supplies the patient key for layouts that do not carry one (the
/// wide layout has no patient column; narrow rows missing `PatientID` fall
/// back to it too).
pub fn read_cmas(path: &Path, owner: Option<&PatientId>) -> FictusResult<Vec<CmasScore>> {
    let contents = std::fs::read_to_string(path).map_err(|e| FictusError::InputFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let header = contents.lines().next().unwrap_or_default();
    if header.contains(';') {
        read_wide(path, owner)
    } else {
        read_narrow(path, owner)
    }
}

// ── Narrow layout ─────────────────────────────────────────────────────────────

fn read_narrow(path: &Path, owner: Option<&PatientId>) -> FictusResult<Vec<CmasScore>> {
    let mut out = Vec::new();
    for row in RowReader::open(path)? {
        let Some(date) = row.get("Date") else { continue };
        let Some(raw_score) = row.get("Score") else { continue };

        let Ok(score) = raw_score.parse::<f64>() else {
            warn!(path = %path.display(), score = raw_score, "skipping CMAS row with non-numeric score");
            continue;
        };

        let patient_id = match row.get("PatientID").filter(|v| !v.is_empty()) {
            Some(id) => PatientId::new(id),
            None => match owner {
                Some(owner) => owner.clone(),
                None => continue,
            },
        };

        out.push(CmasScore {
            patient_id,
            date: date.to_string(),
            score,
            category: CmasCategory::from_score(score),
        });
    }
    Ok(out)
}

// ── Wide layout ───────────────────────────────────────────────────────────────

/// Substrings identifying the two score series rows in the wide layout.
const WIDE_SERIES_LABELS: [&str; 2] = [">10", "4-9"];

fn read_wide(path: &Path, owner: Option<&PatientId>) -> FictusResult<Vec<CmasScore>> {
    let owner = owner.ok_or_else(|| FictusError::InputFile {
        path: path.display().to_string(),
        reason: "wide CMAS layout needs an owning patient row".to_string(),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| FictusError::InputFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    let mut records = Vec::new();
    for record in reader.records() {
        match record {
            Ok(record) => records.push(record),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable wide CMAS row"),
        }
    }

    let Some(dates) = records.first() else {
        return Ok(Vec::new());
    };

    let mut out = Vec::new();
    for record in records.iter().skip(1) {
        let label = record.get(0).unwrap_or_default();
        let label_no_ws: String = label.split_whitespace().collect();
        if !WIDE_SERIES_LABELS.iter().any(|l| label_no_ws.contains(l)) {
            continue;
        }

        // Column-aligned with the date row; column 0 is the series label.
        for (col, cell) in record.iter().enumerate().skip(1) {
            if cell.is_empty() {
                continue;
            }
            let Some(date) = dates.get(col).filter(|d| !d.is_empty()) else {
                continue;
            };
            let Ok(score) = cell.parse::<f64>() else {
                warn!(path = %path.display(), cell, "skipping non-numeric wide CMAS cell");
                continue;
            };
            out.push(CmasScore {
                patient_id: owner.clone(),
                date: date.to_string(),
                score,
                category: CmasCategory::from_score(score),
            });
        }
    }
    Ok(out)
}
