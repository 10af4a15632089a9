//! Structured results returned by the workflow state machines.
//!
//! Workflows never print progress themselves — callers receive one of
//! these reports and decide how to render it. Skip/failure totals live
//! here so idempotence ("second run created zero entities") is observable
//! without capturing logs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ids::PatientId;

/// What the upsert of one record actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertAction {
    /// No remote record matched the natural key; one was created.
    Created,
    /// A remote record already matched the natural key; creation skipped.
    Reused,
    /// The find or create call failed; the record was skipped.
    Failed,
}

/// Created / reused / failed totals for one entity kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertCounts {
    pub created: u32,
    pub reused: u32,
    pub failed: u32,
}

impl UpsertCounts {
    /// Tally one upsert outcome.
    pub fn record(&mut self, action: UpsertAction) {
        match action {
            UpsertAction::Created => self.created += 1,
            UpsertAction::Reused => self.reused += 1,
            UpsertAction::Failed => self.failed += 1,
        }
    }

    /// Total records attempted.
    pub fn total(&self) -> u32 {
        self.created + self.reused + self.failed
    }
}

/// Result of the generate workflow. Terminal state: the output CSV tree
/// exists on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateReport {
    /// The freshly minted key of the cloned patient.
    pub patient_id: PatientId,
    /// The display name the clone was given.
    pub name: String,
    /// Directory the output CSV tree was written to.
    pub out_dir: PathBuf,
    /// Lab results remapped and written.
    pub lab_results: usize,
    /// Measurements written with a resolved lab-result reference.
    pub measurements_written: usize,
    /// Measurements dropped because their source lab result had no remap
    /// entry. Never written with a dangling reference.
    pub measurements_dropped: usize,
    /// CMAS rows randomized and written.
    pub cmas_rows: usize,
}

/// Result of the import workflow. Terminal state: every record of the CSV
/// tree has a matching remote record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportReport {
    /// True if the patient record was created on this run, false if a
    /// remote patient with the same key already existed.
    pub patient_created: bool,
    pub groups: UpsertCounts,
    pub lab_results: UpsertCounts,
    pub measurements: UpsertCounts,
    pub cmas_scores: UpsertCounts,
}

impl ImportReport {
    /// Total records created on this run, the patient included.
    ///
    /// Zero on a re-run of an already imported tree.
    pub fn total_created(&self) -> u32 {
        let patient = u32::from(self.patient_created);
        patient
            + self.groups.created
            + self.lab_results.created
            + self.measurements.created
            + self.cmas_scores.created
    }
}

/// Result of the delete workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DeleteOutcome {
    /// The patient and its children were removed.
    Deleted(DeleteReport),
    /// No remote patient matched the display name. A terminal state, not
    /// an error.
    NotFound { name: String },
}

/// Per-kind delete totals for one cascade.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteReport {
    pub measurements: u32,
    pub lab_results: u32,
    pub cmas_scores: u32,
    /// Child deletes that failed and were skipped.
    pub failed: u32,
    /// True if the local CSV directory was removed as well.
    pub local_dir_removed: bool,
}

impl DeleteReport {
    /// Total remote delete calls that succeeded, the patient included.
    pub fn total_deleted(&self) -> u32 {
        self.measurements + self.lab_results + self.cmas_scores + 1
    }
}
