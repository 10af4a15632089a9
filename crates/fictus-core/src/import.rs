//! The import workflow: CSV tree → remote store, idempotently.
//!
//! Stage order matters: the patient must exist before lab results can
//! reference it, lab results before measurements, and so on. Every stage
//! uses find-or-create on the record's natural key, so re-running an import
//! creates zero duplicates.
//!
//! Failure policy (two tiers):
//! - the connectivity check and the patient upsert are preconditions for
//!   everything else — their failure aborts the run;
//! - every other record failure is logged, counted, and skipped.

use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

use fictus_contracts::error::{FictusError, FictusResult};
use fictus_contracts::ids::{GroupId, LabResultId, RemoteId};
use fictus_contracts::record::EntityKind;
use fictus_contracts::report::{ImportReport, UpsertAction};
use fictus_csv::RecordTree;

use crate::traits::{PipelineObserver, RemoteStore};

const WORKFLOW: &str = "import";

/// Import the CSV tree at `dir` into the remote store.
pub fn import(
    store: &dyn RemoteStore,
    observer: &dyn PipelineObserver,
    dir: &Path,
) -> FictusResult<ImportReport> {
    observer.stage(WORKFLOW, "read csv tree");
    let tree = RecordTree::read_dir(dir)?;
    let Some(patient) = tree.patients.first() else {
        return Err(FictusError::InputFile {
            path: dir.display().to_string(),
            reason: "no patient row to import".to_string(),
        });
    };

    observer.stage(WORKFLOW, "connectivity check");
    store.check_connectivity()?;

    let mut report = ImportReport::default();

    // ── Patient: precondition for everything below ───────────────────────
    observer.stage(WORKFLOW, "upsert patient");
    let patient_remote = match store.find_patient(&patient.patient_id) {
        Ok(Some(remote)) => {
            observer.upsert(EntityKind::Patient, patient.patient_id.as_str(), UpsertAction::Reused);
            remote.id
        }
        Ok(None) => {
            let id = store.create_patient(patient).map_err(|e| FictusError::PatientCreate {
                key: patient.patient_id.to_string(),
                reason: e.to_string(),
            })?;
            report.patient_created = true;
            observer.upsert(EntityKind::Patient, patient.patient_id.as_str(), UpsertAction::Created);
            id
        }
        Err(e) => {
            return Err(FictusError::PatientCreate {
                key: patient.patient_id.to_string(),
                reason: e.to_string(),
            })
        }
    };

    // ── Lab result groups ────────────────────────────────────────────────
    observer.stage(WORKFLOW, "upsert lab-result groups");
    let mut group_ids: HashMap<GroupId, RemoteId> = HashMap::new();
    for group in &tree.groups {
        let key = group.group_id.as_str();
        let (action, id) = upsert_record(
            EntityKind::LabResultGroup,
            key,
            || store.find_group(&group.group_id),
            || store.create_group(group),
        );
        if let Some(id) = id {
            group_ids.insert(group.group_id.clone(), id);
        }
        observer.upsert(EntityKind::LabResultGroup, key, action);
        report.groups.record(action);
    }

    // ── Lab results ──────────────────────────────────────────────────────
    observer.stage(WORKFLOW, "upsert lab results");
    let mut lab_result_ids: HashMap<LabResultId, RemoteId> = HashMap::new();
    for lr in &tree.lab_results {
        let key = lr.lab_result_id.as_str();
        if lr.patient_id != patient.patient_id {
            observer.skipped(EntityKind::LabResult, key, "references a foreign patient");
            report.lab_results.record(UpsertAction::Failed);
            continue;
        }
        let Some(&group_remote) = group_ids.get(&lr.group_id) else {
            observer.skipped(EntityKind::LabResult, key, "unresolved lab-result group");
            report.lab_results.record(UpsertAction::Failed);
            continue;
        };

        let (action, id) = upsert_record(
            EntityKind::LabResult,
            key,
            || store.find_lab_result(&lr.lab_result_id),
            || store.create_lab_result(lr, patient_remote, group_remote),
        );
        if let Some(id) = id {
            lab_result_ids.insert(lr.lab_result_id.clone(), id);
        }
        observer.upsert(EntityKind::LabResult, key, action);
        report.lab_results.record(action);
    }

    // ── Measurements ─────────────────────────────────────────────────────
    observer.stage(WORKFLOW, "upsert measurements");
    for m in &tree.measurements {
        let key = m.measurement_id.as_str();
        let Some(&lr_remote) = lab_result_ids.get(&m.lab_result_id) else {
            observer.skipped(EntityKind::Measurement, key, "unresolved lab result");
            report.measurements.record(UpsertAction::Failed);
            continue;
        };

        let (action, _) = upsert_record(
            EntityKind::Measurement,
            key,
            || store.find_measurement(&m.measurement_id),
            || store.create_measurement(m, lr_remote),
        );
        observer.upsert(EntityKind::Measurement, key, action);
        report.measurements.record(action);
    }

    // ── CMAS scores ──────────────────────────────────────────────────────
    observer.stage(WORKFLOW, "upsert CMAS scores");
    for score in &tree.cmas_scores {
        let (action, _) = upsert_record(
            EntityKind::CmasScore,
            &score.date,
            || store.find_cmas(patient_remote, &score.date),
            || store.create_cmas(score, patient_remote),
        );
        observer.upsert(EntityKind::CmasScore, &score.date, action);
        report.cmas_scores.record(action);
    }

    observer.stage(WORKFLOW, "imported");
    Ok(report)
}

/// Find-or-create one record; failures are logged and reported as
/// `Failed`, never propagated.
fn upsert_record(
    entity: EntityKind,
    key: &str,
    find: impl FnOnce() -> FictusResult<Option<RemoteId>>,
    create: impl FnOnce() -> FictusResult<RemoteId>,
) -> (UpsertAction, Option<RemoteId>) {
    match find() {
        Ok(Some(id)) => (UpsertAction::Reused, Some(id)),
        Ok(None) => match create() {
            Ok(id) => (UpsertAction::Created, Some(id)),
            Err(e) => {
                warn!(entity = %entity, key, error = %e, "create failed, continuing");
                (UpsertAction::Failed, None)
            }
        },
        Err(e) => {
            warn!(entity = %entity, key, error = %e, "lookup failed, continuing");
            (UpsertAction::Failed, None)
        }
    }
}
