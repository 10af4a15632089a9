//! The delete workflow: remove a mock patient and everything it owns.
//!
//! Cascade order is child-first: CMAS scores, then each lab result's
//! measurements, then the lab results, then the patient itself. Deleting a
//! parent before its children would strand them; deleting the patient last
//! means a partially failed run can simply be re-run.

use std::path::Path;

use tracing::warn;

use fictus_contracts::error::FictusResult;
use fictus_contracts::ids::RemoteId;
use fictus_contracts::record::EntityKind;
use fictus_contracts::report::{DeleteOutcome, DeleteReport};

use crate::traits::{PipelineObserver, RemoteStore};

const WORKFLOW: &str = "delete";

/// Delete the remote patient named `name` and all owned records.
///
/// Returns [`DeleteOutcome::NotFound`] when no such patient exists (not an
/// error: the desired end state already holds). When `local_dir` is given,
/// the on-disk CSV tree is removed after the remote cascade; a failure
/// there is logged but never fails the run.
pub fn delete(
    store: &dyn RemoteStore,
    observer: &dyn PipelineObserver,
    name: &str,
    local_dir: Option<&Path>,
) -> FictusResult<DeleteOutcome> {
    observer.stage(WORKFLOW, "connectivity check");
    store.check_connectivity()?;

    observer.stage(WORKFLOW, "find patient");
    let Some(patient) = store.find_patient_by_name(name)? else {
        return Ok(DeleteOutcome::NotFound {
            name: name.to_string(),
        });
    };

    let mut report = DeleteReport::default();

    // ── CMAS scores ──────────────────────────────────────────────────────
    observer.stage(WORKFLOW, "delete CMAS scores");
    for id in store.cmas_for_patient(patient.id)? {
        delete_one(store, observer, EntityKind::CmasScore, id, &mut report.cmas_scores, &mut report.failed);
    }

    // ── Measurements, then their lab results ─────────────────────────────
    observer.stage(WORKFLOW, "delete lab results");
    let lab_results = store.lab_results_for_patient(patient.id)?;
    for &lr in &lab_results {
        for id in store.measurements_for_lab_result(lr)? {
            delete_one(store, observer, EntityKind::Measurement, id, &mut report.measurements, &mut report.failed);
        }
    }
    for &lr in &lab_results {
        delete_one(store, observer, EntityKind::LabResult, lr, &mut report.lab_results, &mut report.failed);
    }

    // ── The patient record itself ────────────────────────────────────────
    observer.stage(WORKFLOW, "delete patient");
    store.delete_patient(patient.id)?;
    observer.deleted(EntityKind::Patient, patient.id);

    if let Some(dir) = local_dir {
        observer.stage(WORKFLOW, "remove local tree");
        match std::fs::remove_dir_all(dir) {
            Ok(()) => report.local_dir_removed = true,
            Err(e) => warn!(dir = %dir.display(), error = %e, "could not remove local tree"),
        }
    }

    Ok(DeleteOutcome::Deleted(report))
}

fn delete_one(
    store: &dyn RemoteStore,
    observer: &dyn PipelineObserver,
    entity: EntityKind,
    id: RemoteId,
    deleted: &mut u32,
    failed: &mut u32,
) {
    let result = match entity {
        EntityKind::CmasScore => store.delete_cmas(id),
        EntityKind::Measurement => store.delete_measurement(id),
        EntityKind::LabResult => store.delete_lab_result(id),
        _ => unreachable!("cascade only covers owned entities"),
    };
    match result {
        Ok(()) => {
            observer.deleted(entity, id);
            *deleted += 1;
        }
        Err(e) => {
            warn!(entity = %entity, remote_id = %id, error = %e, "delete failed");
            *failed += 1;
        }
    }
}
