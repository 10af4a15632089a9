//! The two seams of the pipeline.
//!
//! - `RemoteStore`  — the remote CMS, reduced to the calls the workflows
//!   need. The production implementation lives in `fictus-api`; tests use
//!   in-memory scripted stores.
//! - `PipelineObserver` — progress reporting. The workflows never print;
//!   they emit events here and return structured reports.
//!
//! All remote calls are issued serially: the workflows complete one stage
//! before starting the next, because identifier resolution and cascade
//! ordering both depend on it.

use fictus_contracts::error::FictusResult;
use fictus_contracts::ids::{GroupId, LabResultId, MeasurementId, PatientId, RemoteId};
use fictus_contracts::record::{CmasScore, EntityKind, LabResult, LabResultGroup, Measurement, Patient};
use fictus_contracts::report::UpsertAction;

/// A patient record as stored remotely.
#[derive(Debug, Clone, PartialEq)]
pub struct RemotePatient {
    pub id: RemoteId,
    pub patient_id: PatientId,
    pub name: String,
}

/// The remote content store, keyed two ways: finds go by business key
/// (natural-key lookup for idempotent upserts), owning references and
/// deletes go by the store's numeric id.
pub trait RemoteStore {
    /// Cheap reachability probe. Run before any workflow touches the store;
    /// failure is fatal for the whole run.
    fn check_connectivity(&self) -> FictusResult<()>;

    // ── Patients ─────────────────────────────────────────────────────────

    fn find_patient(&self, key: &PatientId) -> FictusResult<Option<RemotePatient>>;
    fn find_patient_by_name(&self, name: &str) -> FictusResult<Option<RemotePatient>>;
    fn create_patient(&self, patient: &Patient) -> FictusResult<RemoteId>;
    fn delete_patient(&self, id: RemoteId) -> FictusResult<()>;

    // ── Lab result groups (shared reference data) ────────────────────────

    fn find_group(&self, key: &GroupId) -> FictusResult<Option<RemoteId>>;
    fn create_group(&self, group: &LabResultGroup) -> FictusResult<RemoteId>;

    // ── Lab results ──────────────────────────────────────────────────────

    fn find_lab_result(&self, key: &LabResultId) -> FictusResult<Option<RemoteId>>;
    fn create_lab_result(
        &self,
        lab_result: &LabResult,
        patient: RemoteId,
        group: RemoteId,
    ) -> FictusResult<RemoteId>;
    fn lab_results_for_patient(&self, patient: RemoteId) -> FictusResult<Vec<RemoteId>>;
    fn delete_lab_result(&self, id: RemoteId) -> FictusResult<()>;

    // ── Measurements ─────────────────────────────────────────────────────

    fn find_measurement(&self, key: &MeasurementId) -> FictusResult<Option<RemoteId>>;
    fn create_measurement(
        &self,
        measurement: &Measurement,
        lab_result: RemoteId,
    ) -> FictusResult<RemoteId>;
    fn measurements_for_lab_result(&self, lab_result: RemoteId) -> FictusResult<Vec<RemoteId>>;
    fn delete_measurement(&self, id: RemoteId) -> FictusResult<()>;

    // ── CMAS scores ──────────────────────────────────────────────────────

    /// CMAS rows carry no business id of their own; the natural key is the
    /// owning patient plus the score date.
    fn find_cmas(&self, patient: RemoteId, date: &str) -> FictusResult<Option<RemoteId>>;
    fn create_cmas(&self, score: &CmasScore, patient: RemoteId) -> FictusResult<RemoteId>;
    fn cmas_for_patient(&self, patient: RemoteId) -> FictusResult<Vec<RemoteId>>;
    fn delete_cmas(&self, id: RemoteId) -> FictusResult<()>;
}

/// Progress sink for the workflows.
///
/// Implementations must tolerate being called once per record; the default
/// [`TracingObserver`](crate::observer::TracingObserver) forwards to the
/// tracing subscriber.
pub trait PipelineObserver {
    /// A workflow entered a named stage.
    fn stage(&self, workflow: &str, stage: &str);

    /// One record was upserted (created, reused, or failed).
    fn upsert(&self, entity: EntityKind, key: &str, action: UpsertAction);

    /// One record was skipped before any remote call was made.
    fn skipped(&self, entity: EntityKind, key: &str, reason: &str);

    /// One remote record was deleted.
    fn deleted(&self, entity: EntityKind, id: RemoteId);
}
