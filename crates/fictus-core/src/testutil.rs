//! Shared test doubles for the workflow tests: a deterministic random
//! source, a recording observer, and an in-memory scripted store.

use std::collections::HashSet;
use std::sync::Mutex;

use fictus_contracts::error::{FictusError, FictusResult};
use fictus_contracts::ids::{GroupId, LabResultId, MeasurementId, PatientId, RemoteId};
use fictus_contracts::record::{
    CmasScore, EntityKind, LabResult, LabResultGroup, Measurement, Patient,
};
use fictus_contracts::report::UpsertAction;
use fictus_rand::RandomSource;

use crate::traits::{PipelineObserver, RemotePatient, RemoteStore};

// ── Fixture tree ──────────────────────────────────────────────────────────────

/// Write the standard fixture tree into `dir`: one patient ("tpl-p"), one
/// group, one lab result, two resolvable measurements plus one orphan
/// ("m-orphan", referencing a lab result absent from LabResult.csv), and
/// one CMAS row with score 42.
pub fn write_sample_tree(dir: &std::path::Path) {
    use fictus_contracts::record::CmasCategory;
    use fictus_csv::tree::{
        write_cmas, write_groups, write_lab_results, write_measurements, write_patients,
    };

    write_patients(
        &dir.join("Patient.csv"),
        &[Patient {
            patient_id: PatientId::new("tpl-p"),
            name: "Template Patient".to_string(),
        }],
    )
    .unwrap();
    write_groups(
        &dir.join("LabResultGroup.csv"),
        &[LabResultGroup {
            group_id: GroupId::new("g-1"),
            group_name: "Hematology".to_string(),
        }],
    )
    .unwrap();
    write_lab_results(
        &dir.join("LabResult.csv"),
        &[LabResult {
            lab_result_id: LabResultId::new("lr-1"),
            group_id: GroupId::new("g-1"),
            patient_id: PatientId::new("tpl-p"),
            result_name: "Hemoglobin".to_string(),
            unit: "mmol/L".to_string(),
        }],
    )
    .unwrap();
    write_measurements(
        &dir.join("Measurement.csv"),
        &[
            Measurement {
                measurement_id: MeasurementId::new("m-1"),
                lab_result_id: LabResultId::new("lr-1"),
                date_time: "15-06-2023".to_string(),
                value: "8.6".to_string(),
            },
            Measurement {
                measurement_id: MeasurementId::new("m-2"),
                lab_result_id: LabResultId::new("lr-1"),
                date_time: "20-06-2023".to_string(),
                value: "negative".to_string(),
            },
            Measurement {
                measurement_id: MeasurementId::new("m-orphan"),
                lab_result_id: LabResultId::new("lr-missing"),
                date_time: "21-06-2023".to_string(),
                value: "1.0".to_string(),
            },
        ],
    )
    .unwrap();
    write_cmas(
        &dir.join("CMAS.csv"),
        &[CmasScore {
            patient_id: PatientId::new("tpl-p"),
            date: "15-06-2023".to_string(),
            score: 42.0,
            category: CmasCategory::High,
        }],
    )
    .unwrap();
}

// ── Random source ─────────────────────────────────────────────────────────────

/// Returns a fixed fraction of the way through every requested range.
/// `FractionSource(0.5)` is "no variation"; 0.0 and 1.0 are the extremes.
pub struct FractionSource(pub f64);

impl RandomSource for FractionSource {
    fn uniform_f64(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.0
    }
    fn uniform_i64(&mut self, lo: i64, hi: i64) -> i64 {
        lo + ((hi - lo) as f64 * self.0).round() as i64
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Records every event for later inspection.
#[derive(Default)]
pub struct RecordingObserver {
    stages: Mutex<Vec<String>>,
    upserts: Mutex<Vec<String>>,
    skips: Mutex<Vec<String>>,
    deletes: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn stages(&self) -> Vec<String> {
        self.stages.lock().unwrap().clone()
    }
    pub fn upserts(&self) -> Vec<String> {
        self.upserts.lock().unwrap().clone()
    }
    pub fn skips(&self) -> Vec<String> {
        self.skips.lock().unwrap().clone()
    }
    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }
}

impl PipelineObserver for RecordingObserver {
    fn stage(&self, workflow: &str, stage: &str) {
        self.stages
            .lock()
            .unwrap()
            .push(format!("{}:{}", workflow, stage));
    }
    fn upsert(&self, entity: EntityKind, key: &str, action: UpsertAction) {
        self.upserts
            .lock()
            .unwrap()
            .push(format!("{} {} {:?}", entity, key, action));
    }
    fn skipped(&self, entity: EntityKind, key: &str, reason: &str) {
        self.skips
            .lock()
            .unwrap()
            .push(format!("{} {} ({})", entity, key, reason));
    }
    fn deleted(&self, entity: EntityKind, id: RemoteId) {
        self.deletes
            .lock()
            .unwrap()
            .push(format!("{} {}", entity, id));
    }
}

// ── Store ─────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct StoreState {
    next_id: i64,
    pub patients: Vec<(RemoteId, Patient)>,
    pub groups: Vec<(RemoteId, LabResultGroup)>,
    /// (id, record, owning patient, owning group)
    pub lab_results: Vec<(RemoteId, LabResult, RemoteId, RemoteId)>,
    /// (id, record, owning lab result)
    pub measurements: Vec<(RemoteId, Measurement, RemoteId)>,
    /// (id, record, owning patient)
    pub cmas: Vec<(RemoteId, CmasScore, RemoteId)>,
    /// Every mutating call, in order, e.g. "delete measurement 7".
    pub calls: Vec<String>,
}

impl StoreState {
    fn mint(&mut self) -> RemoteId {
        self.next_id += 1;
        RemoteId(self.next_id)
    }
}

/// An in-memory `RemoteStore` with failure injection.
#[derive(Default)]
pub struct ScriptedStore {
    pub state: Mutex<StoreState>,
    /// Entity kinds whose create calls fail.
    pub fail_create: HashSet<EntityKind>,
    /// Remote ids whose delete calls fail.
    pub fail_delete: HashSet<i64>,
    /// When true, `check_connectivity` fails.
    pub unreachable: bool,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn api_err(entity: EntityKind, key: &str) -> FictusError {
        FictusError::Api {
            entity,
            key: key.to_string(),
            reason: "injected failure".to_string(),
        }
    }
}

impl RemoteStore for ScriptedStore {
    fn check_connectivity(&self) -> FictusResult<()> {
        if self.unreachable {
            return Err(FictusError::Connectivity {
                base_url: "scripted://".to_string(),
                reason: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    fn find_patient(&self, key: &PatientId) -> FictusResult<Option<RemotePatient>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .patients
            .iter()
            .find(|(_, p)| &p.patient_id == key)
            .map(|(id, p)| RemotePatient {
                id: *id,
                patient_id: p.patient_id.clone(),
                name: p.name.clone(),
            }))
    }

    fn find_patient_by_name(&self, name: &str) -> FictusResult<Option<RemotePatient>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .patients
            .iter()
            .find(|(_, p)| p.name == name)
            .map(|(id, p)| RemotePatient {
                id: *id,
                patient_id: p.patient_id.clone(),
                name: p.name.clone(),
            }))
    }

    fn create_patient(&self, patient: &Patient) -> FictusResult<RemoteId> {
        if self.fail_create.contains(&EntityKind::Patient) {
            return Err(Self::api_err(EntityKind::Patient, patient.patient_id.as_str()));
        }
        let mut state = self.state.lock().unwrap();
        let id = state.mint();
        state.calls.push(format!("create patient {}", id));
        state.patients.push((id, patient.clone()));
        Ok(id)
    }

    fn delete_patient(&self, id: RemoteId) -> FictusResult<()> {
        if self.fail_delete.contains(&id.0) {
            return Err(Self::api_err(EntityKind::Patient, &id.to_string()));
        }
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("delete patient {}", id));
        state.patients.retain(|(pid, _)| *pid != id);
        Ok(())
    }

    fn find_group(&self, key: &GroupId) -> FictusResult<Option<RemoteId>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .groups
            .iter()
            .find(|(_, g)| &g.group_id == key)
            .map(|(id, _)| *id))
    }

    fn create_group(&self, group: &LabResultGroup) -> FictusResult<RemoteId> {
        if self.fail_create.contains(&EntityKind::LabResultGroup) {
            return Err(Self::api_err(EntityKind::LabResultGroup, group.group_id.as_str()));
        }
        let mut state = self.state.lock().unwrap();
        let id = state.mint();
        state.calls.push(format!("create group {}", id));
        state.groups.push((id, group.clone()));
        Ok(id)
    }

    fn find_lab_result(&self, key: &LabResultId) -> FictusResult<Option<RemoteId>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .lab_results
            .iter()
            .find(|(_, lr, _, _)| &lr.lab_result_id == key)
            .map(|(id, _, _, _)| *id))
    }

    fn create_lab_result(
        &self,
        lab_result: &LabResult,
        patient: RemoteId,
        group: RemoteId,
    ) -> FictusResult<RemoteId> {
        if self.fail_create.contains(&EntityKind::LabResult) {
            return Err(Self::api_err(
                EntityKind::LabResult,
                lab_result.lab_result_id.as_str(),
            ));
        }
        let mut state = self.state.lock().unwrap();
        let id = state.mint();
        state.calls.push(format!("create lab-result {}", id));
        state.lab_results.push((id, lab_result.clone(), patient, group));
        Ok(id)
    }

    fn lab_results_for_patient(&self, patient: RemoteId) -> FictusResult<Vec<RemoteId>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .lab_results
            .iter()
            .filter(|(_, _, owner, _)| *owner == patient)
            .map(|(id, _, _, _)| *id)
            .collect())
    }

    fn delete_lab_result(&self, id: RemoteId) -> FictusResult<()> {
        if self.fail_delete.contains(&id.0) {
            return Err(Self::api_err(EntityKind::LabResult, &id.to_string()));
        }
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("delete lab-result {}", id));
        state.lab_results.retain(|(lid, _, _, _)| *lid != id);
        Ok(())
    }

    fn find_measurement(&self, key: &MeasurementId) -> FictusResult<Option<RemoteId>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .measurements
            .iter()
            .find(|(_, m, _)| &m.measurement_id == key)
            .map(|(id, _, _)| *id))
    }

    fn create_measurement(
        &self,
        measurement: &Measurement,
        lab_result: RemoteId,
    ) -> FictusResult<RemoteId> {
        if self.fail_create.contains(&EntityKind::Measurement) {
            return Err(Self::api_err(
                EntityKind::Measurement,
                measurement.measurement_id.as_str(),
            ));
        }
        let mut state = self.state.lock().unwrap();
        let id = state.mint();
        state.calls.push(format!("create measurement {}", id));
        state.measurements.push((id, measurement.clone(), lab_result));
        Ok(id)
    }

    fn measurements_for_lab_result(&self, lab_result: RemoteId) -> FictusResult<Vec<RemoteId>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .measurements
            .iter()
            .filter(|(_, _, owner)| *owner == lab_result)
            .map(|(id, _, _)| *id)
            .collect())
    }

    fn delete_measurement(&self, id: RemoteId) -> FictusResult<()> {
        if self.fail_delete.contains(&id.0) {
            return Err(Self::api_err(EntityKind::Measurement, &id.to_string()));
        }
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("delete measurement {}", id));
        state.measurements.retain(|(mid, _, _)| *mid != id);
        Ok(())
    }

    fn find_cmas(&self, patient: RemoteId, date: &str) -> FictusResult<Option<RemoteId>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .cmas
            .iter()
            .find(|(_, s, owner)| *owner == patient && s.date == date)
            .map(|(id, _, _)| *id))
    }

    fn create_cmas(&self, score: &CmasScore, patient: RemoteId) -> FictusResult<RemoteId> {
        if self.fail_create.contains(&EntityKind::CmasScore) {
            return Err(Self::api_err(EntityKind::CmasScore, &score.date));
        }
        let mut state = self.state.lock().unwrap();
        let id = state.mint();
        state.calls.push(format!("create cmas {}", id));
        state.cmas.push((id, score.clone(), patient));
        Ok(id)
    }

    fn cmas_for_patient(&self, patient: RemoteId) -> FictusResult<Vec<RemoteId>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .cmas
            .iter()
            .filter(|(_, _, owner)| *owner == patient)
            .map(|(id, _, _)| *id)
            .collect())
    }

    fn delete_cmas(&self, id: RemoteId) -> FictusResult<()> {
        if self.fail_delete.contains(&id.0) {
            return Err(Self::api_err(EntityKind::CmasScore, &id.to_string()));
        }
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("delete cmas {}", id));
        state.cmas.retain(|(cid, _, _)| *cid != id);
        Ok(())
    }
}
