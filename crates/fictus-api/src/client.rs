//! Blocking HTTP client for the CMS content API.
//!
//! One request per call, issued serially; the pipeline depends on each
//! stage completing before the next starts, so there is no request
//! fan-out. Every call carries the bearer credential and the configured
//! timeout.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use fictus_contracts::config::ApiConfig;
use fictus_contracts::error::{FictusError, FictusResult};
use fictus_contracts::ids::{GroupId, LabResultId, MeasurementId, PatientId, RemoteId};
use fictus_contracts::record::{
    CmasScore, EntityKind, LabResult, LabResultGroup, Measurement, Patient,
};
use fictus_core::{RemotePatient, RemoteStore};

use crate::wire::{
    CmasAttrs, CreateRequest, Document, GroupAttrs, LabResultAttrs, ListResponse,
    MeasurementAttrs, NoAttrs, PatientAttrs, SingleResponse,
};

const PATIENTS: &str = "patients";
const GROUPS: &str = "lab-result-groups";
const LAB_RESULTS: &str = "lab-results";
const MEASUREMENTS: &str = "measurements";
const CMAS_SCORES: &str = "cmas-scores";

/// Page size for child-record listings during a cascade delete. A mock
/// patient has a few hundred measurements at most.
const LIST_PAGE_SIZE: &str = "500";

/// Client for the remote CMS, carrying its own connection settings.
pub struct ApiClient {
    base_url: String,
    credential: String,
    timeout_ms: u64,
    client: reqwest::blocking::Client,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("credential", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client from a validated config. Fails fast on an empty
    /// base URL or credential rather than at the first request.
    pub fn new(config: ApiConfig) -> FictusResult<Self> {
        config.validate()?;
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| FictusError::Config {
                reason: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credential: config.credential,
            timeout_ms: config.timeout_ms,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Transport plumbing ───────────────────────────────────────────────

    fn transport_reason(&self, e: reqwest::Error) -> String {
        if e.is_connect() {
            format!("could not connect to {}", self.base_url)
        } else if e.is_timeout() {
            format!("request timed out after {}ms", self.timeout_ms)
        } else {
            e.to_string()
        }
    }

    fn list<T: DeserializeOwned>(
        &self,
        collection: &str,
        query: &[(String, String)],
    ) -> Result<Vec<Document<T>>, String> {
        let url = format!("{}/{}", self.base_url, collection);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.credential)
            .query(query)
            .send()
            .map_err(|e| self.transport_reason(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!(
                "GET {} returned {}: {}",
                collection,
                status.as_u16(),
                response.text().unwrap_or_default()
            ));
        }
        let body: ListResponse<T> = response
            .json()
            .map_err(|e| format!("invalid response body: {}", e))?;
        Ok(body.data)
    }

    /// Look up the id of the single document matching `query`, if any.
    fn find_id(
        &self,
        collection: &str,
        mut query: Vec<(String, String)>,
    ) -> Result<Option<RemoteId>, String> {
        query.push(("pagination[pageSize]".to_string(), "1".to_string()));
        let rows = self.list::<NoAttrs>(collection, &query)?;
        Ok(rows.first().map(|doc| RemoteId(doc.id)))
    }

    /// List all document ids matching `query`.
    fn list_ids(
        &self,
        collection: &str,
        mut query: Vec<(String, String)>,
    ) -> Result<Vec<RemoteId>, String> {
        query.push((
            "pagination[pageSize]".to_string(),
            LIST_PAGE_SIZE.to_string(),
        ));
        let rows = self.list::<NoAttrs>(collection, &query)?;
        Ok(rows.iter().map(|doc| RemoteId(doc.id)).collect())
    }

    fn create<B: Serialize>(&self, collection: &str, attrs: B) -> Result<RemoteId, String> {
        let url = format!("{}/{}", self.base_url, collection);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.credential)
            .json(&CreateRequest { data: attrs })
            .send()
            .map_err(|e| self.transport_reason(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!(
                "POST {} returned {}: {}",
                collection,
                status.as_u16(),
                response.text().unwrap_or_default()
            ));
        }
        let body: SingleResponse<NoAttrs> = response
            .json()
            .map_err(|e| format!("invalid response body: {}", e))?;
        debug!(collection, id = body.data.id, "created");
        Ok(RemoteId(body.data.id))
    }

    fn remove(&self, collection: &str, id: RemoteId) -> Result<(), String> {
        let url = format!("{}/{}/{}", self.base_url, collection, id.0);
        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.credential)
            .send()
            .map_err(|e| self.transport_reason(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!(
                "DELETE {}/{} returned {}: {}",
                collection,
                id.0,
                status.as_u16(),
                response.text().unwrap_or_default()
            ));
        }
        Ok(())
    }
}

fn eq_filter(field: &str, value: &str) -> (String, String) {
    (format!("filters[{}][$eq]", field), value.to_string())
}

fn relation_filter(relation: &str, id: RemoteId) -> (String, String) {
    (format!("filters[{}][id][$eq]", relation), id.0.to_string())
}

fn api_err(entity: EntityKind, key: &str) -> impl FnOnce(String) -> FictusError + '_ {
    move |reason| FictusError::Api {
        entity,
        key: key.to_string(),
        reason,
    }
}

impl RemoteStore for ApiClient {
    fn check_connectivity(&self) -> FictusResult<()> {
        let query = vec![("pagination[pageSize]".to_string(), "1".to_string())];
        self.list::<NoAttrs>(PATIENTS, &query)
            .map(|_| ())
            .map_err(|reason| FictusError::Connectivity {
                base_url: self.base_url.clone(),
                reason,
            })
    }

    // ── Patients ─────────────────────────────────────────────────────────

    fn find_patient(&self, key: &PatientId) -> FictusResult<Option<RemotePatient>> {
        let query = vec![
            eq_filter("patientId", key.as_str()),
            ("pagination[pageSize]".to_string(), "1".to_string()),
        ];
        let rows = self
            .list::<PatientAttrs>(PATIENTS, &query)
            .map_err(api_err(EntityKind::Patient, key.as_str()))?;
        Ok(rows.into_iter().next().and_then(remote_patient))
    }

    fn find_patient_by_name(&self, name: &str) -> FictusResult<Option<RemotePatient>> {
        let query = vec![
            eq_filter("name", name),
            ("pagination[pageSize]".to_string(), "1".to_string()),
        ];
        let rows = self
            .list::<PatientAttrs>(PATIENTS, &query)
            .map_err(api_err(EntityKind::Patient, name))?;
        Ok(rows.into_iter().next().and_then(remote_patient))
    }

    fn create_patient(&self, patient: &Patient) -> FictusResult<RemoteId> {
        let attrs = PatientAttrs {
            patient_id: patient.patient_id.to_string(),
            name: patient.name.clone(),
        };
        self.create(PATIENTS, attrs)
            .map_err(api_err(EntityKind::Patient, patient.patient_id.as_str()))
    }

    fn delete_patient(&self, id: RemoteId) -> FictusResult<()> {
        self.remove(PATIENTS, id)
            .map_err(api_err(EntityKind::Patient, &id.to_string()))
    }

    // ── Lab result groups ────────────────────────────────────────────────

    fn find_group(&self, key: &GroupId) -> FictusResult<Option<RemoteId>> {
        self.find_id(GROUPS, vec![eq_filter("groupId", key.as_str())])
            .map_err(api_err(EntityKind::LabResultGroup, key.as_str()))
    }

    fn create_group(&self, group: &LabResultGroup) -> FictusResult<RemoteId> {
        let attrs = GroupAttrs {
            group_id: group.group_id.to_string(),
            group_name: group.group_name.clone(),
        };
        self.create(GROUPS, attrs)
            .map_err(api_err(EntityKind::LabResultGroup, group.group_id.as_str()))
    }

    // ── Lab results ──────────────────────────────────────────────────────

    fn find_lab_result(&self, key: &LabResultId) -> FictusResult<Option<RemoteId>> {
        self.find_id(LAB_RESULTS, vec![eq_filter("labResultId", key.as_str())])
            .map_err(api_err(EntityKind::LabResult, key.as_str()))
    }

    fn create_lab_result(
        &self,
        lab_result: &LabResult,
        patient: RemoteId,
        group: RemoteId,
    ) -> FictusResult<RemoteId> {
        let attrs = LabResultAttrs {
            lab_result_id: lab_result.lab_result_id.to_string(),
            result_name: lab_result.result_name.clone(),
            unit: lab_result.unit.clone(),
            patient: patient.0,
            lab_result_group: group.0,
        };
        self.create(LAB_RESULTS, attrs)
            .map_err(api_err(EntityKind::LabResult, lab_result.lab_result_id.as_str()))
    }

    fn lab_results_for_patient(&self, patient: RemoteId) -> FictusResult<Vec<RemoteId>> {
        self.list_ids(LAB_RESULTS, vec![relation_filter("patient", patient)])
            .map_err(api_err(EntityKind::LabResult, &patient.to_string()))
    }

    fn delete_lab_result(&self, id: RemoteId) -> FictusResult<()> {
        self.remove(LAB_RESULTS, id)
            .map_err(api_err(EntityKind::LabResult, &id.to_string()))
    }

    // ── Measurements ─────────────────────────────────────────────────────

    fn find_measurement(&self, key: &MeasurementId) -> FictusResult<Option<RemoteId>> {
        self.find_id(MEASUREMENTS, vec![eq_filter("measurementId", key.as_str())])
            .map_err(api_err(EntityKind::Measurement, key.as_str()))
    }

    fn create_measurement(
        &self,
        measurement: &Measurement,
        lab_result: RemoteId,
    ) -> FictusResult<RemoteId> {
        let attrs = MeasurementAttrs {
            measurement_id: measurement.measurement_id.to_string(),
            date_time: measurement.date_time.clone(),
            value: measurement.value.clone(),
            lab_result: lab_result.0,
        };
        self.create(MEASUREMENTS, attrs).map_err(api_err(
            EntityKind::Measurement,
            measurement.measurement_id.as_str(),
        ))
    }

    fn measurements_for_lab_result(&self, lab_result: RemoteId) -> FictusResult<Vec<RemoteId>> {
        self.list_ids(MEASUREMENTS, vec![relation_filter("labResult", lab_result)])
            .map_err(api_err(EntityKind::Measurement, &lab_result.to_string()))
    }

    fn delete_measurement(&self, id: RemoteId) -> FictusResult<()> {
        self.remove(MEASUREMENTS, id)
            .map_err(api_err(EntityKind::Measurement, &id.to_string()))
    }

    // ── CMAS scores ──────────────────────────────────────────────────────

    fn find_cmas(&self, patient: RemoteId, date: &str) -> FictusResult<Option<RemoteId>> {
        self.find_id(
            CMAS_SCORES,
            vec![relation_filter("patient", patient), eq_filter("date", date)],
        )
        .map_err(api_err(EntityKind::CmasScore, date))
    }

    fn create_cmas(&self, score: &CmasScore, patient: RemoteId) -> FictusResult<RemoteId> {
        let attrs = CmasAttrs {
            date: score.date.clone(),
            score: score.score,
            category: score.category.as_str().to_string(),
            patient: patient.0,
        };
        self.create(CMAS_SCORES, attrs)
            .map_err(api_err(EntityKind::CmasScore, &score.date))
    }

    fn cmas_for_patient(&self, patient: RemoteId) -> FictusResult<Vec<RemoteId>> {
        self.list_ids(CMAS_SCORES, vec![relation_filter("patient", patient)])
            .map_err(api_err(EntityKind::CmasScore, &patient.to_string()))
    }

    fn delete_cmas(&self, id: RemoteId) -> FictusResult<()> {
        self.remove(CMAS_SCORES, id)
            .map_err(api_err(EntityKind::CmasScore, &id.to_string()))
    }
}

fn remote_patient(doc: Document<PatientAttrs>) -> Option<RemotePatient> {
    doc.attributes.map(|attrs| RemotePatient {
        id: RemoteId(doc.id),
        patient_id: PatientId::new(attrs.patient_id),
        name: attrs.name,
    })
}
