//! Request and response shapes of the CMS content API.
//!
//! The API wraps everything in a `data` envelope: lists are
//! `{"data": [{"id": n, "attributes": {...}}, ...]}`, creates take
//! `{"data": {...}}` and return a single wrapped document. Attribute
//! names are camelCase on the wire; relations are written as the numeric
//! id of the target document.

use serde::{Deserialize, Serialize};

// ── Envelopes ─────────────────────────────────────────────────────────────────

/// One stored document: numeric id plus its attributes.
#[derive(Debug, Deserialize)]
pub struct Document<T> {
    pub id: i64,
    #[serde(default = "Option::default")]
    pub attributes: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<Document<T>>,
}

#[derive(Debug, Deserialize)]
pub struct SingleResponse<T> {
    pub data: Document<T>,
}

/// Create-request envelope.
#[derive(Debug, Serialize)]
pub struct CreateRequest<T> {
    pub data: T,
}

/// Attribute set for finds that only need the document id.
#[derive(Debug, Deserialize)]
pub struct NoAttrs {}

// ── Attribute shapes ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientAttrs {
    pub patient_id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupAttrs {
    pub group_id: String,
    pub group_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabResultAttrs {
    pub lab_result_id: String,
    pub result_name: String,
    pub unit: String,
    /// Relation to the owning patient document.
    pub patient: i64,
    /// Relation to the lab-result-group document.
    pub lab_result_group: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementAttrs {
    pub measurement_id: String,
    pub date_time: String,
    pub value: String,
    /// Relation to the owning lab-result document.
    pub lab_result: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CmasAttrs {
    pub date: String,
    pub score: f64,
    pub category: String,
    /// Relation to the owning patient document.
    pub patient: i64,
}
