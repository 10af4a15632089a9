//! Entity records flowing through the pipeline.
//!
//! These mirror the CSV file layouts one-to-one. Dates and measurement
//! values stay as strings: values may be censored ("<0.5") or categorical
//! ("negative"), and source dates have known irregular formatting, so
//! parsing is deferred to the components that actually need it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{GroupId, LabResultId, MeasurementId, PatientId};

/// A patient: the root of the cloned entity graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: PatientId,
    pub name: String,
}

/// A lab-result group. Shared reference data, looked up or created once and
/// never cloned per patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabResultGroup {
    pub group_id: GroupId,
    pub group_name: String,
}

/// A lab result, owned by exactly one patient and one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabResult {
    pub lab_result_id: LabResultId,
    pub group_id: GroupId,
    pub patient_id: PatientId,
    pub result_name: String,
    pub unit: String,
}

/// A measurement, owned by exactly one lab result.
///
/// `value` may be a plain number, a `<`/`>`-prefixed censored number, or a
/// categorical token such as "negative".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub measurement_id: MeasurementId,
    pub lab_result_id: LabResultId,
    pub date_time: String,
    pub value: String,
}

/// One CMAS score for a patient on a given date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmasScore {
    pub patient_id: PatientId,
    pub date: String,
    pub score: f64,
    pub category: CmasCategory,
}

/// The derived high/low band of a CMAS score.
///
/// Canonical rule: a score strictly above 10 is `High`; everything else is
/// `Low`. The category is always re-derived from the score — it is never
/// trusted from source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CmasCategory {
    High,
    Low,
}

impl CmasCategory {
    /// Derive the category from a numeric score.
    pub fn from_score(score: f64) -> Self {
        if score > 10.0 {
            Self::High
        } else {
            Self::Low
        }
    }

    /// The lowercase rendering used in CSV files and API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for CmasCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminant for the entity kinds the pipeline moves through the remote
/// store. Used in error context, observer events, and report counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Patient,
    LabResultGroup,
    LabResult,
    Measurement,
    CmasScore,
}

impl EntityKind {
    /// The kebab-case name, matching the remote collection paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::LabResultGroup => "lab-result-group",
            Self::LabResult => "lab-result",
            Self::Measurement => "measurement",
            Self::CmasScore => "cmas-score",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
