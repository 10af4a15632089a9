//! Typed identifiers for the mock-patient entity graph.
//!
//! Business keys (`PatientId`, `GroupId`, `LabResultId`, `MeasurementId`)
//! are the opaque strings carried in the CSV files and used for
//! find-or-create lookups. `RemoteId` is the numeric id the CMS assigns on
//! creation — owning references in API payloads always use `RemoteId`,
//! never a business key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable external key for a patient.
///
/// Minted once per generation run; never reused across cloned patients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(pub String);

/// Key for a lab-result group.
///
/// Groups are shared reference data: cloned patients reuse the template's
/// group keys, so this type has no `mint()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

/// Key for a single lab result, owned by one patient and one group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabResultId(pub String);

/// Key for a single measurement, owned by one lab result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasurementId(pub String);

macro_rules! business_key {
    ($name:ident) => {
        impl $name {
            /// Wrap an existing key read from a CSV file or API response.
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// The raw key string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

macro_rules! mintable_key {
    ($name:ident) => {
        impl $name {
            /// Mint a fresh, globally unique key for a generation run.
            pub fn mint() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }
        }
    };
}

business_key!(PatientId);
business_key!(GroupId);
business_key!(LabResultId);
business_key!(MeasurementId);

mintable_key!(PatientId);
mintable_key!(LabResultId);
mintable_key!(MeasurementId);

/// The numeric id the remote CMS assigns to a stored entity.
///
/// Distinct from the business keys above: lookups go by business key, but
/// owning references (and deletes) go by `RemoteId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteId(pub i64);

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
