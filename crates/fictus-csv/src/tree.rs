//! Reading and writing the per-entity CSV tree.
//!
//! One file per entity kind, fixed header sets:
//!
//! | file                 | headers                                              |
//! |----------------------|------------------------------------------------------|
//! | `Patient.csv`        | `PatientID,Name`                                     |
//! | `LabResultGroup.csv` | `LabResultGroupID,GroupName`                         |
//! | `LabResult.csv`      | `LabResultID,LabResultGroupID,PatientID,ResultName,Unit` |
//! | `Measurement.csv`    | `MeasurementID,LabResultID,DateTime,Value`           |
//! | `CMAS.csv`           | `PatientID,Date,Score,Category` (or the wide `;` layout) |
//!
//! Rows missing a required field follow the reader's silent-discard policy;
//! a skipped row is traced, never fatal.

use std::path::Path;

use tracing::debug;

use fictus_contracts::error::{FictusError, FictusResult};
use fictus_contracts::ids::{GroupId, LabResultId, MeasurementId, PatientId};
use fictus_contracts::record::{CmasScore, LabResult, LabResultGroup, Measurement, Patient};

use crate::cmas::read_cmas;
use crate::reader::RowReader;

pub const PATIENT_FILE: &str = "Patient.csv";
pub const GROUP_FILE: &str = "LabResultGroup.csv";
pub const LAB_RESULT_FILE: &str = "LabResult.csv";
pub const MEASUREMENT_FILE: &str = "Measurement.csv";
pub const CMAS_FILE: &str = "CMAS.csv";

/// The full record set of one patient directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTree {
    pub patients: Vec<Patient>,
    pub groups: Vec<LabResultGroup>,
    pub lab_results: Vec<LabResult>,
    pub measurements: Vec<Measurement>,
    pub cmas_scores: Vec<CmasScore>,
}

impl RecordTree {
    /// Read all five entity files from `dir`.
    pub fn read_dir(dir: &Path) -> FictusResult<Self> {
        let patients = read_patients(&dir.join(PATIENT_FILE))?;
        let groups = read_groups(&dir.join(GROUP_FILE))?;
        let lab_results = read_lab_results(&dir.join(LAB_RESULT_FILE))?;
        let measurements = read_measurements(&dir.join(MEASUREMENT_FILE))?;

        let owner = patients.first().map(|p| p.patient_id.clone());
        let cmas_scores = read_cmas(&dir.join(CMAS_FILE), owner.as_ref())?;

        debug!(
            dir = %dir.display(),
            patients = patients.len(),
            groups = groups.len(),
            lab_results = lab_results.len(),
            measurements = measurements.len(),
            cmas_scores = cmas_scores.len(),
            "read record tree"
        );

        Ok(Self {
            patients,
            groups,
            lab_results,
            measurements,
            cmas_scores,
        })
    }

    /// Write all five entity files into `dir`, creating it if needed.
    ///
    /// Records are written once — there is no partial-update path.
    pub fn write_dir(&self, dir: &Path) -> FictusResult<()> {
        std::fs::create_dir_all(dir).map_err(|e| FictusError::InputFile {
            path: dir.display().to_string(),
            reason: format!("cannot create output directory: {}", e),
        })?;

        write_patients(&dir.join(PATIENT_FILE), &self.patients)?;
        write_groups(&dir.join(GROUP_FILE), &self.groups)?;
        write_lab_results(&dir.join(LAB_RESULT_FILE), &self.lab_results)?;
        write_measurements(&dir.join(MEASUREMENT_FILE), &self.measurements)?;
        write_cmas(&dir.join(CMAS_FILE), &self.cmas_scores)?;
        Ok(())
    }
}

// ── Per-entity readers ────────────────────────────────────────────────────────

pub fn read_patients(path: &Path) -> FictusResult<Vec<Patient>> {
    let mut out = Vec::new();
    for row in RowReader::open(path)? {
        let (Some(id), Some(name)) = (row.get("PatientID"), row.get("Name")) else {
            continue;
        };
        out.push(Patient {
            patient_id: PatientId::new(id),
            name: name.to_string(),
        });
    }
    Ok(out)
}

pub fn read_groups(path: &Path) -> FictusResult<Vec<LabResultGroup>> {
    let mut out = Vec::new();
    for row in RowReader::open(path)? {
        let (Some(id), Some(name)) = (row.get("LabResultGroupID"), row.get("GroupName")) else {
            continue;
        };
        out.push(LabResultGroup {
            group_id: GroupId::new(id),
            group_name: name.to_string(),
        });
    }
    Ok(out)
}

pub fn read_lab_results(path: &Path) -> FictusResult<Vec<LabResult>> {
    let mut out = Vec::new();
    for row in RowReader::open(path)? {
        let (Some(id), Some(group), Some(patient)) = (
            row.get("LabResultID"),
            row.get("LabResultGroupID"),
            row.get("PatientID"),
        ) else {
            continue;
        };
        out.push(LabResult {
            lab_result_id: LabResultId::new(id),
            group_id: GroupId::new(group),
            patient_id: PatientId::new(patient),
            result_name: row.get("ResultName").unwrap_or_default().to_string(),
            unit: row.get("Unit").unwrap_or_default().to_string(),
        });
    }
    Ok(out)
}

pub fn read_measurements(path: &Path) -> FictusResult<Vec<Measurement>> {
    let mut out = Vec::new();
    for row in RowReader::open(path)? {
        let (Some(id), Some(lab_result)) = (row.get("MeasurementID"), row.get("LabResultID"))
        else {
            continue;
        };
        out.push(Measurement {
            measurement_id: MeasurementId::new(id),
            lab_result_id: LabResultId::new(lab_result),
            date_time: row.get("DateTime").unwrap_or_default().to_string(),
            value: row.get("Value").unwrap_or_default().to_string(),
        });
    }
    Ok(out)
}

// ── Per-entity writers ────────────────────────────────────────────────────────

fn open_writer(path: &Path) -> FictusResult<csv::Writer<std::fs::File>> {
    csv::Writer::from_path(path).map_err(|e| FictusError::InputFile {
        path: path.display().to_string(),
        reason: format!("cannot open for writing: {}", e),
    })
}

fn write_failed(path: &Path, e: csv::Error) -> FictusError {
    FictusError::InputFile {
        path: path.display().to_string(),
        reason: format!("write failed: {}", e),
    }
}

pub fn write_patients(path: &Path, patients: &[Patient]) -> FictusResult<()> {
    let mut w = open_writer(path)?;
    w.write_record(["PatientID", "Name"])
        .map_err(|e| write_failed(path, e))?;
    for p in patients {
        w.write_record([p.patient_id.as_str(), &p.name])
            .map_err(|e| write_failed(path, e))?;
    }
    w.flush().map_err(|e| write_failed(path, e.into()))
}

pub fn write_groups(path: &Path, groups: &[LabResultGroup]) -> FictusResult<()> {
    let mut w = open_writer(path)?;
    w.write_record(["LabResultGroupID", "GroupName"])
        .map_err(|e| write_failed(path, e))?;
    for g in groups {
        w.write_record([g.group_id.as_str(), &g.group_name])
            .map_err(|e| write_failed(path, e))?;
    }
    w.flush().map_err(|e| write_failed(path, e.into()))
}

pub fn write_lab_results(path: &Path, lab_results: &[LabResult]) -> FictusResult<()> {
    let mut w = open_writer(path)?;
    w.write_record(["LabResultID", "LabResultGroupID", "PatientID", "ResultName", "Unit"])
        .map_err(|e| write_failed(path, e))?;
    for lr in lab_results {
        w.write_record([
            lr.lab_result_id.as_str(),
            lr.group_id.as_str(),
            lr.patient_id.as_str(),
            &lr.result_name,
            &lr.unit,
        ])
        .map_err(|e| write_failed(path, e))?;
    }
    w.flush().map_err(|e| write_failed(path, e.into()))
}

pub fn write_measurements(path: &Path, measurements: &[Measurement]) -> FictusResult<()> {
    let mut w = open_writer(path)?;
    w.write_record(["MeasurementID", "LabResultID", "DateTime", "Value"])
        .map_err(|e| write_failed(path, e))?;
    for m in measurements {
        w.write_record([
            m.measurement_id.as_str(),
            m.lab_result_id.as_str(),
            &m.date_time,
            &m.value,
        ])
        .map_err(|e| write_failed(path, e))?;
    }
    w.flush().map_err(|e| write_failed(path, e.into()))
}

/// Write CMAS rows in the narrow layout. The wide `;` layout is read-only:
/// generated trees always use the narrow form.
pub fn write_cmas(path: &Path, scores: &[CmasScore]) -> FictusResult<()> {
    let mut w = open_writer(path)?;
    w.write_record(["PatientID", "Date", "Score", "Category"])
        .map_err(|e| write_failed(path, e))?;
    for s in scores {
        w.write_record([
            s.patient_id.as_str(),
            &s.date,
            &format_score(s.score),
            s.category.as_str(),
        ])
        .map_err(|e| write_failed(path, e))?;
    }
    w.flush().map_err(|e| write_failed(path, e.into()))
}

/// Render a score without a trailing `.0` when it is integral.
pub(crate) fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{}", score as i64)
    } else {
        format!("{}", score)
    }
}

#[cfg(test)]
mod tests {
    use fictus_contracts::record::CmasCategory;

    use super::*;

    fn sample_tree() -> RecordTree {
        RecordTree {
            patients: vec![Patient {
                patient_id: PatientId::new("p-1"),
                name: "Mock Anna".to_string(),
            }],
            groups: vec![LabResultGroup {
                group_id: GroupId::new("g-1"),
                group_name: "Hematology, general".to_string(),
            }],
            lab_results: vec![LabResult {
                lab_result_id: LabResultId::new("lr-1"),
                group_id: GroupId::new("g-1"),
                patient_id: PatientId::new("p-1"),
                result_name: "Hemoglobin".to_string(),
                unit: "mmol/L".to_string(),
            }],
            measurements: vec![
                Measurement {
                    measurement_id: MeasurementId::new("m-1"),
                    lab_result_id: LabResultId::new("lr-1"),
                    date_time: "02-03-202109:15".to_string(),
                    value: "8.6".to_string(),
                },
                Measurement {
                    measurement_id: MeasurementId::new("m-2"),
                    lab_result_id: LabResultId::new("lr-1"),
                    date_time: "15-04-2021".to_string(),
                    value: "<0.5".to_string(),
                },
            ],
            cmas_scores: vec![CmasScore {
                patient_id: PatientId::new("p-1"),
                date: "15-06-2023".to_string(),
                score: 42.0,
                category: CmasCategory::High,
            }],
        }
    }

    #[test]
    fn tree_round_trips_field_for_field() {
        let dir = tempfile::tempdir().unwrap();
        let tree = sample_tree();

        tree.write_dir(dir.path()).unwrap();
        let back = RecordTree::read_dir(dir.path()).unwrap();

        assert_eq!(back, tree);
    }

    #[test]
    fn values_containing_the_delimiter_survive_the_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = sample_tree();
        tree.groups[0].group_name = "Proteins, serum".to_string();
        tree.measurements[0].value = "memo: stable, recheck in 3 months".to_string();

        tree.write_dir(dir.path()).unwrap();
        let back = RecordTree::read_dir(dir.path()).unwrap();

        assert_eq!(back.groups[0].group_name, "Proteins, serum");
        assert_eq!(back.measurements[0].value, "memo: stable, recheck in 3 months");
    }

    #[test]
    fn integral_scores_render_without_decimal_point() {
        assert_eq!(format_score(42.0), "42");
        assert_eq!(format_score(7.5), "7.5");
    }

    #[test]
    fn missing_tree_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // Empty directory: Patient.csv absent.
        let err = RecordTree::read_dir(dir.path()).unwrap_err();
        assert!(err.is_fatal());
    }
}
