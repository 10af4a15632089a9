//! The generate workflow: template CSV tree → randomized clone on disk.
//!
//! Stages: read template → remap identifiers → randomize values/dates →
//! write output CSVs. Terminal state: the output directory exists with all
//! five entity files. Purely local — no remote calls.

use std::path::PathBuf;

use tracing::debug;

use fictus_contracts::error::{FictusError, FictusResult};
use fictus_contracts::ids::{MeasurementId, PatientId};
use fictus_contracts::record::{CmasCategory, CmasScore, EntityKind, Measurement, Patient};
use fictus_contracts::report::GenerateReport;
use fictus_csv::RecordTree;
use fictus_rand::{randomize_date, randomize_numeric, randomize_value, RandomSource};

use crate::remap::RemapContext;
use crate::traits::PipelineObserver;

const WORKFLOW: &str = "generate";

/// Tunables for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Directory holding the template CSV tree.
    pub template_dir: PathBuf,
    /// Directory the cloned tree is written to.
    pub out_dir: PathBuf,
    /// Display name for the cloned patient.
    pub name: String,
    /// Numeric perturbation, plus/minus percent.
    pub percentage: f64,
    /// Date shift window in months.
    pub month_span: u32,
}

/// Clone the template tree into a new mock patient.
///
/// Mints a fresh patient key and fresh lab-result/measurement keys (group
/// keys are shared reference data and copied as-is), randomizes measurement
/// values, dates, and CMAS scores, and writes the result under
/// `options.out_dir`.
///
/// Measurements whose lab result has no remap entry are dropped and
/// counted, never written with a dangling reference.
pub fn generate(
    options: &GenerateOptions,
    observer: &dyn PipelineObserver,
    source: &mut dyn RandomSource,
) -> FictusResult<GenerateReport> {
    observer.stage(WORKFLOW, "read template");
    let template = RecordTree::read_dir(&options.template_dir)?;

    let Some(_template_patient) = template.patients.first() else {
        return Err(FictusError::InputFile {
            path: options.template_dir.display().to_string(),
            reason: "template has no patient row".to_string(),
        });
    };

    let patient_id = PatientId::mint();
    let patient = Patient {
        patient_id: patient_id.clone(),
        name: options.name.clone(),
    };

    // ── Remap lab results ────────────────────────────────────────────────
    observer.stage(WORKFLOW, "remap identifiers");
    let mut remap = RemapContext::new();
    let lab_results: Vec<_> = template
        .lab_results
        .iter()
        .map(|lr| {
            let mut clone = lr.clone();
            clone.lab_result_id = remap.remap(&lr.lab_result_id);
            clone.patient_id = patient_id.clone();
            clone
        })
        .collect();

    // ── Randomize measurements ───────────────────────────────────────────
    observer.stage(WORKFLOW, "randomize measurements");
    let mut measurements = Vec::with_capacity(template.measurements.len());
    for m in &template.measurements {
        let Some(lab_result_id) = remap.lookup(&m.lab_result_id).cloned() else {
            remap.note_dropped();
            observer.skipped(
                EntityKind::Measurement,
                m.measurement_id.as_str(),
                "no remapped lab result",
            );
            continue;
        };
        measurements.push(Measurement {
            measurement_id: MeasurementId::mint(),
            lab_result_id,
            date_time: randomize_date(&m.date_time, options.month_span, source).into_value(),
            value: randomize_value(&m.value, options.percentage, source).into_value(),
        });
    }

    // ── Randomize CMAS scores ────────────────────────────────────────────
    observer.stage(WORKFLOW, "randomize CMAS scores");
    let cmas_scores: Vec<_> = template
        .cmas_scores
        .iter()
        .map(|s| {
            let score = randomize_score(s.score, options.percentage, source);
            CmasScore {
                patient_id: patient_id.clone(),
                date: randomize_date(&s.date, options.month_span, source).into_value(),
                score,
                category: CmasCategory::from_score(score),
            }
        })
        .collect();

    // ── Write the cloned tree ────────────────────────────────────────────
    observer.stage(WORKFLOW, "write output");
    let report = GenerateReport {
        patient_id: patient.patient_id.clone(),
        name: options.name.clone(),
        out_dir: options.out_dir.clone(),
        lab_results: lab_results.len(),
        measurements_written: measurements.len(),
        measurements_dropped: remap.dropped(),
        cmas_rows: cmas_scores.len(),
    };

    let tree = RecordTree {
        patients: vec![patient],
        groups: template.groups,
        lab_results,
        measurements,
        cmas_scores,
    };
    tree.write_dir(&options.out_dir)?;

    debug!(
        patient_id = %report.patient_id,
        lab_results = report.lab_results,
        measurements = report.measurements_written,
        dropped = report.measurements_dropped,
        "generated mock patient"
    );
    Ok(report)
}

/// Perturb a CMAS score through the same numeric path as measurement
/// values, so precision handling stays identical.
fn randomize_score(score: f64, percentage: f64, source: &mut dyn RandomSource) -> f64 {
    randomize_numeric(&score.to_string(), percentage, source)
        .into_value()
        .parse()
        .unwrap_or(score)
}
