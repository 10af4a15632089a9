//! # fictus-contracts
//!
//! Shared types and contracts for the fictus mock-patient pipeline.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions, configuration, and error types.

pub mod config;
pub mod error;
pub mod ids;
pub mod record;
pub mod report;

#[cfg(test)]
mod tests {
    use super::*;
    use config::ApiConfig;
    use error::FictusError;
    use ids::{LabResultId, MeasurementId, PatientId, RemoteId};
    use record::{CmasCategory, EntityKind};
    use report::{ImportReport, UpsertAction, UpsertCounts};

    // ── Identifier minting ───────────────────────────────────────────────────

    #[test]
    fn minted_keys_are_unique() {
        let ids: std::collections::HashSet<String> = (0..100)
            .map(|_| PatientId::mint().0)
            .chain((0..100).map(|_| LabResultId::mint().0))
            .chain((0..100).map(|_| MeasurementId::mint().0))
            .collect();

        // 300 mints, 300 distinct keys.
        assert_eq!(ids.len(), 300);
    }

    #[test]
    fn business_keys_serialize_transparently() {
        let id = PatientId::new("abc-123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc-123\"");

        let back: PatientId = serde_json::from_str("\"abc-123\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn remote_id_serializes_as_plain_number() {
        assert_eq!(serde_json::to_string(&RemoteId(42)).unwrap(), "42");
    }

    // ── CMAS category rule ───────────────────────────────────────────────────

    #[test]
    fn category_above_ten_is_high() {
        assert_eq!(CmasCategory::from_score(10.5), CmasCategory::High);
        assert_eq!(CmasCategory::from_score(42.0), CmasCategory::High);
    }

    #[test]
    fn category_ten_and_below_is_low() {
        // Exactly 10 is NOT high — the rule is strictly greater-than.
        assert_eq!(CmasCategory::from_score(10.0), CmasCategory::Low);
        assert_eq!(CmasCategory::from_score(4.0), CmasCategory::Low);
        assert_eq!(CmasCategory::from_score(0.0), CmasCategory::Low);
    }

    #[test]
    fn category_renders_lowercase() {
        assert_eq!(CmasCategory::High.to_string(), "high");
        assert_eq!(serde_json::to_string(&CmasCategory::Low).unwrap(), "\"low\"");
    }

    // ── Error fatality ───────────────────────────────────────────────────────

    #[test]
    fn per_record_api_errors_are_recoverable() {
        let err = FictusError::Api {
            entity: EntityKind::Measurement,
            key: "m-1".to_string(),
            reason: "validation rejected".to_string(),
        };
        assert!(!err.is_fatal());
    }

    #[test]
    fn workflow_precondition_errors_are_fatal() {
        let connectivity = FictusError::Connectivity {
            base_url: "http://localhost:1337/api".to_string(),
            reason: "connection refused".to_string(),
        };
        let patient = FictusError::PatientCreate {
            key: "p-1".to_string(),
            reason: "500".to_string(),
        };
        let input = FictusError::InputFile {
            path: "mock/Patient.csv".to_string(),
            reason: "not found".to_string(),
        };
        assert!(connectivity.is_fatal());
        assert!(patient.is_fatal());
        assert!(input.is_fatal());
    }

    #[test]
    fn error_messages_carry_the_offending_key() {
        let err = FictusError::Api {
            entity: EntityKind::LabResult,
            key: "lr-77".to_string(),
            reason: "timeout".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("lab-result"));
        assert!(msg.contains("lr-77"));
        assert!(msg.contains("timeout"));
    }

    // ── Config ───────────────────────────────────────────────────────────────

    #[test]
    fn config_parses_from_toml() {
        let config = ApiConfig::from_toml_str(
            r#"
            base_url = "https://cms.example.org/api"
            credential = "secret-token"
            timeout_ms = 5000
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url, "https://cms.example.org/api");
        assert_eq!(config.credential, "secret-token");
        assert_eq!(config.timeout_ms, 5000);
    }

    #[test]
    fn config_timeout_defaults_when_omitted() {
        let config = ApiConfig::from_toml_str(
            r#"
            base_url = "http://localhost:1337/api"
            credential = "t"
            "#,
        )
        .unwrap();
        assert_eq!(config.timeout_ms, 30_000);
    }

    #[test]
    fn config_without_credential_fails_validation() {
        let config = ApiConfig::default_local();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, FictusError::Config { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn malformed_config_toml_is_a_config_error() {
        let err = ApiConfig::from_toml_str("base_url = [not toml").unwrap_err();
        assert!(matches!(err, FictusError::Config { .. }));
    }

    // ── Report tallies ───────────────────────────────────────────────────────

    #[test]
    fn upsert_counts_tally_by_action() {
        let mut counts = UpsertCounts::default();
        counts.record(UpsertAction::Created);
        counts.record(UpsertAction::Created);
        counts.record(UpsertAction::Reused);
        counts.record(UpsertAction::Failed);

        assert_eq!(counts.created, 2);
        assert_eq!(counts.reused, 1);
        assert_eq!(counts.failed, 1);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn rerun_import_report_shows_zero_created() {
        let report = ImportReport {
            patient_created: false,
            groups: UpsertCounts { created: 0, reused: 3, failed: 0 },
            lab_results: UpsertCounts { created: 0, reused: 12, failed: 0 },
            measurements: UpsertCounts { created: 0, reused: 250, failed: 0 },
            cmas_scores: UpsertCounts { created: 0, reused: 20, failed: 0 },
        };
        assert_eq!(report.total_created(), 0);
    }
}
