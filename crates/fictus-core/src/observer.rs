//! The default observer: structured logging via tracing.

use tracing::{info, warn};

use fictus_contracts::ids::RemoteId;
use fictus_contracts::record::EntityKind;
use fictus_contracts::report::UpsertAction;

use crate::traits::PipelineObserver;

/// Forwards every pipeline event to the tracing subscriber.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn stage(&self, workflow: &str, stage: &str) {
        info!(workflow, stage, "stage started");
    }

    fn upsert(&self, entity: EntityKind, key: &str, action: UpsertAction) {
        match action {
            UpsertAction::Created => info!(entity = %entity, key, "created"),
            UpsertAction::Reused => info!(entity = %entity, key, "already present, reusing"),
            UpsertAction::Failed => warn!(entity = %entity, key, "upsert failed, continuing"),
        }
    }

    fn skipped(&self, entity: EntityKind, key: &str, reason: &str) {
        warn!(entity = %entity, key, reason, "skipped");
    }

    fn deleted(&self, entity: EntityKind, id: RemoteId) {
        info!(entity = %entity, id = %id, "deleted");
    }
}

/// An observer that discards everything. Handy for callers that only want
/// the returned report.
#[derive(Debug, Default)]
pub struct NullObserver;

impl PipelineObserver for NullObserver {
    fn stage(&self, _workflow: &str, _stage: &str) {}
    fn upsert(&self, _entity: EntityKind, _key: &str, _action: UpsertAction) {}
    fn skipped(&self, _entity: EntityKind, _key: &str, _reason: &str) {}
    fn deleted(&self, _entity: EntityKind, _id: RemoteId) {}
}
