//! Ties the workflows to their seams.
//!
//! The orchestrator owns the remote store, the observer, and the random
//! source, and exposes one method per workflow. Binaries build exactly one
//! of these and drive it; tests build one around scripted seams.

use std::path::Path;
use std::sync::Arc;

use fictus_contracts::error::FictusResult;
use fictus_contracts::report::{DeleteOutcome, GenerateReport, ImportReport};
use fictus_rand::RandomSource;

use crate::delete;
use crate::generate::{self, GenerateOptions};
use crate::import;
use crate::traits::{PipelineObserver, RemoteStore};

/// Entry point for the mock-patient workflows.
pub struct Orchestrator {
    store: Arc<dyn RemoteStore>,
    observer: Box<dyn PipelineObserver>,
    source: Box<dyn RandomSource>,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn RemoteStore>,
        observer: Box<dyn PipelineObserver>,
        source: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            store,
            observer,
            source,
        }
    }

    /// Clone the template tree into a randomized mock patient on disk.
    pub fn generate(&mut self, options: &GenerateOptions) -> FictusResult<GenerateReport> {
        generate::generate(options, self.observer.as_ref(), self.source.as_mut())
    }

    /// Upsert the CSV tree at `dir` into the remote store.
    pub fn import(&mut self, dir: &Path) -> FictusResult<ImportReport> {
        import::import(self.store.as_ref(), self.observer.as_ref(), dir)
    }

    /// Generate a mock patient and import it in one pass.
    pub fn create(
        &mut self,
        options: &GenerateOptions,
    ) -> FictusResult<(GenerateReport, ImportReport)> {
        let generated = self.generate(options)?;
        let imported = self.import(&options.out_dir)?;
        Ok((generated, imported))
    }

    /// Delete the remote patient named `name`, cascading through its
    /// children, and optionally remove its local CSV tree.
    pub fn delete(
        &mut self,
        name: &str,
        local_dir: Option<&Path>,
    ) -> FictusResult<DeleteOutcome> {
        delete::delete(self.store.as_ref(), self.observer.as_ref(), name, local_dir)
    }
}
