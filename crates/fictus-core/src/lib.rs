//! Workflow engine for the fictus mock-patient pipeline.
//!
//! Three workflows over two injected seams:
//!
//! - [`generate`] — clone a template CSV tree into a randomized mock
//!   patient on disk;
//! - [`import`] — upsert a CSV tree into a remote store, idempotently;
//! - [`delete`] — cascade-delete a remote patient and its children.
//!
//! The seams are [`RemoteStore`] (implemented against the live CMS by
//! `fictus-api`) and [`PipelineObserver`] (progress events). The
//! [`Orchestrator`] wires seams to workflows for binaries.

pub mod delete;
pub mod generate;
pub mod import;
pub mod observer;
pub mod orchestrator;
pub mod remap;
pub mod traits;

#[cfg(test)]
mod testutil;

pub use delete::delete;
pub use generate::{generate, GenerateOptions};
pub use import::import;
pub use observer::{NullObserver, TracingObserver};
pub use orchestrator::Orchestrator;
pub use remap::RemapContext;
pub use traits::{PipelineObserver, RemotePatient, RemoteStore};
