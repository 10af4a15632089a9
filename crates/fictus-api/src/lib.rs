//! HTTP implementation of the pipeline's [`RemoteStore`] seam.
//!
//! Talks to a headless CMS content API: `data`-enveloped JSON, bracketed
//! filter query parameters, bearer authorization, numeric document ids.
//! All requests are blocking and serial.
//!
//! [`RemoteStore`]: fictus_core::RemoteStore

pub mod client;
pub mod wire;

pub use client::ApiClient;
