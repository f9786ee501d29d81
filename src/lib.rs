//! Variant Stub Generator
//!
//! Produces static-typing stubs for two variants of one reflected engine, sharing
//! everything the variants agree on:
//!
//! - **Extraction**: convert raw reflection dumps into class descriptors ([`extract`])
//! - **Reconciliation**: compute the common subschema and stamp every reference with the
//!   collection it resolves against ([`stubgen_reconciler`])
//! - **Rendering**: emit `.pyi` text per class ([`stubgen_renderer`])
//! - **Output**: lay the three collections out as an importable tree ([`writer`])
//!
//! See [`pipeline`] for running the stages, alone against a snapshot directory or all
//! at once.

pub mod config;
pub mod extract;
pub mod pipeline;
pub mod writer;

pub use config::{ConfigArgs, StubgenConfig};
pub use pipeline::{generate, GenerateRequest, PassSummary};

pub use stubgen_reconciler as reconciler;
pub use stubgen_renderer as renderer;
pub use stubgen_snapshot as snapshot;
pub use stubgen_types as types;
