//! csds-core
//!
//! Core primitives for the CSDS diagnostic client:
//! - Snapshot model of a `ClientStatusResponse` (per-client xDS config dumps)
//! - Closed type resolver for `google.protobuf.Any` extension payloads
//! - Reference extraction (listener -> route table -> cluster)
//! - Deterministic dependency graph and Graphviz DOT rendering
//! - Per-client sync status summaries
//!
//! The core crate does not do network or filesystem I/O. Callers fetch the
//! snapshot, hand the decoded JSON in, and decide where rendered text goes.

pub mod config;
pub mod errors;
pub mod extract;
pub mod graph;
pub mod model;
pub mod render;
pub mod resolve;
pub mod status;

pub use crate::errors::{CsdsError, CsdsResult};

/// Metadata key the control plane uses to report a client's stream type.
pub const XDS_STREAM_TYPE_KEY: &str = "XDS_STREAM_TYPE";

/// Convenience re-exports.
pub mod prelude {
    pub use crate::config::{validate_config, RenderConfig};
    pub use crate::extract::{extract, Extraction};
    pub use crate::graph::{Graph, GraphBuilder};
    pub use crate::model::{ClientConfig, ConfigEntry, Snapshot, SyncStatus, XdsConfig, XdsKind};
    pub use crate::render::dot::render_dot;
    pub use crate::status::{summarize, StatusReport, StatusRow};
    pub use crate::{CsdsError, CsdsResult};
}
