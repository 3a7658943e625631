//! Snapshot model.
//!
//! Strongly-typed representation of one CSDS `ClientStatusResponse`, decoded
//! from its protobuf JSON mapping (camelCase keys). The snapshot is immutable
//! input: it is built once per request/response cycle and only read afterwards.
//!
//! Layout:
//! - `Snapshot` holds one `ClientConfig` per connected client.
//! - `ClientConfig` holds the client's node identity and an ordered list of
//!   `ConfigEntry` values (one per xDS config dump the client reported).
//! - `ConfigEntry` pairs an optional `SyncStatus` with at most one populated
//!   `XdsConfig` variant.
//!
//! Decoding is strict about shape: a required field that is absent, or a
//! field of the wrong type, fails the whole snapshot with an error that names
//! the xDS category being decoded.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{CsdsError, CsdsResult};
use crate::XDS_STREAM_TYPE_KEY;

pub mod cluster;
pub mod listener;
pub mod route;

pub use cluster::{ClusterConfigDump, ClusterDetail, ScopedRouteConfigDump, ScopedRouteDetail};
pub use listener::{Filter, FilterChain, ListenerConfigDump, ListenerDetail, TypedExtension};
pub use route::{Route, RouteAction, RouteConfigDump, RouteTableDetail, VirtualHost, WeightedCluster};

/// xDS configuration category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum XdsKind {
    /// Listener discovery.
    Lds,
    /// Route discovery.
    Rds,
    /// Cluster discovery.
    Cds,
    /// Scoped route discovery.
    Srds,
}

impl XdsKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lds => "LDS",
            Self::Rds => "RDS",
            Self::Cds => "CDS",
            Self::Srds => "SRDS",
        }
    }
}

impl fmt::Display for XdsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-config sync status as reported by the control plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    Synced,
    NotSent,
    Stale,
    Error,
    #[serde(other)]
    Unknown,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Synced => "SYNCED",
            Self::NotSent => "NOT_SENT",
            Self::Stale => "STALE",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One populated xDS config dump.
#[derive(Debug, Clone)]
pub enum XdsConfig {
    Listener(ListenerConfigDump),
    Route(RouteConfigDump),
    Cluster(ClusterConfigDump),
    ScopedRoute(ScopedRouteConfigDump),
}

impl XdsConfig {
    pub fn kind(&self) -> XdsKind {
        match self {
            Self::Listener(_) => XdsKind::Lds,
            Self::Route(_) => XdsKind::Rds,
            Self::Cluster(_) => XdsKind::Cds,
            Self::ScopedRoute(_) => XdsKind::Srds,
        }
    }
}

/// A single per-xDS entry of a client.
///
/// `config == None` is a valid entry (nothing populated, rendered as "N/A").
#[derive(Debug, Clone, Default)]
pub struct ConfigEntry {
    pub status: Option<SyncStatus>,
    pub config: Option<XdsConfig>,
}

impl ConfigEntry {
    pub fn kind(&self) -> Option<XdsKind> {
        self.config.as_ref().map(XdsConfig::kind)
    }
}

/// Identity of a connected client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    /// Value of the `XDS_STREAM_TYPE` metadata key, when present.
    pub stream_type: Option<String>,
}

/// Config reported for one client.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub node: Option<Node>,
    pub entries: Vec<ConfigEntry>,
}

impl ClientConfig {
    pub fn id(&self) -> &str {
        self.node.as_ref().map(|n| n.id.as_str()).unwrap_or("")
    }

    pub fn stream_type(&self) -> &str {
        self.node
            .as_ref()
            .and_then(|n| n.stream_type.as_deref())
            .unwrap_or("")
    }
}

/// A decoded `ClientStatusResponse`.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub clients: Vec<ClientConfig>,
}

impl Snapshot {
    /// Decode a snapshot from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> CsdsResult<Self> {
        let v: Value = serde_json::from_slice(bytes)
            .map_err(|e| CsdsError::serialization(format!("failed to parse JSON: {e}")))?;
        Self::from_json(&v)
    }

    /// Decode a snapshot from a `ClientStatusResponse` JSON value.
    pub fn from_json(v: &Value) -> CsdsResult<Self> {
        let raw = RawResponse::deserialize(v).map_err(|e| {
            CsdsError::serialization(format!("invalid ClientStatusResponse: {e}"))
        })?;

        let clients = raw
            .config
            .into_iter()
            .map(RawClientConfig::decode)
            .collect::<CsdsResult<Vec<_>>>()?;

        Ok(Self { clients })
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Iterate every populated config dump across all clients, in report order.
    pub fn configs(&self) -> impl Iterator<Item = &XdsConfig> {
        self.clients
            .iter()
            .flat_map(|c| c.entries.iter())
            .filter_map(|e| e.config.as_ref())
    }

    /// True if at least one client reported a config entry.
    pub fn has_xds_config(&self) -> bool {
        self.clients.iter().any(|c| !c.entries.is_empty())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResponse {
    #[serde(default)]
    config: Vec<RawClientConfig>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawClientConfig {
    #[serde(default)]
    node: Option<RawNode>,
    #[serde(default)]
    xds_config: Vec<RawPerXdsConfig>,
}

#[derive(Deserialize)]
struct RawNode {
    #[serde(default)]
    id: String,
    #[serde(default)]
    metadata: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPerXdsConfig {
    #[serde(default)]
    status: Option<SyncStatus>,
    #[serde(default)]
    listener_config: Option<Value>,
    #[serde(default)]
    route_config: Option<Value>,
    #[serde(default)]
    cluster_config: Option<Value>,
    #[serde(default)]
    scoped_route_config: Option<Value>,
}

impl RawClientConfig {
    fn decode(self) -> CsdsResult<ClientConfig> {
        let node = self.node.map(|n| Node {
            stream_type: n
                .metadata
                .get(XDS_STREAM_TYPE_KEY)
                .and_then(Value::as_str)
                .map(str::to_string),
            id: n.id,
        });

        let entries = self
            .xds_config
            .into_iter()
            .map(RawPerXdsConfig::decode)
            .collect::<CsdsResult<Vec<_>>>()?;

        Ok(ClientConfig { node, entries })
    }
}

impl RawPerXdsConfig {
    fn decode(self) -> CsdsResult<ConfigEntry> {
        let mut populated = Vec::with_capacity(1);
        if let Some(v) = self.listener_config {
            populated.push(XdsConfig::Listener(decode_dump(XdsKind::Lds, v)?));
        }
        if let Some(v) = self.route_config {
            populated.push(XdsConfig::Route(decode_dump(XdsKind::Rds, v)?));
        }
        if let Some(v) = self.cluster_config {
            populated.push(XdsConfig::Cluster(decode_dump(XdsKind::Cds, v)?));
        }
        if let Some(v) = self.scoped_route_config {
            populated.push(XdsConfig::ScopedRoute(decode_dump(XdsKind::Srds, v)?));
        }

        if populated.len() > 1 {
            let kinds: Vec<&str> = populated.iter().map(|c| c.kind().as_str()).collect();
            return Err(CsdsError::malformed(
                populated[0].kind(),
                format!("config entry populates more than one variant: {}", kinds.join(", ")),
            ));
        }

        Ok(ConfigEntry {
            status: self.status,
            config: populated.pop(),
        })
    }
}

fn decode_dump<T: serde::de::DeserializeOwned>(kind: XdsKind, v: Value) -> CsdsResult<T> {
    serde_json::from_value(v).map_err(|e| CsdsError::malformed(kind, e.to_string()))
}
