//! Dependency graph between xDS resources.
//!
//! Nodes come in three disjoint categories (listeners, route tables,
//! clusters). Each node is keyed by its resource name and carries a short id
//! such as `LDS0` or `CDS3`, used only as a render label.
//!
//! Edges go listener -> route table and route table -> cluster. Both node and
//! reference maps are `BTreeMap`/`BTreeSet`, so iteration order is a function
//! of the contents alone and duplicate references collapse.
//!
//! Short ids are handed out per category in first-seen order. They depend on
//! the order resources were reported and are not part of the graph's identity.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::model::XdsKind;

/// Resource name -> short id.
pub type NodeMap = BTreeMap<String, String>;

/// Source name -> referenced names.
pub type RefMap = BTreeMap<String, BTreeSet<String>>;

/// Node category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Listener,
    RouteTable,
    Cluster,
}

impl NodeKind {
    pub const ALL: [NodeKind; 3] = [NodeKind::Listener, NodeKind::RouteTable, NodeKind::Cluster];

    pub fn xds_kind(&self) -> XdsKind {
        match self {
            Self::Listener => XdsKind::Lds,
            Self::RouteTable => XdsKind::Rds,
            Self::Cluster => XdsKind::Cds,
        }
    }
}

/// Immutable graph, ready for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Graph {
    listeners: NodeMap,
    route_tables: NodeMap,
    clusters: NodeMap,
    listener_routes: RefMap,
    route_clusters: RefMap,
}

impl Graph {
    pub fn nodes(&self, kind: NodeKind) -> &NodeMap {
        match kind {
            NodeKind::Listener => &self.listeners,
            NodeKind::RouteTable => &self.route_tables,
            NodeKind::Cluster => &self.clusters,
        }
    }

    pub fn listener_routes(&self) -> &RefMap {
        &self.listener_routes
    }

    pub fn route_clusters(&self) -> &RefMap {
        &self.route_clusters
    }

    /// All edges: listener references first, then route table references.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.listener_routes
            .iter()
            .chain(self.route_clusters.iter())
            .flat_map(|(src, dsts)| dsts.iter().map(move |dst| (src.as_str(), dst.as_str())))
    }

    pub fn node_count(&self) -> usize {
        NodeKind::ALL.iter().map(|k| self.nodes(*k).len()).sum()
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0 && self.edge_count() == 0
    }

    /// Names referenced by an edge but never reported as a node of the
    /// expected category.
    pub fn dangling(&self) -> BTreeSet<(NodeKind, &str)> {
        let mut out = BTreeSet::new();
        for dst in self.listener_routes.values().flatten() {
            if !self.route_tables.contains_key(dst) {
                out.insert((NodeKind::RouteTable, dst.as_str()));
            }
        }
        for dst in self.route_clusters.values().flatten() {
            if !self.clusters.contains_key(dst) {
                out.insert((NodeKind::Cluster, dst.as_str()));
            }
        }
        out
    }
}

/// Accumulates nodes and references during extraction.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    graph: Graph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node, returning its short id. A name seen before keeps the
    /// id it was first given.
    pub fn add_node(&mut self, kind: NodeKind, name: &str) -> &str {
        let map = match kind {
            NodeKind::Listener => &mut self.graph.listeners,
            NodeKind::RouteTable => &mut self.graph.route_tables,
            NodeKind::Cluster => &mut self.graph.clusters,
        };
        let next = map.len();
        map.entry(name.to_string())
            .or_insert_with(|| format!("{}{}", kind.xds_kind(), next))
    }

    pub fn add_listener_route(&mut self, listener: &str, route_table: &str) {
        self.graph
            .listener_routes
            .entry(listener.to_string())
            .or_default()
            .insert(route_table.to_string());
    }

    pub fn add_route_cluster(&mut self, route_table: &str, cluster: &str) {
        self.graph
            .route_clusters
            .entry(route_table.to_string())
            .or_default()
            .insert(cluster.to_string());
    }

    pub fn build(self) -> Graph {
        self.graph
    }
}

/// Convert the graph to a JSON value for machine-readable output.
pub fn graph_to_json(g: &Graph) -> serde_json::Value {
    let nodes = NodeKind::ALL
        .iter()
        .flat_map(|kind| {
            g.nodes(*kind).iter().map(move |(name, id)| {
                serde_json::json!({
                    "id": id,
                    "name": name,
                    "kind": kind,
                })
            })
        })
        .collect::<Vec<_>>();

    let edges = g
        .edges()
        .map(|(from, to)| serde_json::json!({ "from": from, "to": to }))
        .collect::<Vec<_>>();

    serde_json::json!({
        "nodes": nodes,
        "edges": edges,
        "counts": {
            "nodes": g.node_count(),
            "edges": g.edge_count(),
        }
    })
}
