//! Reference extraction.
//!
//! Walks every config dump in a snapshot and derives:
//! - listener -> route table references, found in HTTP connection manager
//!   filters (`rds.routeConfigName`)
//! - route table -> cluster references, found in route actions (a single
//!   cluster, or every member of a weighted cluster set)
//!
//! Clusters are registered as nodes only; they never reference anything.
//!
//! Filters whose extension type the resolver does not recognize are skipped.
//! Anything else that does not decode fails the whole extraction: no partial
//! graph is returned.

use std::collections::BTreeMap;

use tracing::debug;

use crate::errors::{CsdsError, CsdsResult};
use crate::graph::{Graph, GraphBuilder, NodeKind};
use crate::model::{ClusterDetail, ListenerDetail, RouteTableDetail, Snapshot, XdsConfig, XdsKind};
use crate::resolve::TypeResolver;

/// Typed resources indexed by name, plus the graph built from them.
///
/// When a name is reported more than once (e.g. by several clients), the
/// first occurrence is kept in the index; references from all occurrences
/// are merged into the graph.
#[derive(Debug, Clone)]
pub struct Extraction<'a> {
    pub listeners: BTreeMap<&'a str, &'a ListenerDetail>,
    pub route_tables: BTreeMap<&'a str, &'a RouteTableDetail>,
    pub clusters: BTreeMap<&'a str, &'a ClusterDetail>,
    pub graph: Graph,
}

/// Extract with the default resolver.
pub fn extract(snapshot: &Snapshot) -> CsdsResult<Extraction<'_>> {
    Extractor::default().run(snapshot)
}

#[derive(Debug, Clone, Default)]
pub struct Extractor {
    resolver: TypeResolver,
}

impl Extractor {
    pub fn run<'a>(&self, snapshot: &'a Snapshot) -> CsdsResult<Extraction<'a>> {
        let mut builder = GraphBuilder::new();
        let mut listeners = BTreeMap::new();
        let mut route_tables = BTreeMap::new();
        let mut clusters = BTreeMap::new();

        for config in snapshot.configs() {
            match config {
                XdsConfig::Listener(dump) => {
                    for listener in dump.listeners() {
                        self.listener(listener, &mut builder)?;
                        listeners.entry(listener.name.as_str()).or_insert(listener);
                    }
                }
                XdsConfig::Route(dump) => {
                    for table in dump.route_tables() {
                        route_table(table, &mut builder);
                        route_tables.entry(table.name.as_str()).or_insert(table);
                    }
                }
                XdsConfig::Cluster(dump) => {
                    for cluster in dump.clusters() {
                        builder.add_node(NodeKind::Cluster, &cluster.name);
                        clusters.entry(cluster.name.as_str()).or_insert(cluster);
                    }
                }
                XdsConfig::ScopedRoute(dump) => {
                    debug!(scopes = dump.scopes().count(), "scoped routes add no graph edges");
                }
            }
        }

        let graph = builder.build();
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "extracted config graph"
        );

        Ok(Extraction {
            listeners,
            route_tables,
            clusters,
            graph,
        })
    }

    fn listener(&self, listener: &ListenerDetail, builder: &mut GraphBuilder) -> CsdsResult<()> {
        builder.add_node(NodeKind::Listener, &listener.name);

        for filter in listener.chains().flat_map(|c| c.filters.iter()) {
            let Some(ext) = &filter.typed_config else {
                continue;
            };

            let hcm = self.resolver.http_connection_manager(ext).map_err(|e| {
                CsdsError::malformed(
                    XdsKind::Lds,
                    format!("listener {}: filter {}: {e}", listener.name, filter.name),
                )
            })?;

            match hcm {
                Some(hcm) => match hcm.route_config_name() {
                    Some(route) => builder.add_listener_route(&listener.name, route),
                    None => debug!(listener = %listener.name, "connection manager has no rds reference"),
                },
                None => debug!(
                    listener = %listener.name,
                    type_url = %ext.type_url,
                    "skipping filter with unrecognized extension type"
                ),
            }
        }
        Ok(())
    }
}

fn route_table(table: &RouteTableDetail, builder: &mut GraphBuilder) {
    builder.add_node(NodeKind::RouteTable, &table.name);

    let actions = table
        .virtual_hosts
        .iter()
        .flat_map(|vh| vh.routes.iter())
        .filter_map(|r| r.route.as_ref());

    for action in actions {
        for cluster in action.cluster_names() {
            builder.add_route_cluster(&table.name, cluster);
        }
    }
}
