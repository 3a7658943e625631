//! End-to-end checks over the core pipeline:
//! snapshot JSON -> extraction -> DOT text, plus the status table.

use std::collections::BTreeSet;

use proptest::prelude::*;
use serde_json::{json, Value};

use csds_core::graph::{Graph, NodeKind};
use csds_core::prelude::*;

const RESPONSE: &str = include_str!("fixtures/client_status_response.json");

const HCM_V3: &str =
    "type.googleapis.com/envoy.extensions.filters.network.http_connection_manager.v3.HttpConnectionManager";

#[test]
fn fixture_builds_expected_graph() {
    let snap = Snapshot::from_slice(RESPONSE.as_bytes()).unwrap();
    let g = extract(&snap).unwrap().graph;

    assert_eq!(g.nodes(NodeKind::Listener)["td-listener-80"], "LDS0");
    assert_eq!(g.nodes(NodeKind::RouteTable)["URL_MAP/123456789_web-map"], "RDS0");
    assert_eq!(g.nodes(NodeKind::Cluster).len(), 2);

    let edges: Vec<_> = g.edges().collect();
    assert_eq!(
        edges,
        vec![
            ("td-listener-80", "URL_MAP/123456789_web-map"),
            ("URL_MAP/123456789_web-map", "cloud-internal-istio:cloud_mp_123456789_web-v1"),
            ("URL_MAP/123456789_web-map", "cloud-internal-istio:cloud_mp_123456789_web-v2"),
        ]
    );
    assert!(g.dangling().is_empty());
}

#[test]
fn fixture_renders_deterministically() {
    let snap = Snapshot::from_slice(RESPONSE.as_bytes()).unwrap();
    let a = render_dot(&extract(&snap).unwrap().graph);
    let b = render_dot(&extract(&snap).unwrap().graph);
    assert_eq!(a, b);
    assert!(a.starts_with("digraph G {\n\trankdir=LR;\n"));
    assert!(a.contains("\"td-listener-80\" -> \"URL_MAP/123456789_web-map\""));
    assert!(a.ends_with("}\n"));
}

#[test]
fn fixture_status_table() {
    let snap = Snapshot::from_slice(RESPONSE.as_bytes()).unwrap();
    let report = summarize(&snap);
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[0].config_status, vec!["LDS SYNCED", "RDS SYNCED", "CDS STALE"]);
    assert_eq!(report.rows[0].stream_type, "ADS");
    assert_eq!(report.rows[1].config_status, vec!["N/A"]);
    assert_eq!(report.render().lines().count(), 5);
}

#[test]
fn malformed_cluster_fails_with_category() {
    let v = json!({ "config": [{ "xdsConfig": [
        { "clusterConfig": { "dynamicActiveClusters": [{ "cluster": { "type": "EDS" } }] } }
    ]}]});
    let err = Snapshot::from_json(&v).unwrap_err();
    assert_eq!(err.kind(), Some(XdsKind::Cds));
    assert!(err.to_string().starts_with("malformed CDS config"));
}

#[test]
fn empty_snapshot_yields_empty_graph() {
    let snap = Snapshot::from_json(&json!({ "config": [] })).unwrap();
    let g = extract(&snap).unwrap().graph;
    assert!(g.is_empty());
    assert!(g.listener_routes().is_empty());
    assert!(g.route_clusters().is_empty());
    assert_eq!(render_dot(&g), "digraph G {\n\trankdir=LR;\n}\n");
}

fn listener_entry(i: usize, route: usize) -> Value {
    json!({ "listenerConfig": { "dynamicListeners": [{ "activeState": { "listener": {
        "name": format!("l{i}"),
        "filterChains": [{ "filters": [{ "name": "hcm", "typedConfig": {
            "@type": HCM_V3, "rds": { "routeConfigName": format!("r{route}") }
        }}]}]
    }}}]}})
}

fn route_entry(i: usize, clusters: &[usize]) -> Value {
    let routes: Vec<Value> = clusters
        .iter()
        .map(|c| json!({ "route": { "cluster": format!("c{c}") } }))
        .collect();
    json!({ "routeConfig": { "dynamicRouteConfigs": [{ "routeConfig": {
        "name": format!("r{i}"),
        "virtualHosts": [{ "routes": routes }]
    }}]}})
}

fn cluster_entry(i: usize) -> Value {
    json!({ "clusterConfig": { "dynamicActiveClusters": [{ "cluster": { "name": format!("c{i}") } }] } })
}

fn entries() -> impl Strategy<Value = Vec<Value>> {
    (1usize..6, 1usize..6, 1usize..6)
        .prop_flat_map(|(nl, nr, nc)| {
            (
                prop::collection::vec(0..nr, nl),
                prop::collection::vec(prop::collection::vec(0..nc, 0..4), nr),
                Just(nc),
            )
        })
        .prop_map(|(listeners, routes, nc)| {
            let mut out = Vec::new();
            out.extend(listeners.iter().enumerate().map(|(i, r)| listener_entry(i, *r)));
            out.extend(routes.iter().enumerate().map(|(i, cs)| route_entry(i, cs)));
            out.extend((0..nc).map(cluster_entry));
            out
        })
}

fn graph_of(entries: &[Value]) -> Graph {
    let snap = Snapshot::from_json(&json!({ "config": [{ "xdsConfig": entries }] })).unwrap();
    extract(&snap).unwrap().graph
}

fn node_names(g: &Graph) -> BTreeSet<(NodeKind, String)> {
    NodeKind::ALL
        .iter()
        .flat_map(|k| g.nodes(*k).keys().map(move |n| (*k, n.clone())))
        .collect()
}

proptest! {
    #[test]
    fn node_and_edge_sets_ignore_entry_order(
        (original, shuffled) in entries().prop_flat_map(|e| (Just(e.clone()), Just(e).prop_shuffle()))
    ) {
        let a = graph_of(&original);
        let b = graph_of(&shuffled);
        prop_assert_eq!(node_names(&a), node_names(&b));
        prop_assert_eq!(a.listener_routes(), b.listener_routes());
        prop_assert_eq!(a.route_clusters(), b.route_clusters());
    }
}
