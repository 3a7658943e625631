//! Route config dump (RDS).

use serde::Deserialize;

/// `RoutesConfigDump` as reported through CSDS.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteConfigDump {
    #[serde(default)]
    pub static_route_configs: Vec<RouteConfigEntry>,
    #[serde(default)]
    pub dynamic_route_configs: Vec<RouteConfigEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteConfigEntry {
    #[serde(default)]
    pub version_info: Option<String>,
    pub route_config: RouteTableDetail,
}

impl RouteConfigDump {
    pub fn route_tables(&self) -> impl Iterator<Item = &RouteTableDetail> {
        self.static_route_configs
            .iter()
            .chain(self.dynamic_route_configs.iter())
            .map(|e| &e.route_config)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTableDetail {
    pub name: String,
    #[serde(default)]
    pub virtual_hosts: Vec<VirtualHost>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VirtualHost {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// A single route. Redirect and direct-response routes have no `route` action.
#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub route: Option<RouteAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WeightedCluster {
    pub name: String,
    #[serde(default)]
    pub weight: Option<u32>,
}

/// Where a route forwards traffic.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawRouteAction")]
pub enum RouteAction {
    Cluster(String),
    WeightedClusters(Vec<WeightedCluster>),
    /// Cluster chosen at request time from a header; no static reference.
    ClusterHeader(String),
}

impl RouteAction {
    /// Cluster names this action can dispatch to.
    pub fn cluster_names(&self) -> Vec<&str> {
        match self {
            Self::Cluster(name) => vec![name.as_str()],
            Self::WeightedClusters(clusters) => clusters.iter().map(|c| c.name.as_str()).collect(),
            Self::ClusterHeader(_) => Vec::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRouteAction {
    #[serde(default)]
    cluster: Option<String>,
    #[serde(default)]
    weighted_clusters: Option<RawWeightedClusters>,
    #[serde(default)]
    cluster_header: Option<String>,
}

#[derive(Deserialize)]
struct RawWeightedClusters {
    clusters: Vec<WeightedCluster>,
}

impl TryFrom<RawRouteAction> for RouteAction {
    type Error = String;

    fn try_from(raw: RawRouteAction) -> Result<Self, Self::Error> {
        if let Some(w) = raw.weighted_clusters {
            return Ok(Self::WeightedClusters(w.clusters));
        }
        if let Some(c) = raw.cluster {
            return Ok(Self::Cluster(c));
        }
        if let Some(h) = raw.cluster_header {
            return Ok(Self::ClusterHeader(h));
        }
        Err("route action has no cluster specifier".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn weighted_action_keeps_all_names() {
        let a: RouteAction = serde_json::from_value(json!({
            "weightedClusters": { "clusters": [
                { "name": "A", "weight": 50 },
                { "name": "B", "weight": 50 }
            ]},
            "timeout": "15s"
        }))
        .unwrap();
        assert_eq!(a.cluster_names(), vec!["A", "B"]);
    }

    #[test]
    fn cluster_header_has_no_static_reference() {
        let a: RouteAction = serde_json::from_value(json!({ "clusterHeader": "x-cluster" })).unwrap();
        assert!(a.cluster_names().is_empty());
    }

    #[test]
    fn action_without_specifier_is_rejected() {
        let err = serde_json::from_value::<RouteAction>(json!({ "timeout": "1s" })).unwrap_err();
        assert!(err.to_string().contains("no cluster specifier"));
    }

    #[test]
    fn redirect_route_has_no_action() {
        let r: Route = serde_json::from_value(json!({
            "match": { "prefix": "/" },
            "redirect": { "httpsRedirect": true }
        }))
        .unwrap();
        assert!(r.route.is_none());
    }
}
