//! Cluster (CDS) and scoped route (SRDS) config dumps.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfigDump {
    #[serde(default)]
    pub version_info: Option<String>,
    #[serde(default)]
    pub static_clusters: Vec<ClusterEntry>,
    #[serde(default)]
    pub dynamic_active_clusters: Vec<ClusterEntry>,
    #[serde(default)]
    pub dynamic_warming_clusters: Vec<ClusterEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterEntry {
    #[serde(default)]
    pub version_info: Option<String>,
    pub cluster: ClusterDetail,
}

impl ClusterConfigDump {
    pub fn clusters(&self) -> impl Iterator<Item = &ClusterDetail> {
        self.static_clusters
            .iter()
            .chain(self.dynamic_active_clusters.iter())
            .chain(self.dynamic_warming_clusters.iter())
            .map(|e| &e.cluster)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClusterDetail {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopedRouteConfigDump {
    #[serde(default)]
    pub inline_scoped_route_configs: Vec<ScopedRouteGroup>,
    #[serde(default)]
    pub dynamic_scoped_route_configs: Vec<ScopedRouteGroup>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopedRouteGroup {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub scoped_route_configs: Vec<ScopedRouteDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopedRouteDetail {
    pub name: String,
    #[serde(default)]
    pub route_configuration_name: Option<String>,
}

impl ScopedRouteConfigDump {
    pub fn scopes(&self) -> impl Iterator<Item = &ScopedRouteDetail> {
        self.inline_scoped_route_configs
            .iter()
            .chain(self.dynamic_scoped_route_configs.iter())
            .flat_map(|g| g.scoped_route_configs.iter())
    }
}
