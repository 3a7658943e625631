//! Render configuration for csds-core.
//!
//! The core crate does not read environment variables or files. Hosts build a
//! `RenderConfig` (usually `RenderConfig::default()`), optionally override
//! fields, and pass it to the renderer explicitly.

use serde::{Deserialize, Serialize};

use crate::errors::{CsdsError, CsdsResult};
use crate::graph::NodeKind;

/// Styling and output settings for the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "RenderConfig::default_graph_name")]
    pub graph_name: String,

    /// Graphviz `rankdir` (layout direction).
    #[serde(default = "RenderConfig::default_rankdir")]
    pub rankdir: String,

    #[serde(default = "RenderConfig::default_font")]
    pub font: String,

    #[serde(default)]
    pub palette: Palette,

    #[serde(default = "RenderConfig::default_edge_width")]
    pub edge_penwidth: String,

    #[serde(default = "RenderConfig::default_edge_width")]
    pub edge_arrowsize: String,

    /// File the rendered graph is written to (overwritten on every run).
    #[serde(default = "RenderConfig::default_output_file")]
    pub output_file: String,

    /// Hosted Graphviz renderer; the DOT text is placed in the URL fragment.
    #[serde(default = "RenderConfig::default_viewer_url")]
    pub viewer_url: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            graph_name: Self::default_graph_name(),
            rankdir: Self::default_rankdir(),
            font: Self::default_font(),
            palette: Palette::default(),
            edge_penwidth: Self::default_edge_width(),
            edge_arrowsize: Self::default_edge_width(),
            output_file: Self::default_output_file(),
            viewer_url: Self::default_viewer_url(),
        }
    }
}

impl RenderConfig {
    fn default_graph_name() -> String {
        "G".to_string()
    }
    fn default_rankdir() -> String {
        "LR".to_string()
    }
    fn default_font() -> String {
        "Roboto".to_string()
    }
    fn default_edge_width() -> String {
        "0.3".to_string()
    }
    fn default_output_file() -> String {
        "config_graph.dot".to_string()
    }
    fn default_viewer_url() -> String {
        "http://dreampuf.github.io/GraphvizOnline/".to_string()
    }
}

/// One fill/border colour per node category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub listener: String,
    pub route_table: String,
    pub cluster: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            listener: "#4285F4".to_string(),
            route_table: "#FBBC04".to_string(),
            cluster: "#34A853".to_string(),
        }
    }
}

impl Palette {
    pub fn color(&self, kind: NodeKind) -> &str {
        match kind {
            NodeKind::Listener => &self.listener,
            NodeKind::RouteTable => &self.route_table,
            NodeKind::Cluster => &self.cluster,
        }
    }
}

/// Validate a render configuration.
pub fn validate_config(cfg: &RenderConfig) -> CsdsResult<()> {
    if cfg.graph_name.trim().is_empty() {
        return Err(CsdsError::invalid_argument("graph name must not be empty"));
    }

    if cfg.output_file.trim().is_empty() {
        return Err(CsdsError::invalid_argument("output file must not be empty"));
    }

    let colors = NodeKind::ALL.map(|k| cfg.palette.color(k).to_string());
    for (i, a) in colors.iter().enumerate() {
        if a.is_empty() {
            return Err(CsdsError::invalid_argument("palette colours must not be empty"));
        }
        if colors[i + 1..].contains(a) {
            return Err(CsdsError::invalid_argument(format!(
                "palette colour {a} is used by more than one node category"
            )));
        }
    }

    if !cfg.viewer_url.starts_with("http://") && !cfg.viewer_url.starts_with("https://") {
        return Err(CsdsError::invalid_argument("viewer url must be http(s)"));
    }

    Ok(())
}
