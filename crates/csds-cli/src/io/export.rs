//! Files and viewer output: detailed config, DOT graph, hosted viewer URL.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use url::Url;

use csds_core::prelude::*;

/// Opens a viewer URL.
pub trait Viewer {
    fn open(&self, url: &Url) -> Result<()>;
}

/// Platform browser launcher.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemViewer;

impl Viewer for SystemViewer {
    fn open(&self, url: &Url) -> Result<()> {
        webbrowser::open(url.as_str()).map_err(|e| anyhow!("failed to open viewer: {e}"))
    }
}

#[derive(Debug, Serialize)]
pub struct GraphOut {
    pub file: String,
    pub nodes: usize,
    pub edges: usize,
    pub dangling: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer_url: Option<String>,
    /// Nodes and edges, for `--json` consumers.
    pub graph: serde_json::Value,
}

pub fn save_config(path: &Path, raw: &serde_json::Value) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(raw)?;
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Viewer URL with the DOT text as the fragment.
pub fn viewer_url(base: &str, dot: &str) -> Result<Url> {
    let mut url = Url::parse(base).map_err(|e| anyhow!("invalid viewer url {base}: {e}"))?;
    // Url strips raw tabs and newlines from fragments; escape them (and '%')
    // first so the DOT text survives intact.
    let mut frag = String::with_capacity(dot.len());
    for c in dot.chars() {
        match c {
            '%' => frag.push_str("%25"),
            '\n' => frag.push_str("%0A"),
            '\r' => frag.push_str("%0D"),
            '\t' => frag.push_str("%09"),
            _ => frag.push(c),
        }
    }
    url.set_fragment(Some(&frag));
    Ok(url)
}

/// Extract, render and write the graph, then optionally open the viewer.
///
/// Nothing is written if extraction fails. The file is on disk before the
/// viewer is launched, so a viewer failure still leaves it behind.
pub fn visualize<V: Viewer>(
    snapshot: &Snapshot,
    cfg: &RenderConfig,
    out: &Path,
    open: bool,
    viewer: &V,
) -> Result<GraphOut> {
    let graph = extract(snapshot)?.graph;
    let dot = csds_core::render::dot::DotRenderer::new(cfg.clone()).render(&graph);

    fs::write(out, &dot).with_context(|| format!("failed to write {}", out.display()))?;
    tracing::debug!(file = %out.display(), nodes = graph.node_count(), edges = graph.edge_count(), "graph written");

    let mut result = GraphOut {
        file: out.display().to_string(),
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        dangling: graph.dangling().len(),
        viewer_url: None,
        graph: csds_core::graph::graph_to_json(&graph),
    };

    if open {
        let url = viewer_url(&cfg.viewer_url, &dot)?;
        viewer.open(&url)?;
        result.viewer_url = Some(url.to_string());
    }
    Ok(result)
}
