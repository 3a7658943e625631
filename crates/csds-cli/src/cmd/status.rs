use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use csds_client::{ClientOptions, CsdsClient, StatusSource};
use csds_core::prelude::*;

use crate::args::StatusArgs;
use crate::io::export::{self, GraphOut, SystemViewer, Viewer};
use crate::output;

#[derive(Debug, Serialize)]
pub struct StatusOut {
    pub status: StatusReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_saved_to: Option<String>,
    /// Detailed config, when it was not saved to a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<GraphOut>,
}

pub async fn run(args: &StatusArgs) -> Result<()> {
    let opts = args.to_options();
    let client = CsdsClient::connect(&opts)?;
    tracing::debug!(matchers = client.request().node_matchers.len(), "request loaded");
    let cfg = RenderConfig::default();
    validate_config(&cfg)?;

    loop {
        let out = iteration(&client, &opts, &cfg, Path::new(&cfg.output_file), &SystemViewer).await?;
        if output::is_json() {
            output::print(&out)?;
        }

        match opts.monitor_interval {
            Some(every) => {
                tracing::debug!(secs = every.as_secs(), "waiting for next poll");
                tokio::time::sleep(every).await;
            }
            None => return Ok(()),
        }
    }
}

/// One poll: status table, detailed config, then the graph.
pub async fn iteration<S: StatusSource, V: Viewer>(
    client: &CsdsClient<S>,
    opts: &ClientOptions,
    cfg: &RenderConfig,
    graph_file: &Path,
    viewer: &V,
) -> Result<StatusOut> {
    let fetched = {
        let pb = spinner(opts);
        pb.set_message("querying client status");
        let res = client.fetch().await;
        pb.finish_and_clear();
        res?
    };

    let status = summarize(&fetched.snapshot);
    if !output::is_json() {
        output::table(&status.render())?;
    }

    let mut out = StatusOut { status, config_saved_to: None, config: None, graph: None };
    if !fetched.snapshot.has_xds_config() {
        return Ok(out);
    }

    match &opts.config_file {
        Some(path) => {
            export::save_config(path, &fetched.raw)?;
            output::line(&format!("Config has been saved to {}", path.display()));
            out.config_saved_to = Some(path.display().to_string());
        }
        None if output::is_json() => out.config = Some(fetched.raw.clone()),
        None => output::line(&serde_json::to_string_pretty(&fetched.raw)?),
    }

    if opts.visualization {
        let graph = export::visualize(&fetched.snapshot, cfg, graph_file, !opts.is_monitor(), viewer)?;
        output::line(&format!("Config graph has been saved to {}", graph.file));
        out.graph = Some(graph);
    }
    Ok(out)
}

fn spinner(opts: &ClientOptions) -> ProgressBar {
    if output::is_json() || opts.is_monitor() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;

    use anyhow::anyhow;
    use url::Url;

    use csds_client::{ClientStatusRequest, FileStatusSource};

    const RESPONSE: &str = include_str!("../../../csds-core/tests/fixtures/client_status_response.json");

    #[derive(Default)]
    struct Recorder {
        opened: RefCell<Vec<Url>>,
    }

    impl Viewer for Recorder {
        fn open(&self, url: &Url) -> Result<()> {
            self.opened.borrow_mut().push(url.clone());
            Ok(())
        }
    }

    struct Broken;

    impl Viewer for Broken {
        fn open(&self, _url: &Url) -> Result<()> {
            Err(anyhow!("no browser"))
        }
    }

    fn client_for(dir: &Path, body: &str) -> CsdsClient<FileStatusSource> {
        let p = dir.join("resp.json");
        fs::write(&p, body).unwrap();
        CsdsClient::with_source(FileStatusSource::new(p), ClientStatusRequest::default())
    }

    #[tokio::test]
    async fn saves_config_and_renders_graph() {
        let dir = tempfile::tempdir().unwrap();
        let client = client_for(dir.path(), RESPONSE);
        let opts = ClientOptions {
            config_file: Some(dir.path().join("config.json")),
            visualization: true,
            ..Default::default()
        };
        let graph_file = dir.path().join("config_graph.dot");
        let rec = Recorder::default();

        let out = iteration(&client, &opts, &RenderConfig::default(), &graph_file, &rec).await.unwrap();

        assert_eq!(out.status.rows.len(), 2);
        assert!(out.config_saved_to.is_some());
        assert!(dir.path().join("config.json").exists());
        let graph = out.graph.unwrap();
        assert_eq!(graph.edges, 3);
        assert!(graph_file.exists());
        assert_eq!(rec.opened.borrow().len(), 1);
    }

    #[tokio::test]
    async fn monitor_mode_suppresses_viewer() {
        let dir = tempfile::tempdir().unwrap();
        let client = client_for(dir.path(), RESPONSE);
        let opts = ClientOptions {
            config_file: Some(dir.path().join("config.json")),
            visualization: true,
            ..Default::default()
        }
        .with_monitor_secs(5);
        let graph_file = dir.path().join("config_graph.dot");
        let rec = Recorder::default();

        let out = iteration(&client, &opts, &RenderConfig::default(), &graph_file, &rec).await.unwrap();
        assert!(out.graph.unwrap().viewer_url.is_none());
        assert!(rec.opened.borrow().is_empty());
        assert!(graph_file.exists());
    }

    #[tokio::test]
    async fn no_clients_skips_config_and_graph() {
        let dir = tempfile::tempdir().unwrap();
        let client = client_for(dir.path(), r#"{"config": []}"#);
        let opts = ClientOptions { visualization: true, ..Default::default() };
        let graph_file = dir.path().join("config_graph.dot");

        let out = iteration(&client, &opts, &RenderConfig::default(), &graph_file, &Recorder::default())
            .await
            .unwrap();
        assert!(!out.status.connected);
        assert!(out.graph.is_none());
        assert!(!graph_file.exists());
    }

    #[tokio::test]
    async fn viewer_failure_propagates_after_write() {
        let dir = tempfile::tempdir().unwrap();
        let client = client_for(dir.path(), RESPONSE);
        let opts = ClientOptions {
            config_file: Some(dir.path().join("config.json")),
            visualization: true,
            ..Default::default()
        };
        let graph_file = dir.path().join("config_graph.dot");

        let err = iteration(&client, &opts, &RenderConfig::default(), &graph_file, &Broken)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "no browser");
        assert!(graph_file.exists());
    }
}
