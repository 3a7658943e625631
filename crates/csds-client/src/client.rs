//! CSDS client: request + source, yielding decoded snapshots.

use anyhow::{Context, Result};
use serde_json::Value;

use csds_core::model::Snapshot;

use crate::options::ClientOptions;
use crate::request::{load_request, ClientStatusRequest};
use crate::transport::{HttpStatusSource, StatusSource};

/// One fetched response, raw and decoded.
#[derive(Debug, Clone)]
pub struct Fetched {
    /// The response exactly as received; this is what gets saved or printed
    /// as the detailed config.
    pub raw: Value,
    pub snapshot: Snapshot,
}

#[derive(Debug)]
pub struct CsdsClient<S> {
    source: S,
    request: ClientStatusRequest,
}

impl CsdsClient<HttpStatusSource> {
    /// Load and validate the request, then set up the HTTP transport.
    pub fn connect(opts: &ClientOptions) -> Result<Self> {
        opts.validate()?;
        let request = load_request(opts.request_file.as_deref(), opts.request_yaml.as_deref())?;
        opts.platform.validate_request(&request)?;

        let source = HttpStatusSource::new(opts, &request)?;
        tracing::info!(endpoint = %source.url(), api = %opts.api_version, "csds client ready");
        Ok(Self { source, request })
    }
}

impl<S: StatusSource> CsdsClient<S> {
    pub fn with_source(source: S, request: ClientStatusRequest) -> Self {
        Self { source, request }
    }

    pub fn request(&self) -> &ClientStatusRequest {
        &self.request
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn fetch(&self) -> Result<Fetched> {
        let raw = self.source.fetch(&self.request).await?;
        let snapshot = Snapshot::from_json(&raw)
            .with_context(|| format!("failed to decode response from {}", self.source.describe()))?;
        tracing::debug!(clients = snapshot.clients.len(), "decoded client status response");
        Ok(Fetched { raw, snapshot })
    }
}
