//! Where client status responses come from.
//!
//! The control plane exposes CSDS over gRPC and, through its HTTP/JSON
//! mapping, as `POST /<api>/discovery:client_status`. `HttpStatusSource`
//! speaks the latter. `FileStatusSource` replays a saved response.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use url::Url;

use crate::constants::{GCP_PROJECT_NUMBER_KEY, USER_PROJECT_HEADER};
use crate::options::{ApiVersion, AuthnMode, ClientOptions, OptionsError, Platform};
use crate::request::ClientStatusRequest;

/// Produces one raw `ClientStatusResponse` document per call.
#[allow(async_fn_in_trait)]
pub trait StatusSource {
    async fn fetch(&self, request: &ClientStatusRequest) -> Result<Value>;

    /// Human-readable origin, for logs.
    fn describe(&self) -> String;
}

/// Build the CSDS endpoint from a `host[:port]` or full URL.
pub fn endpoint_url(service_uri: &str, api: ApiVersion) -> Result<Url> {
    let base = if service_uri.contains("://") {
        service_uri.to_string()
    } else {
        format!("https://{service_uri}")
    };
    let mut url = Url::parse(&base).map_err(|e| anyhow!("invalid service uri {service_uri}: {e}"))?;
    if url.cannot_be_a_base() {
        bail!("invalid service uri {service_uri}");
    }
    url.set_path(&format!("/{}/discovery:client_status", api.as_str()));
    Ok(url)
}

#[derive(Debug, Clone)]
pub struct HttpStatusSource {
    http: reqwest::Client,
    url: Url,
    headers: HeaderMap,
}

impl HttpStatusSource {
    pub fn new(opts: &ClientOptions, request: &ClientStatusRequest) -> Result<Self> {
        let url = endpoint_url(&opts.service_uri, opts.api_version)?;
        let headers = auth_headers(opts, request)?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("csds/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build http client")?;
        Ok(Self { http, url, headers })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn build(&self, request: &ClientStatusRequest) -> Result<reqwest::Request> {
        self.http
            .post(self.url.clone())
            .headers(self.headers.clone())
            .json(request)
            .build()
            .context("failed to build csds request")
    }
}

impl StatusSource for HttpStatusSource {
    async fn fetch(&self, request: &ClientStatusRequest) -> Result<Value> {
        let req = self.build(request)?;
        tracing::debug!(url = %self.url, matchers = request.node_matchers.len(), "sending client status request");

        let resp = self
            .http
            .execute(req)
            .await
            .with_context(|| format!("connect error: {}", self.url))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("http error: {status}: {}", body.trim()));
        }
        let v = resp.json::<Value>().await.context("invalid client status response")?;
        Ok(v)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

fn auth_headers(opts: &ClientOptions, request: &ClientStatusRequest) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    match opts.authn_mode {
        AuthnMode::Jwt => {
            let path = opts.jwt_file.as_deref().ok_or(OptionsError::MissingJwtFile)?;
            let token = read_token(path)?;
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| anyhow!("jwt file {} is not a valid token", path.display()))?;
            headers.insert(AUTHORIZATION, value);
        }
        AuthnMode::Auto => match opts.platform {
            Platform::Gcp => {
                if let Some(project) = request.metadata_value(GCP_PROJECT_NUMBER_KEY) {
                    let value = HeaderValue::from_str(project)
                        .map_err(|_| anyhow!("invalid project number {project}"))?;
                    headers.insert(HeaderName::from_static(USER_PROJECT_HEADER), value);
                }
            }
        },
    }
    Ok(headers)
}

fn read_token(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read jwt file {}", path.display()))?;
    let token = raw.trim();
    if token.is_empty() {
        bail!("jwt file {} is empty", path.display());
    }
    Ok(token.to_string())
}

/// Replays a response previously saved with `--file-to-save-config`.
#[derive(Debug, Clone)]
pub struct FileStatusSource {
    path: PathBuf,
}

impl FileStatusSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StatusSource for FileStatusSource {
    async fn fetch(&self, _request: &ClientStatusRequest) -> Result<Value> {
        let raw = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        serde_json::from_slice(&raw).map_err(|e| anyhow!("invalid json in {}: {e}", self.path.display()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
