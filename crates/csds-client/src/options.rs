//! Client options.
//!
//! `ClientOptions` is what the CLI hands to [`crate::CsdsClient`]. The enum
//! fields parse from their lowercase flag spellings so clap can use them
//! directly.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::constants::{DEFAULT_SERVICE_URI, GCP_REQUIRED_KEYS};
use crate::request::ClientStatusRequest;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OptionsError {
    #[error("{0} platform is not supported, list of supported platforms: gcp")]
    UnsupportedPlatform(String),

    #[error("{0} api version is not supported, list of supported api versions: v2, v3")]
    UnsupportedApiVersion(String),

    #[error("invalid authn_mode: {0} (expected auto or jwt)")]
    InvalidAuthnMode(String),

    #[error("missing field {0} in NodeMatcher")]
    MissingMetadata(&'static str),

    #[error("missing jwt file")]
    MissingJwtFile,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Platform {
    #[default]
    Gcp,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Gcp => "gcp",
        }
    }

    /// Check that `request` matches on every metadata key this platform needs.
    pub fn validate_request(self, request: &ClientStatusRequest) -> Result<(), OptionsError> {
        match self {
            Platform::Gcp => {
                for key in GCP_REQUIRED_KEYS {
                    if request.metadata_value(key).is_none() {
                        return Err(OptionsError::MissingMetadata(key));
                    }
                }
                Ok(())
            }
        }
    }
}

impl FromStr for Platform {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gcp" => Ok(Platform::Gcp),
            other => Err(OptionsError::UnsupportedPlatform(other.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthnMode {
    /// Ambient credentials; on gcp the request is billed to the project
    /// named in the node matcher.
    #[default]
    Auto,
    /// Bearer token read from `--jwt-file`.
    Jwt,
}

impl FromStr for AuthnMode {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(AuthnMode::Auto),
            "jwt" => Ok(AuthnMode::Jwt),
            other => Err(OptionsError::InvalidAuthnMode(other.to_string())),
        }
    }
}

impl fmt::Display for AuthnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AuthnMode::Auto => "auto",
            AuthnMode::Jwt => "jwt",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiVersion {
    #[default]
    V2,
    V3,
}

impl ApiVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiVersion::V2 => "v2",
            ApiVersion::V3 => "v3",
        }
    }
}

impl FromStr for ApiVersion {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v2" => Ok(ApiVersion::V2),
            "v3" => Ok(ApiVersion::V3),
            other => Err(OptionsError::UnsupportedApiVersion(other.to_string())),
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub service_uri: String,
    pub platform: Platform,
    pub authn_mode: AuthnMode,
    pub api_version: ApiVersion,
    pub request_file: Option<PathBuf>,
    pub request_yaml: Option<String>,
    pub jwt_file: Option<PathBuf>,
    /// Where to save the detailed config; printed to stdout when unset.
    pub config_file: Option<PathBuf>,
    /// `None` runs once.
    pub monitor_interval: Option<Duration>,
    pub visualization: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            service_uri: DEFAULT_SERVICE_URI.to_string(),
            platform: Platform::default(),
            authn_mode: AuthnMode::default(),
            api_version: ApiVersion::default(),
            request_file: None,
            request_yaml: None,
            jwt_file: None,
            config_file: None,
            monitor_interval: None,
            visualization: false,
        }
    }
}

impl ClientOptions {
    /// Interval from a seconds count, where zero means run once.
    pub fn with_monitor_secs(mut self, secs: u64) -> Self {
        self.monitor_interval = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }

    pub fn is_monitor(&self) -> bool {
        self.monitor_interval.is_some()
    }

    /// Option combinations that can be rejected before any I/O.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.authn_mode == AuthnMode::Jwt && self.jwt_file.is_none() {
            return Err(OptionsError::MissingJwtFile);
        }
        Ok(())
    }
}
