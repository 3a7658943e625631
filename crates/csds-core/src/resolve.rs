//! Type resolution for `google.protobuf.Any` payloads.
//!
//! Extension payloads in a config dump are identified by a type URL. The set
//! of URLs this crate can interpret is a closed list: `TypeResolver::find`
//! returns `None` for anything else and callers skip such payloads.
//!
//! If a new payload type needs to be understood, add its URL to `find` and a
//! matching `KnownType` variant.

use serde::Deserialize;
use serde_json::Value;

use crate::model::TypedExtension;

/// Payload shapes this crate knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownType {
    HttpConnectionManager,
}

/// Closed lookup table from type URL to `KnownType`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeResolver;

impl TypeResolver {
    pub fn find(&self, type_url: &str) -> Option<KnownType> {
        match type_url {
            "type.googleapis.com/envoy.config.filter.network.http_connection_manager.v2.HttpConnectionManager"
            | "type.googleapis.com/envoy.extensions.filters.network.http_connection_manager.v3.HttpConnectionManager" => {
                Some(KnownType::HttpConnectionManager)
            }
            _ => None,
        }
    }

    /// Decode an extension as an HTTP connection manager.
    ///
    /// Returns `Ok(None)` when the extension is of some other type.
    pub fn http_connection_manager(
        &self,
        ext: &TypedExtension,
    ) -> Result<Option<HttpConnectionManager>, String> {
        if self.find(&ext.type_url) != Some(KnownType::HttpConnectionManager) {
            return Ok(None);
        }
        HttpConnectionManager::deserialize(Value::Object(ext.payload.clone()))
            .map(Some)
            .map_err(|e| format!("invalid HttpConnectionManager: {e}"))
    }
}

/// The fields of an HTTP connection manager that name a route table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpConnectionManager {
    #[serde(default)]
    pub stat_prefix: Option<String>,
    #[serde(default)]
    pub rds: Option<Rds>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rds {
    /// Omitted by the JSON mapping when empty.
    #[serde(default)]
    pub route_config_name: Option<String>,
}

impl HttpConnectionManager {
    /// The referenced route table; `None` when absent or empty.
    pub fn route_config_name(&self) -> Option<&str> {
        self.rds
            .as_ref()
            .and_then(|r| r.route_config_name.as_deref())
            .filter(|n| !n.is_empty())
    }
}
